//! Schema bootstrap for the school store.
//!
//! A fresh database gets `schema.sql` and is stamped with [`SCHEMA_VERSION`]
//! through `PRAGMA user_version`. A stamped database is left as is.

use crate::db::{DbError, DbResult};
use log::info;
use rusqlite::Connection;

/// Version stamped into `PRAGMA user_version` once the schema is created.
pub const SCHEMA_VERSION: u32 = 1;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Creates the tables on an unstamped database.
///
/// # Errors
/// - [`DbError::UnsupportedSchemaVersion`] when the file carries any other
///   stamp than [`SCHEMA_VERSION`].
pub fn ensure_schema(conn: &mut Connection) -> DbResult<()> {
    let stamped: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    match stamped {
        SCHEMA_VERSION => Ok(()),
        0 => {
            let tx = conn.transaction()?;
            tx.execute_batch(SCHEMA_SQL)?;
            tx.execute_batch(&format!("PRAGMA user_version = {SCHEMA_VERSION};"))?;
            tx.commit()?;
            info!("event=schema_init module=db status=ok version={SCHEMA_VERSION}");
            Ok(())
        }
        other => Err(DbError::UnsupportedSchemaVersion {
            db_version: other,
            latest_supported: SCHEMA_VERSION,
        }),
    }
}
