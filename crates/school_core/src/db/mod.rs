//! SQLite storage bootstrap, schema versioning and backup.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the school store.
//! - Create the schema on a fresh file and guard the `PRAGMA user_version` stamp.
//! - Copy a live database through SQLite's online backup API.
//!
//! # Invariants
//! - Every returned connection has `foreign_keys=ON`.
//! - No table is read or written before the schema is in place.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod backup;
pub mod schema;
mod open;

pub use backup::{backup_file_name, backup_to, backup_to_dir};
pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    Io(std::io::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "unsupported database schema version {db_version}, expected {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::Io(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

impl From<std::io::Error> for DbError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
