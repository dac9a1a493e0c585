//! Online database backup.
//!
//! Copies go through SQLite's backup API, so a concurrent writer can never
//! leave a half-written page in the destination.

use super::DbResult;
use chrono::{DateTime, Local};
use log::info;
use rusqlite::{Connection, DatabaseName};
use std::path::{Path, PathBuf};
use std::time::Instant;

const BACKUP_FILE_PREFIX: &str = "school";

/// Copies the main database of `conn` to `dest`, replacing any file there.
pub fn backup_to(conn: &Connection, dest: impl AsRef<Path>) -> DbResult<()> {
    let dest = dest.as_ref();
    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let started_at = Instant::now();
    conn.backup(DatabaseName::Main, dest, None)?;
    info!(
        "event=backup module=db status=ok dest={} duration_ms={}",
        dest.display(),
        started_at.elapsed().as_millis()
    );
    Ok(())
}

/// Backs up into `dir` under a timestamped name and returns the new path.
pub fn backup_to_dir(conn: &Connection, dir: impl AsRef<Path>) -> DbResult<PathBuf> {
    let dest = dir.as_ref().join(backup_file_name(Local::now()));
    backup_to(conn, &dest)?;
    Ok(dest)
}

/// `school-YYYYmmdd-HHMMSS.db` for the given instant.
pub fn backup_file_name(at: DateTime<Local>) -> String {
    format!("{BACKUP_FILE_PREFIX}-{}.db", at.format("%Y%m%d-%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::backup_file_name;
    use chrono::{Local, TimeZone};

    #[test]
    fn file_name_embeds_local_timestamp() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 7, 5, 1).unwrap();
        assert_eq!(backup_file_name(at), "school-20240309-070501.db");
    }
}
