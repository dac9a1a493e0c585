//! Runtime locations and log level.
//!
//! Everything defaults to one data directory:
//!
//! ```text
//! <data_dir>/school.db
//! <data_dir>/logs/
//! <data_dir>/backup/
//! ```

use crate::logging::default_log_level;
use directories::BaseDirs;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Folder created beneath the user's home directory.
const DATA_DIR_NAME: &str = ".school-manager";
const DB_FILE_NAME: &str = "school.db";
const LOG_DIR_NAME: &str = "logs";
const BACKUP_DIR_NAME: &str = "backup";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    NoHomeDirectory,
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoHomeDirectory => write!(f, "could not locate home directory"),
        }
    }
}

impl Error for ConfigError {}

/// Paths and log level for one process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreConfig {
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub log_level: String,
    pub backup_dir: PathBuf,
}

impl CoreConfig {
    /// Lays out the database, logs and backups under `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            db_path: dir.join(DB_FILE_NAME),
            log_dir: dir.join(LOG_DIR_NAME),
            log_level: default_log_level().to_string(),
            backup_dir: dir.join(BACKUP_DIR_NAME),
        }
    }

    /// `~/.school-manager` layout.
    pub fn default_location() -> Result<Self, ConfigError> {
        let base_dirs = BaseDirs::new().ok_or(ConfigError::NoHomeDirectory)?;
        Ok(Self::in_dir(base_dirs.home_dir().join(DATA_DIR_NAME)))
    }

    pub fn with_db_path(mut self, db_path: impl Into<PathBuf>) -> Self {
        self.db_path = db_path.into();
        self
    }

    pub fn with_log_level(mut self, log_level: impl Into<String>) -> Self {
        self.log_level = log_level.into();
        self
    }

    pub fn with_backup_dir(mut self, backup_dir: impl Into<PathBuf>) -> Self {
        self.backup_dir = backup_dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::CoreConfig;
    use std::path::Path;

    #[test]
    fn in_dir_places_everything_under_one_root() {
        let config = CoreConfig::in_dir("/data");
        assert_eq!(config.db_path, Path::new("/data/school.db"));
        assert_eq!(config.log_dir, Path::new("/data/logs"));
        assert_eq!(config.backup_dir, Path::new("/data/backup"));
    }

    #[test]
    fn overrides_replace_single_fields() {
        let config = CoreConfig::in_dir("/data")
            .with_db_path("/elsewhere/x.db")
            .with_log_level("warn");
        assert_eq!(config.db_path, Path::new("/elsewhere/x.db"));
        assert_eq!(config.log_level, "warn");
        assert_eq!(config.backup_dir, Path::new("/data/backup"));
    }
}
