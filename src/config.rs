//! On-disk layout for the application. Everything lives beneath one data
//! directory in the user's home so a single folder can be backed up or wiped.

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".coin-mark";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "coins.sqlite";
/// Rolling log files land here, relative to the data directory.
const LOG_DIR_NAME: &str = "logs";
/// Optional override for the bundled reference files.
const RESOURCE_DIR_NAME: &str = "resources";
const DEFAULT_LOG_LEVEL: &str = "info";

/// Resolved paths and settings for one run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub db_path: PathBuf,
    pub log_dir: PathBuf,
    pub resource_dir: PathBuf,
    pub log_level: String,
}

impl Config {
    /// Resolve the default layout inside the user's home directory.
    pub fn load() -> Result<Self> {
        let base_dirs =
            BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
        Ok(Self::in_dir(base_dirs.home_dir().join(DATA_DIR_NAME)))
    }

    /// Lay out the same structure beneath an arbitrary directory.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref().to_path_buf();
        Self {
            db_path: data_dir.join(DB_FILE_NAME),
            log_dir: data_dir.join(LOG_DIR_NAME),
            resource_dir: data_dir.join(RESOURCE_DIR_NAME),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            data_dir,
        }
    }

    /// The resource override only counts when the directory actually exists.
    pub fn resource_override(&self) -> Option<&Path> {
        if self.resource_dir.is_dir() {
            Some(self.resource_dir.as_path())
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_hangs_off_the_data_dir() {
        let config = Config::in_dir("/tmp/coins");
        assert_eq!(config.db_path, PathBuf::from("/tmp/coins/coins.sqlite"));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/coins/logs"));
        assert_eq!(config.resource_dir, PathBuf::from("/tmp/coins/resources"));
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn resource_override_requires_existing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::in_dir(dir.path());
        assert!(config.resource_override().is_none());

        std::fs::create_dir_all(&config.resource_dir).unwrap();
        assert_eq!(config.resource_override(), Some(config.resource_dir.as_path()));
    }
}
