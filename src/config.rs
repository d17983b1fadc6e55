use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".video-rental-manager";
/// Database file name, shared by the working-directory and home locations.
const DATABASE_FILE_NAME: &str = "database.txt";
/// Log file name stored inside the application data directory.
const LOG_FILE_NAME: &str = "video-rental-manager.log";
/// How long the "Saving..." notice stays up before the process exits.
const AUTOSAVE_NOTICE: Duration = Duration::from_millis(1500);

/// Resolved locations and timings for one session.
#[derive(Debug, Clone)]
pub struct Settings {
    pub database_path: PathBuf,
    pub log_path: PathBuf,
    pub autosave_notice: Duration,
}

impl Settings {
    /// Explicit locations, mostly for tests. The autosave notice is skipped.
    pub fn new(database_path: impl Into<PathBuf>, log_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            log_path: log_path.into(),
            autosave_notice: Duration::ZERO,
        }
    }

    /// Locate the data directory, creating it if needed. A `database.txt`
    /// already present in the working directory wins over the one in the
    /// data directory so existing files keep being used.
    pub fn resolve() -> Result<Self> {
        let data_dir = data_dir()?;
        fs::create_dir_all(&data_dir).context("failed to create data directory")?;

        let local = Path::new(DATABASE_FILE_NAME);
        let database_path = if local.is_file() {
            local.to_path_buf()
        } else {
            data_dir.join(DATABASE_FILE_NAME)
        };

        Ok(Self {
            database_path,
            log_path: data_dir.join(LOG_FILE_NAME),
            autosave_notice: AUTOSAVE_NOTICE,
        })
    }
}

/// Resolve the absolute path to the data directory inside the user's home.
fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
