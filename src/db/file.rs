use std::fs;
use std::path::{Path, PathBuf};

use tracing::{error, info};

use super::records::{format_record, parse_line};
use crate::error::RentalError;
use crate::models::MovieRecord;

#[cfg(windows)]
const LINE_ENDING: &str = "\r\n";
#[cfg(not(windows))]
const LINE_ENDING: &str = "\n";

/// Handle to the semicolon-delimited database file.
#[derive(Debug, Clone)]
pub struct DatabaseFile {
    path: PathBuf,
}

impl DatabaseFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record. Loading is all-or-nothing: the first unreadable line
    /// fails the whole load and no records are returned. Blank lines are
    /// skipped.
    pub fn load(&self) -> Result<Vec<MovieRecord>, RentalError> {
        let contents = fs::read_to_string(&self.path).map_err(|source| {
            error!(path = %self.path.display(), %source, "failed to read database");
            RentalError::Read {
                path: self.path.clone(),
                source,
            }
        })?;

        let records = contents
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(idx, line)| parse_line(idx + 1, line))
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|err| error!(path = %self.path.display(), %err, "rejected database"))?;

        info!(path = %self.path.display(), count = records.len(), "loaded database");
        Ok(records)
    }

    /// Overwrite the file with `records` in the given order.
    pub fn save(&self, records: &[MovieRecord]) -> Result<(), RentalError> {
        let mut contents = String::new();
        for record in records {
            contents.push_str(&format_record(record));
            contents.push_str(LINE_ENDING);
        }

        fs::write(&self.path, contents).map_err(|source| {
            error!(path = %self.path.display(), %source, "failed to write database");
            RentalError::Write {
                path: self.path.clone(),
                source,
            }
        })?;

        info!(path = %self.path.display(), count = records.len(), "saved database");
        Ok(())
    }
}
