//! Error type shared by the catalog and the flat-file store.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Broad classes the interface uses to pick a message and a severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A rating string that is neither `X/Y` nor a plain decimal.
    Format,
    /// Rent/collect on a record in the wrong state, or with nothing selected.
    State,
    /// Average rating over an empty catalog.
    Compute,
    /// Reading or writing the database file.
    Io,
}

#[derive(Debug, Error)]
pub enum RentalError {
    #[error("rating `{input}` is not in a supported format (X/Y or X.X)")]
    UnsupportedRating { input: String },

    #[error("no movie selected")]
    NoSelection,

    #[error("movie is already rented")]
    AlreadyRented,

    #[error("movie is not rented")]
    NotRented,

    #[error("cannot average the ratings of an empty catalog")]
    EmptyCatalog,

    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to write {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },
}

impl RentalError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RentalError::UnsupportedRating { .. } => ErrorKind::Format,
            RentalError::NoSelection | RentalError::AlreadyRented | RentalError::NotRented => {
                ErrorKind::State
            }
            RentalError::EmptyCatalog => ErrorKind::Compute,
            RentalError::Read { .. }
            | RentalError::Write { .. }
            | RentalError::MalformedLine { .. } => ErrorKind::Io,
        }
    }
}
