//! Domain models for the rental catalog. These stay plain data holders so the
//! catalog can own the ordering rules and the `db` layer can own the text
//! format.

use std::fmt;
use std::str::FromStr;

use crate::error::RentalError;

/// Whether a movie is on the shelf or currently rented out. The variant order
/// matters: deriving `Ord` makes `Available` sort before `Unavailable`, which
/// is the primary key of the catalog ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Availability {
    Available,
    Unavailable,
}

impl Availability {
    /// Text used both in the table and in `database.txt`.
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Available => "available",
            Availability::Unavailable => "unavailable",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Availability {
    type Err = RentalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "available" => Ok(Availability::Available),
            "unavailable" => Ok(Availability::Unavailable),
            other => Err(RentalError::MalformedLine {
                line: 0,
                reason: format!("unknown availability `{other}`"),
            }),
        }
    }
}

/// One row of the rental table.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    /// Title as typed by the user. Duplicates are allowed.
    pub name: String,
    /// Rating already converted from the `X/Y` or `X.X` input form.
    pub rating: f64,
    pub genre: String,
    pub availability: Availability,
}

impl MovieRecord {
    /// Fresh records always start on the shelf.
    pub fn new(name: impl Into<String>, rating: f64, genre: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rating,
            genre: genre.into(),
            availability: Availability::Available,
        }
    }

    pub fn is_available(&self) -> bool {
        self.availability == Availability::Available
    }
}
