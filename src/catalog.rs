//! In-memory rental catalog. The catalog owns the only copy of the records and
//! keeps them sorted after every mutation, so the index the table shows is the
//! index stored here and no view/model translation is needed.

use std::cmp::Ordering;

use tracing::{info, warn};

use crate::error::RentalError;
use crate::models::{Availability, MovieRecord};

/// Convert user input into a rating. Accepts `X/Y` (both sides decimals, no
/// zero-denominator guard) or a plain decimal. Surrounding whitespace is
/// ignored on every number.
pub fn parse_rating(text: &str) -> Result<f64, RentalError> {
    let unsupported = || RentalError::UnsupportedRating {
        input: text.to_string(),
    };

    if let Some((numerator, denominator)) = text.split_once('/') {
        let numerator = numerator.trim().parse::<f64>().map_err(|_| unsupported())?;
        let denominator = denominator
            .trim()
            .parse::<f64>()
            .map_err(|_| unsupported())?;
        Ok(numerator / denominator)
    } else {
        text.trim().parse::<f64>().map_err(|_| unsupported())
    }
}

/// Availability ascending, then name, then genre, then rating descending.
pub fn catalog_order(a: &MovieRecord, b: &MovieRecord) -> Ordering {
    a.availability
        .cmp(&b.availability)
        .then_with(|| text_order(&a.name, &b.name))
        .then_with(|| text_order(&a.genre, &b.genre))
        .then_with(|| b.rating.total_cmp(&a.rating))
}

/// Case-insensitive first; letter case only breaks ties.
fn text_order(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    records: Vec<MovieRecord>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a catalog from records in any order.
    pub fn from_records(records: Vec<MovieRecord>) -> Self {
        let mut catalog = Self { records };
        catalog.sort();
        catalog
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&MovieRecord> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Stable sort by [`catalog_order`].
    pub fn sort(&mut self) {
        self.records.sort_by(catalog_order);
    }

    /// Parse `rating_text` and add an available record. Returns the sorted
    /// position of the new record. Nothing changes when the rating is rejected.
    pub fn add(&mut self, name: &str, rating_text: &str, genre: &str) -> Result<usize, RentalError> {
        let rating = match parse_rating(rating_text) {
            Ok(rating) => rating,
            Err(err) => {
                warn!(input = rating_text, "rejected rating");
                return Err(err);
            }
        };

        let record = MovieRecord::new(name, rating, genre);
        let position = self.insert_sorted(record);
        info!(name, rating, genre, position, "added movie");
        Ok(position)
    }

    /// Remove the selected record. No selection, or a stale index, is a no-op.
    pub fn delete(&mut self, selected: Option<usize>) -> Option<MovieRecord> {
        let index = selected.filter(|&idx| idx < self.records.len())?;
        let removed = self.records.remove(index);
        info!(name = %removed.name, index, "deleted movie");
        Some(removed)
    }

    /// Mark an available record as rented. Returns its new sorted position.
    pub fn rent(&mut self, selected: Option<usize>) -> Result<usize, RentalError> {
        self.transition(
            selected,
            Availability::Available,
            Availability::Unavailable,
            RentalError::AlreadyRented,
        )
    }

    /// Mark a rented record as returned. Returns its new sorted position.
    pub fn collect(&mut self, selected: Option<usize>) -> Result<usize, RentalError> {
        self.transition(
            selected,
            Availability::Unavailable,
            Availability::Available,
            RentalError::NotRented,
        )
    }

    /// Arithmetic mean of all ratings.
    pub fn average_rating(&self) -> Result<f64, RentalError> {
        if self.records.is_empty() {
            return Err(RentalError::EmptyCatalog);
        }
        let sum: f64 = self.records.iter().map(|record| record.rating).sum();
        Ok(sum / self.records.len() as f64)
    }

    fn transition(
        &mut self,
        selected: Option<usize>,
        from: Availability,
        to: Availability,
        wrong_state: RentalError,
    ) -> Result<usize, RentalError> {
        let index = match selected.filter(|&idx| idx < self.records.len()) {
            Some(index) => index,
            None => {
                warn!(?to, "availability change without a selection");
                return Err(RentalError::NoSelection);
            }
        };

        if self.records[index].availability != from {
            warn!(name = %self.records[index].name, ?to, "availability change rejected");
            return Err(wrong_state);
        }

        let mut record = self.records.remove(index);
        record.availability = to;
        info!(name = %record.name, availability = %to, "availability changed");
        Ok(self.insert_sorted(record))
    }

    /// Insert after every record that does not sort after `record`, which is
    /// where a stable sort of an appended element would leave it.
    fn insert_sorted(&mut self, record: MovieRecord) -> usize {
        let position = self
            .records
            .partition_point(|existing| catalog_order(existing, &record) != Ordering::Greater);
        self.records.insert(position, record);
        position
    }
}
