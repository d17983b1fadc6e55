//! Flat-file persistence for the catalog. `records` owns the line format and
//! `file` owns reading and writing `database.txt`.

mod file;
mod records;

pub use file::DatabaseFile;
pub use records::{format_rating, format_record, parse_line};
