//! Video rental manager: a small movie catalog with rent/collect tracking,
//! persisted to a semicolon-delimited `database.txt` and driven from a
//! terminal UI.
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod ui;

pub use catalog::{parse_rating, Catalog};
pub use config::Settings;
pub use db::DatabaseFile;
pub use error::{ErrorKind, RentalError};
pub use models::{Availability, MovieRecord};
pub use ui::{run_app, App};
