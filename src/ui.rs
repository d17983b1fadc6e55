//! Ratatui front-end: an entry form, the sorted movie table and a footer with
//! the last status message and the running average rating.

mod app;
mod forms;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
