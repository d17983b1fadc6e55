use std::error::Error;

use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::db::format_rating;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal notices.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Flatten an error and its sources into one line.
pub(crate) fn surface_error(err: &(dyn Error + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// Footer text for the current average.
pub(crate) fn average_label(average: Option<f64>) -> String {
    match average {
        Some(value) => format!("Average rating: {value:.2}"),
        None => "Average rating: -".to_string(),
    }
}

/// Table cell text for a rating, matching what is written to disk.
pub(crate) fn rating_cell(rating: f64) -> String {
    format_rating(rating)
}
