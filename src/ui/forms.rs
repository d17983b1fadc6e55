use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use super::app::StatusKind;
use crate::error::ErrorKind;

/// Entry fields for a new movie.
#[derive(Default, Clone)]
pub(crate) struct MovieForm {
    pub(crate) name: String,
    pub(crate) rating: String,
    pub(crate) genre: String,
    pub(crate) active: MovieField,
    pub(crate) error: Option<String>,
}

/// Fields in focus order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum MovieField {
    #[default]
    Name,
    Rating,
    Genre,
}

impl MovieField {
    pub(crate) const ALL: [MovieField; 3] = [MovieField::Name, MovieField::Rating, MovieField::Genre];

    pub(crate) fn label(&self) -> &'static str {
        match self {
            MovieField::Name => "Name",
            MovieField::Rating => "Rating",
            MovieField::Genre => "Genre",
        }
    }

    fn next(self) -> Self {
        match self {
            MovieField::Name => MovieField::Rating,
            MovieField::Rating => MovieField::Genre,
            MovieField::Genre => MovieField::Name,
        }
    }

    fn previous(self) -> Self {
        match self {
            MovieField::Name => MovieField::Genre,
            MovieField::Rating => MovieField::Name,
            MovieField::Genre => MovieField::Rating,
        }
    }

    /// Row of this field inside the form panel.
    pub(crate) fn row(&self) -> u16 {
        match self {
            MovieField::Name => 0,
            MovieField::Rating => 1,
            MovieField::Genre => 2,
        }
    }
}

impl MovieForm {
    pub(crate) fn focus(&mut self, field: MovieField) {
        self.active = field;
    }

    pub(crate) fn focus_next(&mut self) {
        self.active = self.active.next();
    }

    pub(crate) fn focus_previous(&mut self) {
        self.active = self.active.previous();
    }

    /// Append a character to the active field. Control characters are ignored.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.value_mut(self.active).push(ch);
        true
    }

    pub(crate) fn backspace(&mut self) {
        self.value_mut(self.active).pop();
    }

    /// Empty every field and return focus to the name.
    pub(crate) fn clear(&mut self) {
        *self = Self::default();
    }

    pub(crate) fn value(&self, field: MovieField) -> &str {
        match field {
            MovieField::Name => &self.name,
            MovieField::Rating => &self.rating,
            MovieField::Genre => &self.genre,
        }
    }

    fn value_mut(&mut self, field: MovieField) -> &mut String {
        match field {
            MovieField::Name => &mut self.name,
            MovieField::Rating => &mut self.rating,
            MovieField::Genre => &mut self.genre,
        }
    }

    /// Render a single line for the form widget. The active field is only
    /// highlighted while the form has focus.
    pub(crate) fn build_line(&self, field: MovieField, focused: bool) -> Line<'static> {
        let value = self.value(field);
        let is_active = focused && self.active == field;

        let display = if value.is_empty() && field == MovieField::Rating {
            "<X/Y or X.X>".to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(prefix(field)),
            Span::styled(display, style),
        ])
    }

    /// Cursor column offset for the requested field, including its label.
    pub(crate) fn cursor_offset(&self, field: MovieField) -> u16 {
        let count = prefix(field).chars().count() + self.value(field).chars().count();
        u16::try_from(count).unwrap_or(u16::MAX)
    }
}

fn prefix(field: MovieField) -> String {
    format!("{:<8}", format!("{}:", field.label()))
}

/// Modal message shown over the main view until dismissed.
pub(crate) struct Notice {
    pub(crate) title: String,
    pub(crate) lines: Vec<String>,
    pub(crate) kind: StatusKind,
}

impl Notice {
    pub(crate) fn new<T: Into<String>>(title: T, lines: Vec<String>, kind: StatusKind) -> Self {
        Self {
            title: title.into(),
            lines,
            kind,
        }
    }

    /// Bad input and wrong-state actions are warnings; failed averages and
    /// file access are errors.
    pub(crate) fn for_error(kind: ErrorKind, lines: Vec<String>) -> Self {
        let (title, severity) = match kind {
            ErrorKind::Format => ("Warning - unsupported format", StatusKind::Warning),
            ErrorKind::State => ("Warning", StatusKind::Warning),
            ErrorKind::Compute | ErrorKind::Io => ("Error", StatusKind::Error),
        };
        Self::new(title, lines, severity)
    }
}
