use crossterm::event::KeyCode;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap};
use ratatui::Frame;
use tracing::info;

use crate::catalog::Catalog;
use crate::db::DatabaseFile;
use crate::error::RentalError;

use super::forms::{MovieField, MovieForm, Notice};
use super::helpers::{average_label, centered_rect, rating_cell, surface_error};

/// Entry panel height: three fields plus the border.
const FORM_HEIGHT: u16 = 5;
/// Footer space reserved for status, average and instructions.
const FOOTER_HEIGHT: u16 = 4;

/// Which panel receives plain key presses.
#[derive(Copy, Clone, PartialEq, Eq)]
enum Focus {
    Table,
    Form,
}

/// A notice blocks every key except the ones that dismiss it.
enum Mode {
    Normal,
    Notice(Notice),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer and on notices.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum StatusKind {
    Info,
    Warning,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Warning => Style::default().fg(Color::Yellow),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Session state: the catalog, the file it came from and everything the
/// screen needs to render.
pub struct App {
    catalog: Catalog,
    database: DatabaseFile,
    selected: Option<usize>,
    form: MovieForm,
    focus: Focus,
    mode: Mode,
    status: Option<StatusMessage>,
    average: Option<f64>,
}

impl App {
    pub fn new(catalog: Catalog, database: DatabaseFile) -> Self {
        let average = catalog.average_rating().ok();
        Self {
            catalog,
            database,
            selected: None,
            form: MovieForm::default(),
            focus: Focus::Form,
            mode: Mode::Normal,
            status: None,
            average,
        }
    }

    /// Load the database and build the session around it. A failed load is
    /// reported on screen and leaves an empty, usable catalog.
    pub fn open(database: DatabaseFile) -> Self {
        match database.load() {
            Ok(records) => {
                let mut app = Self::new(Catalog::from_records(records), database);
                app.set_status("No errors found.", StatusKind::Info);
                app
            }
            Err(err) => {
                let mut app = Self::new(Catalog::new(), database);
                let text = "Error while loading a database.";
                app.report_error(&err, text, vec![text.to_string(), surface_error(&err)]);
                app
            }
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// Route one key press. Returns `true` when the user asked to close.
    pub fn handle_key(&mut self, code: KeyCode) -> bool {
        if let Mode::Notice(_) = self.mode {
            if matches!(code, KeyCode::Enter | KeyCode::Esc) {
                self.mode = Mode::Normal;
            }
            return false;
        }

        match self.focus {
            Focus::Form => {
                self.handle_form_key(code);
                false
            }
            Focus::Table => self.handle_table_key(code),
        }
    }

    pub(crate) fn handle_ctrl_s(&mut self) {
        if matches!(self.mode, Mode::Normal) {
            self.save();
        }
    }

    /// Save on the way out and put up the "Saving..." notice. The caller exits
    /// afterwards whatever the outcome.
    pub fn autosave(&mut self) {
        let saved = self.save();
        info!(saved, "autosave before exit");
        self.mode = Mode::Notice(Notice::new(
            "Autosave",
            vec!["Saving...".to_string()],
            StatusKind::Info,
        ));
    }

    /// Write the catalog to disk. Returns whether the write succeeded; failures
    /// are already reported on screen.
    pub fn save(&mut self) -> bool {
        match self.database.save(self.catalog.records()) {
            Ok(()) => {
                self.set_status("Saving successful.", StatusKind::Info);
                true
            }
            Err(err) => {
                self.report_error(
                    &err,
                    "Error while saving database.",
                    vec![
                        "Error while saving database. Process not successful.".to_string(),
                        surface_error(&err),
                    ],
                );
                false
            }
        }
    }

    fn handle_table_key(&mut self, code: KeyCode) -> bool {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return true,
            KeyCode::Up => self.move_selection(-1),
            KeyCode::Down => self.move_selection(1),
            KeyCode::Home => self.selected = (!self.catalog.is_empty()).then_some(0),
            KeyCode::End => self.selected = self.catalog.len().checked_sub(1),
            KeyCode::Char('a') | KeyCode::Tab => self.focus = Focus::Form,
            KeyCode::Char('d') | KeyCode::Delete => self.delete_selected(),
            KeyCode::Char('r') => self.rent_selected(),
            KeyCode::Char('c') => self.collect_selected(),
            KeyCode::Char('s') => {
                self.save();
            }
            _ => {}
        }
        false
    }

    fn handle_form_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Esc => self.focus = Focus::Table,
            KeyCode::Tab | KeyCode::Down => self.form.focus_next(),
            KeyCode::BackTab | KeyCode::Up => self.form.focus_previous(),
            KeyCode::Enter => {
                if self.form.active == MovieField::Genre {
                    self.add_from_form();
                } else {
                    self.form.focus_next();
                }
            }
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Char(ch) => {
                if self.form.push_char(ch) {
                    self.form.error = None;
                }
            }
            _ => {}
        }
    }

    fn add_from_form(&mut self) {
        match self
            .catalog
            .add(&self.form.name, &self.form.rating, &self.form.genre)
        {
            Ok(position) => {
                self.selected = Some(position);
                self.form.clear();
                self.set_status("Adding successful.", StatusKind::Info);
                self.refresh_average();
            }
            Err(err) => {
                self.form.error = Some(err.to_string());
                self.form.focus(MovieField::Rating);
                let text = "Error while adding a new record. Format not supported.";
                self.report_error(
                    &err,
                    text,
                    vec![
                        text.to_string(),
                        "Supported formats are:".to_string(),
                        "X/Y".to_string(),
                        "X.X".to_string(),
                    ],
                );
            }
        }
    }

    /// Remove the selected row. Nothing happens without a selection.
    fn delete_selected(&mut self) {
        let Some(removed) = self.catalog.delete(self.selected) else {
            return;
        };
        self.selected = self
            .selected
            .zip(self.catalog.len().checked_sub(1))
            .map(|(selected, last)| selected.min(last));
        self.set_status(format!("Deleted {}.", removed.name), StatusKind::Info);
        self.refresh_average();
    }

    fn rent_selected(&mut self) {
        match self.catalog.rent(self.selected) {
            Ok(position) => {
                self.selected = Some(position);
                self.set_status("Renting successful.", StatusKind::Info);
                self.refresh_average();
            }
            Err(err) => self.report_state_error(&err, "Cannot rent already rented movie!"),
        }
    }

    fn collect_selected(&mut self) {
        match self.catalog.collect(self.selected) {
            Ok(position) => {
                self.selected = Some(position);
                self.set_status("Collection successful.", StatusKind::Info);
                self.refresh_average();
            }
            Err(err) => self.report_state_error(&err, "Cannot collect not rented movie!"),
        }
    }

    fn report_state_error(&mut self, err: &RentalError, wrong_state: &str) {
        let text = match err {
            RentalError::NoSelection => "No movie selected.",
            _ => wrong_state,
        };
        self.report_error(err, text, vec![text.to_string()]);
    }

    fn refresh_average(&mut self) {
        match self.catalog.average_rating() {
            Ok(average) => self.average = Some(average),
            Err(err) => {
                self.average = None;
                let text = "Error while updating average rating.";
                self.report_error(&err, text, vec![text.to_string(), surface_error(&err)]);
            }
        }
    }

    fn move_selection(&mut self, offset: isize) {
        let Some(last) = self.catalog.len().checked_sub(1) else {
            self.selected = None;
            return;
        };
        let next = match self.selected {
            None => 0,
            Some(current) => current.saturating_add_signed(offset).min(last),
        };
        self.selected = Some(next);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    /// Footer message plus a modal notice whose title and severity follow
    /// the error kind.
    fn report_error(&mut self, err: &RentalError, status: &str, lines: Vec<String>) {
        let notice = Notice::for_error(err.kind(), lines);
        self.set_status(status, notice.kind);
        self.mode = Mode::Notice(notice);
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(FORM_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_form(frame, chunks[0]);
        self.draw_table(frame, chunks[1]);
        self.draw_footer(frame, chunks[2]);

        if let Mode::Notice(notice) = &self.mode {
            self.draw_notice(frame, area, notice);
        }
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect) {
        let focused = self.focus == Focus::Form;
        let mut block = Block::default().borders(Borders::ALL).title("New Movie");
        if focused {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }
        if let Some(error) = &self.form.error {
            block = block.title_bottom(Line::from(Span::styled(
                format!(" {error} "),
                Style::default().fg(Color::Red),
            )));
        }
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let lines: Vec<Line> = MovieField::ALL
            .iter()
            .map(|field| self.form.build_line(*field, focused))
            .collect();
        frame.render_widget(Paragraph::new(lines), inner);

        if focused && matches!(self.mode, Mode::Normal) {
            let field = self.form.active;
            frame.set_cursor_position((
                inner.x.saturating_add(self.form.cursor_offset(field)),
                inner.y.saturating_add(field.row()),
            ));
        }
    }

    fn draw_table(&self, frame: &mut Frame, area: Rect) {
        let mut block = Block::default().borders(Borders::ALL).title("Movies");
        if self.focus == Focus::Table {
            block = block.border_style(Style::default().fg(Color::Yellow));
        }

        if self.catalog.is_empty() {
            let message = Paragraph::new("No movies yet. Fill in the form above to add one.")
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(message, area);
            return;
        }

        let header = Row::new(["Name", "Rating", "Genre", "Availability"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows = self.catalog.records().iter().map(|record| {
            let style = if record.is_available() {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Row::new(vec![
                Cell::from(record.name.clone()),
                Cell::from(rating_cell(record.rating)),
                Cell::from(record.genre.clone()),
                Cell::from(record.availability.to_string()),
            ])
            .style(style)
        });

        let table = Table::new(
            rows,
            [
                Constraint::Percentage(40),
                Constraint::Percentage(15),
                Constraint::Percentage(25),
                Constraint::Percentage(20),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(self.selected);
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP).title(
            Line::from(Span::styled(
                format!(" {} ", self.database.path().display()),
                Style::default().fg(Color::DarkGray),
            ))
            .right_aligned(),
        );
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };
        let average_line = Line::from(Span::styled(
            average_label(self.average),
            Style::default().add_modifier(Modifier::BOLD),
        ));

        let paragraph = Paragraph::new(vec![status_line, average_line, self.footer_instructions()])
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        match (&self.mode, self.focus) {
            (Mode::Notice(_), _) => Line::from(vec![
                Span::styled("[Enter]", key_style),
                Span::raw(" Dismiss"),
            ]),
            (Mode::Normal, Focus::Form) => Line::from(vec![
                Span::styled("[Tab]", key_style),
                Span::raw(" Next Field   "),
                Span::styled("[Enter]", key_style),
                Span::raw(" Next / Add   "),
                Span::styled("[Ctrl+S]", key_style),
                Span::raw(" Save   "),
                Span::styled("[Esc]", key_style),
                Span::raw(" Table"),
            ]),
            (Mode::Normal, Focus::Table) => Line::from(vec![
                Span::styled("[↑↓]", key_style),
                Span::raw(" Select   "),
                Span::styled("[a]", key_style),
                Span::raw(" Add   "),
                Span::styled("[d]", key_style),
                Span::raw(" Delete   "),
                Span::styled("[r]", key_style),
                Span::raw(" Rent   "),
                Span::styled("[c]", key_style),
                Span::raw(" Collect   "),
                Span::styled("[s]", key_style),
                Span::raw(" Save   "),
                Span::styled("[q]", key_style),
                Span::raw(" Quit"),
            ]),
        }
    }

    fn draw_notice(&self, frame: &mut Frame, area: Rect, notice: &Notice) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(notice.title.clone())
            .borders(Borders::ALL)
            .border_style(notice.kind.style());
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines: Vec<Line> = notice
            .lines
            .iter()
            .map(|line| Line::from(line.clone()))
            .collect();
        if notice.kind != StatusKind::Info {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                "Press Enter or Esc to dismiss.",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tempfile::TempDir;

    use super::*;
    use crate::models::Availability;

    fn open_with(contents: Option<&str>) -> (TempDir, App) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("database.txt");
        if let Some(contents) = contents {
            fs::write(&path, contents).unwrap();
        }
        let app = App::open(DatabaseFile::new(path));
        (dir, app)
    }

    fn status(app: &App) -> &str {
        app.status.as_ref().map(|s| s.text.as_str()).unwrap_or("")
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch));
        }
    }

    fn add_movie(app: &mut App, name: &str, rating: &str, genre: &str) {
        app.focus = Focus::Form;
        type_text(app, name);
        app.handle_key(KeyCode::Enter);
        type_text(app, rating);
        app.handle_key(KeyCode::Enter);
        type_text(app, genre);
        app.handle_key(KeyCode::Enter);
    }

    fn render(app: &App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    #[test]
    fn missing_database_opens_empty_with_an_error() {
        let (_dir, mut app) = open_with(None);
        assert!(app.catalog().is_empty());
        assert_eq!(status(&app), "Error while loading a database.");
        assert!(matches!(app.mode, Mode::Notice(_)));

        app.handle_key(KeyCode::Enter);
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn malformed_database_loads_nothing() {
        let (_dir, app) = open_with(Some("A;1.0;x;available;\nB;x;y;available;\n"));
        assert!(app.catalog().is_empty());
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Error);
    }

    #[test]
    fn clean_load_reports_no_errors_and_average() {
        let (_dir, app) = open_with(Some(
            "a;0.5;x;available;\nb;0.75;x;unavailable;\nc;1.0;x;available;\n",
        ));
        assert_eq!(status(&app), "No errors found.");
        assert_eq!(app.catalog().len(), 3);
        assert_eq!(app.average, Some(0.75));
        assert_eq!(app.catalog().get(2).unwrap().name, "b");
    }

    #[test]
    fn form_flow_adds_and_clears() {
        let (_dir, mut app) = open_with(Some(""));
        add_movie(&mut app, "Heat", "3/4", "Crime");

        assert_eq!(status(&app), "Adding successful.");
        assert_eq!(app.catalog().len(), 1);
        let record = app.catalog().get(0).unwrap();
        assert_eq!(record.rating, 0.75);
        assert_eq!(record.genre, "Crime");
        assert!(app.form.name.is_empty() && app.form.rating.is_empty());
        assert_eq!(app.form.active, MovieField::Name);
        assert_eq!(app.selected, Some(0));
        assert_eq!(app.average, Some(0.75));
    }

    #[test]
    fn unsupported_rating_keeps_the_form_and_blocks_keys() {
        let (_dir, mut app) = open_with(Some(""));
        add_movie(&mut app, "Heat", "abc", "Crime");

        assert!(app.catalog().is_empty());
        assert_eq!(
            status(&app),
            "Error while adding a new record. Format not supported."
        );
        assert_eq!(app.form.name, "Heat");
        assert_eq!(app.form.active, MovieField::Rating);

        app.handle_key(KeyCode::Char('x'));
        assert_eq!(app.form.rating, "abc");
        app.handle_key(KeyCode::Esc);
        assert!(matches!(app.mode, Mode::Normal));
    }

    #[test]
    fn rent_and_collect_from_the_table() {
        let (_dir, mut app) = open_with(Some("Alien;0.9;Horror;available;\nBrazil;0.6;Satire;available;\n"));
        app.handle_key(KeyCode::Esc);
        app.handle_key(KeyCode::Down);
        assert_eq!(app.selected, Some(0));

        app.handle_key(KeyCode::Char('r'));
        assert_eq!(status(&app), "Renting successful.");
        assert_eq!(app.selected, Some(1));
        assert_eq!(
            app.catalog().get(1).unwrap().availability,
            Availability::Unavailable
        );

        app.handle_key(KeyCode::Char('r'));
        assert_eq!(status(&app), "Cannot rent already rented movie!");
        app.handle_key(KeyCode::Enter);

        app.handle_key(KeyCode::Char('c'));
        assert_eq!(status(&app), "Collection successful.");
        assert_eq!(app.selected, Some(0));

        app.handle_key(KeyCode::Char('c'));
        assert_eq!(status(&app), "Cannot collect not rented movie!");
    }

    fn notice(app: &App) -> &Notice {
        match &app.mode {
            Mode::Notice(notice) => notice,
            Mode::Normal => panic!("no notice open"),
        }
    }

    #[test]
    fn notice_severity_follows_the_error_kind() {
        let (_dir, mut app) = open_with(None);
        assert_eq!(notice(&app).title, "Error");
        assert_eq!(notice(&app).kind, StatusKind::Error);
        app.handle_key(KeyCode::Enter);

        add_movie(&mut app, "Heat", "x/y", "Crime");
        assert_eq!(notice(&app).title, "Warning - unsupported format");
        assert_eq!(app.status.as_ref().unwrap().kind, StatusKind::Warning);
        app.handle_key(KeyCode::Enter);

        app.handle_key(KeyCode::Esc);
        app.handle_key(KeyCode::Char('c'));
        assert_eq!(notice(&app).title, "Warning");
        assert_eq!(notice(&app).kind, StatusKind::Warning);
    }

    #[test]
    fn long_field_keeps_the_cursor_in_range() {
        let (_dir, mut app) = open_with(Some(""));
        app.form.name = "x".repeat(usize::from(u16::MAX) + 10);
        let screen = render(&app);
        assert!(screen.contains("New Movie"));
    }

    #[test]
    fn state_changes_need_a_selection() {
        let (_dir, mut app) = open_with(Some("Alien;0.9;Horror;available;\n"));
        app.handle_key(KeyCode::Esc);
        app.handle_key(KeyCode::Char('r'));
        assert_eq!(status(&app), "No movie selected.");
    }

    #[test]
    fn delete_without_selection_is_silent() {
        let (_dir, mut app) = open_with(Some("Alien;0.9;Horror;available;\n"));
        app.handle_key(KeyCode::Esc);
        app.handle_key(KeyCode::Char('d'));
        assert_eq!(app.catalog().len(), 1);
        assert_eq!(status(&app), "No errors found.");
    }

    #[test]
    fn deleting_the_last_movie_reports_the_average_error() {
        let (_dir, mut app) = open_with(Some("Alien;0.9;Horror;available;\n"));
        app.handle_key(KeyCode::Esc);
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Char('d'));

        assert!(app.catalog().is_empty());
        assert_eq!(app.selected, None);
        assert_eq!(app.average, None);
        assert_eq!(status(&app), "Error while updating average rating.");
    }

    #[test]
    fn save_and_quit_write_the_database() {
        let (dir, mut app) = open_with(Some(""));
        add_movie(&mut app, "Heat", "4", "Crime");
        app.handle_ctrl_s();
        assert_eq!(status(&app), "Saving successful.");

        add_movie(&mut app, "Up", "3", "Animation");
        app.handle_key(KeyCode::Esc);
        assert!(app.handle_key(KeyCode::Char('q')));
        app.autosave();

        let contents = fs::read_to_string(dir.path().join("database.txt")).unwrap();
        assert!(contents.starts_with("Heat;4.0;Crime;available;"));
        assert!(contents.contains("Up;3.0;Animation;available;"));
        assert!(matches!(app.mode, Mode::Notice(_)));
    }

    #[test]
    fn save_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let database = DatabaseFile::new(dir.path().join("missing").join("database.txt"));
        let mut app = App::new(Catalog::new(), database);
        assert!(!app.save());
        assert_eq!(status(&app), "Error while saving database.");
    }

    #[test]
    fn renders_table_and_average() {
        let (_dir, app) = open_with(Some("Alien;0.5;Horror;available;\nJaws;1.0;Thriller;unavailable;\n"));
        let screen = render(&app);
        assert!(screen.contains("Alien"));
        assert!(screen.contains("unavailable"));
        assert!(screen.contains("Average rating: 0.75"));
        assert!(screen.contains("No errors found."));
    }

    #[test]
    fn footer_shows_where_the_database_lives() {
        let dir = tempfile::tempdir().unwrap();
        let app = App::new(Catalog::new(), DatabaseFile::new(dir.path().join("shop.txt")));
        assert!(render(&app).contains("shop.txt"));
    }

    #[test]
    fn renders_notice_over_the_table() {
        let (_dir, app) = open_with(None);
        let screen = render(&app);
        assert!(screen.contains("Error while loading a database."));
        assert!(screen.contains("Average rating: -"));
    }
}
