//! Application state and key handling.

use crate::config::Config;
use crossterm::event::{KeyCode, KeyEvent};
use flashcard_deck::{DeckSession, FilterOutcome, Status};
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("not a card number: {0:?}")]
    NotANumber(String),
}

pub struct App {
    pub session: DeckSession,
    pub config: Config,
    pub data_folder: PathBuf,
    /// Range inputs shown in the sidebar, 1-based inclusive.
    pub range_start: usize,
    pub range_end: usize,
    /// Applied on the next range change.
    pub shuffle_on: bool,
    pub editing: bool,
    pub input_buffer: String,
    pub input_field: InputField,
    pending_start: usize,
    pub message: Option<String>,
    pub show_help: bool,
    /// Viewer processes not yet reaped.
    viewers: Vec<Child>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    None,
    RangeStart,
    RangeEnd,
}

impl App {
    pub fn new(session: DeckSession, config: Config, data_folder: PathBuf) -> Self {
        let total = session.source_len();
        let range_end = config.study.default_range_len.min(total).max(1);
        let shuffle_on = config.study.shuffle;

        Self {
            session,
            config,
            data_folder,
            range_start: 1,
            range_end,
            shuffle_on,
            editing: false,
            input_buffer: String::new(),
            input_field: InputField::None,
            pending_start: 1,
            message: None,
            show_help: false,
            viewers: Vec::new(),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        self.message = None;
        self.reap_viewers();

        if self.show_help {
            self.show_help = false;
            return;
        }

        if self.editing {
            self.handle_edit_key(key);
            return;
        }

        match key.code {
            KeyCode::Char('l') | KeyCode::Right => {
                self.session.next();
            }
            KeyCode::Char('h') | KeyCode::Left => {
                self.session.prev();
            }
            KeyCode::Char(' ') | KeyCode::Enter => self.session.flip(),
            KeyCode::Char('m') => self.mark(Status::Mastered),
            KeyCode::Char('n') => self.mark(Status::NeedsReview),
            KeyCode::Char('f') => self.filter_for_review(),
            KeyCode::Char('a') => {
                self.session.reset_to_master();
                let total = self.session.total_cards();
                self.message = Some(format!("Showing all {total} cards in range"));
            }
            KeyCode::Char('r') => {
                self.editing = true;
                self.input_field = InputField::RangeStart;
                self.input_buffer.clear();
            }
            KeyCode::Char('s') => {
                self.shuffle_on = !self.shuffle_on;
                let state = if self.shuffle_on { "on" } else { "off" };
                self.message = Some(format!("Shuffle {state} (applies to next range)"));
            }
            KeyCode::Char('R') => {
                self.session.reset_progress();
                self.message = Some("Progress reset".to_string());
            }
            KeyCode::Char('o') => self.open_visible(),
            KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
    }

    fn handle_edit_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.stop_editing(),
            KeyCode::Enter => self.finish_editing(),
            KeyCode::Backspace => {
                self.input_buffer.pop();
            }
            KeyCode::Char(c) if c.is_ascii_digit() => self.input_buffer.push(c),
            _ => {}
        }
    }

    fn finish_editing(&mut self) {
        match self.input_field {
            InputField::RangeStart => match self.parse_input(self.range_start) {
                Ok(start) => {
                    self.pending_start = start;
                    self.input_field = InputField::RangeEnd;
                    self.input_buffer.clear();
                }
                Err(e) => {
                    self.message = Some(e.to_string());
                    self.stop_editing();
                }
            },
            InputField::RangeEnd => {
                let result = self.parse_input(self.range_end);
                self.stop_editing();
                match result {
                    Ok(end) => self.apply_range(self.pending_start, end),
                    Err(e) => self.message = Some(e.to_string()),
                }
            }
            InputField::None => self.stop_editing(),
        }
    }

    fn stop_editing(&mut self) {
        self.editing = false;
        self.input_buffer.clear();
        self.input_field = InputField::None;
    }

    /// Parse the input buffer as a card number. Empty input keeps `current`.
    fn parse_input(&self, current: usize) -> Result<usize, InputError> {
        let text = self.input_buffer.trim();
        if text.is_empty() {
            return Ok(current);
        }
        let max = self.session.source_len().max(1);
        text.parse::<usize>()
            .map(|n| n.clamp(1, max))
            .map_err(|_| InputError::NotANumber(text.to_string()))
    }

    /// Store the range inputs and apply them to the deck.
    pub fn apply_range(&mut self, start: usize, end: usize) {
        self.range_start = start;
        self.range_end = end;

        match self.session.apply_range(start, end, self.shuffle_on) {
            Ok(()) => {
                self.message = Some(format!(
                    "Cards {start}-{end}{}",
                    if self.shuffle_on { " (shuffled)" } else { "" }
                ));
            }
            Err(e) => self.message = Some(format!("Invalid range: {e}")),
        }
    }

    fn filter_for_review(&mut self) {
        self.message = Some(match self.session.filter_for_review() {
            FilterOutcome::Filtered(count) => format!("Reviewing {count} unmastered cards"),
            FilterOutcome::NothingToReview => "Nothing to review in this range!".to_string(),
        });
    }

    fn mark(&mut self, status: Status) {
        match self.session.mark_status(status) {
            Ok(index) => {
                let id = self.session.pairs()[index].id;
                self.message = Some(format!("Card #{id}: {}", status.name()));
            }
            Err(e) => self.message = Some(e.to_string()),
        }
    }

    fn open_visible(&mut self) {
        let Some(viewer) = self.config.display.viewer.clone() else {
            self.message = Some("No viewer configured (set display.viewer)".to_string());
            return;
        };
        let path = match self.session.current_pair() {
            Ok(card) => card.visible_path().to_path_buf(),
            Err(e) => {
                self.message = Some(e.to_string());
                return;
            }
        };

        let mut parts = viewer.split_whitespace();
        let Some(program) = parts.next() else {
            self.message = Some("No viewer configured (set display.viewer)".to_string());
            return;
        };

        let spawned = Command::new(program)
            .args(parts)
            .arg(&path)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => {
                info!(viewer = program, path = %path.display(), "opened image");
                self.viewers.push(child);
            }
            Err(e) => {
                warn!(viewer = program, error = %e, "failed to launch viewer");
                self.message = Some(format!("Could not run {program}: {e}"));
            }
        }
    }

    /// Collect exit statuses of viewers that have finished.
    fn reap_viewers(&mut self) {
        self.viewers.retain_mut(|child| match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                debug!(pid = child.id(), %status, "viewer exited");
                false
            }
            Err(e) => {
                warn!(pid = child.id(), error = %e, "failed to poll viewer");
                false
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use flashcard_deck::Pair;

    fn app(n: usize) -> App {
        let pairs = (1..=n as u64)
            .map(|i| Pair::new(i, format!("front/f{i}.png"), format!("back/b{i}.png")))
            .collect();
        App::new(DeckSession::new(pairs), Config::default(), PathBuf::from("Data"))
    }

    fn press(app: &mut App, code: KeyCode) {
        app.handle_key(KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_initial_range_inputs() {
        let small = app(4);
        assert_eq!((small.range_start, small.range_end), (1, 4));
        assert_eq!(small.session.master(), &[0, 1, 2, 3]);

        let large = app(25);
        assert_eq!(large.range_end, 10);
    }

    #[test]
    fn test_range_editing_applies() {
        let mut app = app(5);
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.input_field, InputField::RangeStart);
        type_str(&mut app, "2");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_field, InputField::RangeEnd);
        type_str(&mut app, "4");
        press(&mut app, KeyCode::Enter);

        assert!(!app.editing);
        assert_eq!(app.session.master(), &[1, 2, 3]);
        assert_eq!((app.range_start, app.range_end), (2, 4));
    }

    #[test]
    fn test_inverted_range_rejected() {
        let mut app = app(10);
        press(&mut app, KeyCode::Char('r'));
        type_str(&mut app, "5");
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "3");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.session.total_cards(), 10);
        assert!(app.message.as_deref().unwrap().starts_with("Invalid range"));
    }

    #[test]
    fn test_range_input_clamped_and_escape_cancels() {
        let mut app = app(6);
        press(&mut app, KeyCode::Char('r'));
        press(&mut app, KeyCode::Enter);
        type_str(&mut app, "99");
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.range_end, 6);

        press(&mut app, KeyCode::Char('r'));
        type_str(&mut app, "3");
        press(&mut app, KeyCode::Esc);
        assert!(!app.editing);
        assert_eq!(app.range_start, 1);
    }

    #[test]
    fn test_review_flow_by_keys() {
        let mut app = app(5);
        app.apply_range(2, 4);
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('n'));
        press(&mut app, KeyCode::Char('f'));

        assert_eq!(app.session.active(), &[2, 3]);
        assert_eq!(app.message.as_deref(), Some("Reviewing 2 unmastered cards"));

        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.session.active(), &[1, 2, 3]);
    }

    #[test]
    fn test_nothing_to_review_message() {
        let mut app = app(1);
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.message.as_deref(), Some("Nothing to review in this range!"));
        assert_eq!(app.session.active(), &[0]);
    }

    #[test]
    fn test_shuffle_toggle_used_on_apply() {
        let mut app = app(30);
        press(&mut app, KeyCode::Char('s'));
        assert!(app.shuffle_on);
        app.apply_range(1, 30);

        let mut sorted = app.session.master().to_vec();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..30).collect::<Vec<_>>());
        assert!(app.message.as_deref().unwrap().ends_with("(shuffled)"));
    }

    #[test]
    fn test_flip_and_help_overlay() {
        let mut app = app(2);
        press(&mut app, KeyCode::Char(' '));
        assert!(app.session.is_flipped());

        press(&mut app, KeyCode::Char('?'));
        assert!(app.show_help);
        press(&mut app, KeyCode::Right);
        assert!(!app.show_help);
        assert_eq!(app.session.cursor(), 0);
    }

    #[test]
    fn test_open_without_viewer() {
        let mut app = app(2);
        press(&mut app, KeyCode::Char('o'));
        assert_eq!(app.message.as_deref(), Some("No viewer configured (set display.viewer)"));
    }

    #[cfg(unix)]
    #[test]
    fn test_finished_viewers_are_reaped() {
        let mut app = app(2);
        app.config.display.viewer = Some("true".to_string());
        press(&mut app, KeyCode::Char('o'));
        assert_eq!(app.viewers.len(), 1);

        for _ in 0..200 {
            app.reap_viewers();
            if app.viewers.is_empty() {
                break;
            }
            std::thread::sleep(std::time::Duration::from_millis(10));
        }
        assert!(app.viewers.is_empty());

        press(&mut app, KeyCode::Right);
        assert!(app.viewers.is_empty());
    }

    #[test]
    fn test_reset_progress_key() {
        let mut app = app(3);
        press(&mut app, KeyCode::Char('m'));
        press(&mut app, KeyCode::Char('R'));
        assert_eq!(app.session.progress().mastered, 0);
    }
}
