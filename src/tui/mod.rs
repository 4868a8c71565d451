pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;
pub use theme::{resolve_theme, Theme, ThemeColors};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

use crate::slip::SlipStore;

/// Key polling interval; also how often flash expiry and day rollover are checked.
const TICK_RATE_MS: u64 = 250;

pub fn run_tui<S: SlipStore>(mut app: App<S>) -> anyhow::Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();
    let events = EventHandler::new(TICK_RATE_MS);

    let result = loop {
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            break Err(e.into());
        }

        match events.next() {
            Ok(Event::Key(key)) => handle_key_event(&mut app, key),
            Ok(Event::Tick) => app.on_tick(),
            Err(e) => break Err(e.into()),
        }

        if app.should_quit {
            break Ok(());
        }
    };

    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    result
}

pub fn handle_key_event<S: SlipStore>(app: &mut App<S>, key: KeyEvent) {
    match app.input_mode {
        app::InputMode::Normal => match key.code {
            // Quit
            KeyCode::Char('q') => app.should_quit = true,
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.should_quit = true
            }

            // Navigation
            KeyCode::Char('j') | KeyCode::Down => app.next_row(),
            KeyCode::Char('k') | KeyCode::Up => app.previous_row(),
            KeyCode::Char('g') | KeyCode::Home => app.first_row(),
            KeyCode::Char('G') | KeyCode::End => app.last_row(),

            // Stepper
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Char('l') | KeyCode::Right => {
                app.step_selected(1)
            }
            KeyCode::Char('-') | KeyCode::Char('h') | KeyCode::Left => app.step_selected(-1),

            // Typing a count
            KeyCode::Enter | KeyCode::Char('e') => app.start_edit(),
            KeyCode::Char(c) if c.is_ascii_digit() => {
                app.start_edit();
                app.edit_buffer.clear();
                app.push_edit_char(c);
            }

            KeyCode::Char('R') => app.start_reset_confirm(),
            KeyCode::Char('z') => app.undo_last(),
            KeyCode::Char('?') => app.show_help(),

            _ => {}
        },
        app::InputMode::Editing => match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Tab => app.finish_edit(),
            KeyCode::Down => {
                app.finish_edit();
                app.next_row();
            }
            KeyCode::Up => {
                app.finish_edit();
                app.previous_row();
            }
            KeyCode::Backspace => app.pop_edit_char(),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                app.finish_edit();
                app.should_quit = true;
            }
            // Anything typed goes through the digit filter, as in a number field
            KeyCode::Char(c) => app.push_edit_char(c),
            _ => {}
        },
        app::InputMode::ConfirmReset => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_reset(),
            _ => app.cancel_reset(),
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{default_categories, BonusRule};
    use crate::slip::{MemoryStore, ScoreSheet};
    use app::InputMode;
    use chrono::NaiveDate;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 16).unwrap()
    }

    fn test_app() -> App<MemoryStore> {
        let sheet = ScoreSheet::load(
            default_categories(),
            BonusRule::default(),
            MemoryStore::new(),
            today,
        );
        App::new(sheet, ThemeColors::dark())
    }

    fn press(app: &mut App<MemoryStore>, code: KeyCode) {
        handle_key_event(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    fn type_str(app: &mut App<MemoryStore>, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    #[test]
    fn test_quit_keys() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);

        let mut app = test_app();
        handle_key_event(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
        );
        assert!(app.should_quit);
    }

    #[test]
    fn test_digit_starts_fresh_edit() {
        let mut app = test_app();
        app.sheet.set_count(0, 9).unwrap();
        type_str(&mut app, "25");
        assert_eq!(app.input_mode, InputMode::Editing);
        assert_eq!(app.sheet.count(0), Some(25));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn test_edit_filters_letters() {
        let mut app = test_app();
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Backspace);
        type_str(&mut app, "1a2-3");
        assert_eq!(app.sheet.count(0), Some(123));
        assert_eq!(app.edit_buffer, "123");
    }

    #[test]
    fn test_edit_then_move_down() {
        let mut app = test_app();
        type_str(&mut app, "7");
        press(&mut app, KeyCode::Down);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.selected_index(), Some(1));
        assert_eq!(app.sheet.count(0), Some(7));
    }

    #[test]
    fn test_stepper_keys() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('+'));
        press(&mut app, KeyCode::Right);
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.sheet.count(0), Some(3));
        press(&mut app, KeyCode::Char('-'));
        assert_eq!(app.sheet.count(0), Some(2));
    }

    #[test]
    fn test_reset_requires_confirmation() {
        let mut app = test_app();
        app.sheet.set_count(0, 5).unwrap();

        press(&mut app, KeyCode::Char('R'));
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.sheet.count(0), Some(5));

        press(&mut app, KeyCode::Char('R'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.sheet.count(0), Some(0));
        assert_eq!(app.sheet.total_points(), 0);
    }

    #[test]
    fn test_lowercase_r_does_not_reset() {
        let mut app = test_app();
        app.sheet.set_count(0, 5).unwrap();
        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.sheet.count(0), Some(5));
    }

    #[test]
    fn test_help_any_key_closes() {
        let mut app = test_app();
        press(&mut app, KeyCode::Char('?'));
        assert_eq!(app.input_mode, InputMode::Help);
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(!app.should_quit);
    }

    #[test]
    fn test_undo_key() {
        let mut app = test_app();
        type_str(&mut app, "40");
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('z'));
        assert_eq!(app.sheet.count(0), Some(0));
    }
}
