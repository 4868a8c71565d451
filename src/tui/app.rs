use crate::slip::{strip_non_digits, ScoreSheet, SlipStore};
use crate::tui::theme::ThemeColors;
use std::collections::VecDeque;
use std::time::Instant;

const MAX_UNDO: usize = 50;
const FLASH_SECS: u64 = 3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
    ConfirmReset,
    Help,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FlashKind {
    Success,
    Error,
    Info,
}

#[derive(Debug, Clone, PartialEq)]
pub enum UndoAction {
    Changed { index: usize, previous: u32 },
    Reset { counts: Vec<u32> },
}

pub struct App<S: SlipStore> {
    pub sheet: ScoreSheet<S>,
    pub table_state: ratatui::widgets::TableState,
    pub input_mode: InputMode,
    pub edit_buffer: String,
    pub flash_message: Option<(String, FlashKind, Instant)>,
    pub undo_stack: VecDeque<UndoAction>,
    pub should_quit: bool,
    pub colors: ThemeColors,
}

impl<S: SlipStore> App<S> {
    pub fn new(sheet: ScoreSheet<S>, colors: ThemeColors) -> Self {
        let mut table_state = ratatui::widgets::TableState::default();
        if !sheet.is_empty() {
            table_state.select(Some(0));
        }

        Self {
            sheet,
            table_state,
            input_mode: InputMode::Normal,
            edit_buffer: String::new(),
            flash_message: None,
            undo_stack: VecDeque::new(),
            should_quit: false,
            colors,
        }
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.table_state.selected().filter(|&i| i < self.sheet.len())
    }

    pub fn next_row(&mut self) {
        let len = self.sheet.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous_row(&mut self) {
        let len = self.sheet.len();
        if len == 0 {
            return;
        }
        let i = match self.table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.table_state.select(Some(i));
    }

    pub fn first_row(&mut self) {
        if !self.sheet.is_empty() {
            self.table_state.select(Some(0));
        }
    }

    pub fn last_row(&mut self) {
        let len = self.sheet.len();
        if len > 0 {
            self.table_state.select(Some(len - 1));
        }
    }

    pub fn push_undo(&mut self, action: UndoAction) {
        self.undo_stack.push_front(action);
        if self.undo_stack.len() > MAX_UNDO {
            self.undo_stack.pop_back();
        }
    }

    pub fn show_flash(&mut self, msg: String, kind: FlashKind) {
        self.flash_message = Some((msg, kind, Instant::now()));
    }

    pub fn update_flash(&mut self) {
        if let Some((_, _, shown_at)) = self.flash_message {
            if shown_at.elapsed().as_secs() >= FLASH_SECS {
                self.flash_message = None;
            }
        }
    }

    /// Flash a save error; the change itself already happened in memory.
    fn report_save(&mut self, result: anyhow::Result<()>) {
        if let Err(e) = result {
            self.show_flash(format!("Failed to save slip: {:#}", e), FlashKind::Error);
        }
    }

    /// Step the selected count by `delta` (stepper +/-)
    pub fn step_selected(&mut self, delta: i64) {
        let Some(index) = self.selected_index() else {
            return;
        };
        self.sync_day();
        let previous = self.sheet.count(index).unwrap_or_default();
        let result = self.sheet.step(index, delta);
        if self.sheet.count(index) != Some(previous) {
            self.push_undo(UndoAction::Changed { index, previous });
        }
        self.report_save(result);
    }

    /// Start typing into the selected count field
    pub fn start_edit(&mut self) {
        let Some(index) = self.selected_index() else {
            return;
        };
        self.sync_day();
        let previous = self.sheet.count(index).unwrap_or_default();
        self.push_undo(UndoAction::Changed { index, previous });
        self.edit_buffer = previous.to_string();
        self.input_mode = InputMode::Editing;
    }

    /// Type a character into the count field; non-digits never reach the buffer
    pub fn push_edit_char(&mut self, c: char) {
        self.edit_buffer.push(c);
        self.edit_buffer = strip_non_digits(&self.edit_buffer);
        self.apply_edit();
    }

    pub fn pop_edit_char(&mut self) {
        self.edit_buffer.pop();
        self.apply_edit();
    }

    /// Every keystroke is saved, like the form field it replaces.
    fn apply_edit(&mut self) {
        let Some(index) = self.selected_index() else {
            return;
        };
        // An edit begun before midnight is abandoned with the old slip
        if self.sync_day() {
            return;
        }
        let result = self.sheet.set_count_text(index, &self.edit_buffer);

        // Show the clamped value once typing goes past the maximum
        let typed = self.edit_buffer.parse::<u64>();
        if let (Ok(typed), Some(count)) = (typed, self.sheet.count(index)) {
            if typed != u64::from(count) {
                self.edit_buffer = count.to_string();
            }
        }
        self.report_save(result);
    }

    pub fn finish_edit(&mut self) {
        // Drop the undo entry when nothing changed
        if let Some(&UndoAction::Changed { index, previous }) = self.undo_stack.front() {
            if self.sheet.count(index) == Some(previous) {
                self.undo_stack.pop_front();
            }
        }
        self.input_mode = InputMode::Normal;
        self.edit_buffer.clear();
    }

    pub fn start_reset_confirm(&mut self) {
        self.input_mode = InputMode::ConfirmReset;
    }

    pub fn cancel_reset(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn confirm_reset(&mut self) {
        self.input_mode = InputMode::Normal;
        self.sync_day();
        let counts = self.sheet.counts().to_vec();
        let result = self.sheet.reset();
        self.push_undo(UndoAction::Reset { counts });
        match result {
            Ok(()) => self.show_flash("Slip reset (z to undo)".to_string(), FlashKind::Success),
            Err(e) => self.report_save(Err(e)),
        }
    }

    /// Undo the last count change or reset
    pub fn undo_last(&mut self) {
        self.sync_day();
        let action = match self.undo_stack.pop_front() {
            Some(action) => action,
            None => {
                self.show_flash("Nothing to undo".to_string(), FlashKind::Info);
                return;
            }
        };

        let (result, msg) = match action {
            UndoAction::Changed { index, previous } => {
                self.table_state.select(Some(index));
                (
                    self.sheet.set_count(index, i64::from(previous)),
                    format!("Restored count to {}", previous),
                )
            }
            UndoAction::Reset { counts } => {
                (self.sheet.restore(&counts), "Undid reset".to_string())
            }
        };

        match result {
            Ok(()) => self.show_flash(msg, FlashKind::Success),
            Err(e) => self.report_save(Err(e)),
        }
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    /// Periodic housekeeping: expire flash messages and start a new slip after midnight
    pub fn on_tick(&mut self) {
        self.update_flash();
        self.sync_day();
    }

    /// Start a new slip if the day changed, dropping undo history from the old day.
    ///
    /// Runs before every change so undo never carries counts across midnight.
    /// Returns true when the counts were reset.
    fn sync_day(&mut self) -> bool {
        let result = self.sheet.roll_over();
        // An error here means the reset happened but saving it failed
        let rolled = !matches!(result, Ok(false));
        if rolled {
            self.undo_stack.clear();
            if self.input_mode == InputMode::Editing {
                self.input_mode = InputMode::Normal;
                self.edit_buffer.clear();
            }
        }
        match result {
            Ok(true) => self.show_flash("New day: slip reset".to_string(), FlashKind::Info),
            Ok(false) => {}
            Err(e) => self.report_save(Err(e)),
        }
        rolled
    }
}
