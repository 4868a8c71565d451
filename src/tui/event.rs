use crossterm::event::{KeyEvent, KeyEventKind};
use std::time::Duration;

#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    Tick,
}

/// Blocking event source: a key press, or a tick once `tick_rate` passes without one.
pub struct EventHandler {
    tick_rate: Duration,
}

impl EventHandler {
    pub fn new(tick_rate_ms: u64) -> Self {
        EventHandler {
            tick_rate: Duration::from_millis(tick_rate_ms),
        }
    }

    pub fn next(&self) -> std::io::Result<Event> {
        if crossterm::event::poll(self.tick_rate)? {
            if let crossterm::event::Event::Key(key) = crossterm::event::read()? {
                // Filter for Press only (Windows compatibility)
                if key.kind == KeyEventKind::Press {
                    return Ok(Event::Key(key));
                }
            }
        }
        Ok(Event::Tick)
    }
}
