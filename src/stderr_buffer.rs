use std::sync::{Mutex, MutexGuard};

static BUFFER: Mutex<Option<Vec<String>>> = Mutex::new(None);

// A panic while holding the lock leaves the buffer usable; warnings are best-effort.
fn buffer() -> MutexGuard<'static, Option<Vec<String>>> {
    BUFFER.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Start holding warnings back. Used while the TUI owns the terminal.
pub fn activate() {
    *buffer() = Some(Vec::new());
}

/// Stop holding warnings back and hand over everything collected.
pub fn drain() -> Vec<String> {
    buffer().take().unwrap_or_default()
}

pub fn is_active() -> bool {
    buffer().is_some()
}

/// Print `msg` to stderr, or keep it for later if buffering is active.
pub fn warn(msg: String) {
    let mut guard = buffer();
    match guard.as_mut() {
        Some(held) => held.push(msg),
        None => {
            drop(guard);
            eprintln!("{}", msg);
        }
    }
}

/// `eprintln!` that goes through the stderr buffer.
#[macro_export]
macro_rules! buffered_eprintln {
    ($($arg:tt)*) => {
        $crate::stderr_buffer::warn(format!($($arg)*))
    };
}
