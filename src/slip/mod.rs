pub mod input;
pub mod sheet;
pub mod storage;
pub mod types;

pub use input::{clamp_count, sanitize_count_text, strip_non_digits};
pub use sheet::{local_today, Clock, ScoreSheet, SlipRow, SlipSummary};
pub use storage::{JsonFileStore, MemoryStore, SlipStore};
pub use types::{format_day, PersistedSnapshot};
