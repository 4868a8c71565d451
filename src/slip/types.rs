use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::input::clamp_count;

/// Current on-disk format version.
pub const SNAPSHOT_VERSION: u32 = 1;

/// Date format of `lastSavedDay` (`yyyy-MM-dd`).
pub const DAY_FORMAT: &str = "%Y-%m-%d";

/// The saved slip: one day's counts and the day they belong to.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PersistedSnapshot {
    pub version: u32,
    #[serde(default)]
    pub counts: Vec<i64>,
    #[serde(rename = "lastSavedDay", default)]
    pub saved_day: String,
}

impl PersistedSnapshot {
    pub fn new(counts: &[u32], day: NaiveDate) -> Self {
        Self {
            version: SNAPSHOT_VERSION,
            counts: counts.iter().map(|&c| i64::from(c)).collect(),
            saved_day: format_day(day),
        }
    }

    /// Parsed `lastSavedDay`, or None if it isn't a valid `yyyy-MM-dd` date
    pub fn day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.saved_day, DAY_FORMAT).ok()
    }

    pub fn is_from(&self, day: NaiveDate) -> bool {
        self.day() == Some(day)
    }

    /// Counts usable for a sheet of `expected` categories.
    ///
    /// Returns None on a length mismatch. Out-of-range values are clamped.
    pub fn counts_for(&self, expected: usize) -> Option<Vec<u32>> {
        if self.counts.len() != expected {
            return None;
        }
        Some(self.counts.iter().map(|&c| clamp_count(c)).collect())
    }
}

pub fn format_day(day: NaiveDate) -> String {
    day.format(DAY_FORMAT).to_string()
}
