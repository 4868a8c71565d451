use anyhow::Result;
use chrono::NaiveDate;

use super::input::{clamp_count, sanitize_count_text};
use super::storage::SlipStore;
use super::types::PersistedSnapshot;
use crate::buffered_eprintln;
use crate::scoring::{self, BonusRule, Category};

/// Source of "today". Injected so tests can pin the date.
pub type Clock = fn() -> NaiveDate;

/// Today's date in the local timezone.
pub fn local_today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// One line of the slip, ready for display.
#[derive(Debug, Clone, PartialEq)]
pub struct SlipRow<'a> {
    pub index: usize,
    pub label: &'a str,
    pub weight: i64,
    pub count: u32,
    pub points: i64,
}

/// Totals shown at the bottom of the slip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlipSummary {
    pub total_points: i64,
    pub bonus_points: i64,
    pub slip_total: i64,
    pub day: NaiveDate,
}

/// The day's points slip: fixed categories, one count each, saved on every change.
///
/// Counts always line up with categories by index and stay within
/// `[COUNT_MIN, COUNT_MAX]`.
pub struct ScoreSheet<S: SlipStore> {
    categories: Vec<Category>,
    bonus: BonusRule,
    counts: Vec<u32>,
    day: NaiveDate,
    store: S,
    clock: Clock,
}

impl<S: SlipStore> ScoreSheet<S> {
    /// Restore the sheet from `store`.
    ///
    /// A snapshot saved today brings its counts back. Anything else (nothing saved,
    /// an earlier day, wrong length, unreadable file) starts from zeros and stamps
    /// today's date into the store. Problems are reported as warnings, never errors.
    pub fn load(categories: Vec<Category>, bonus: BonusRule, store: S, clock: Clock) -> Self {
        let today = clock();
        let len = categories.len();

        let snapshot = match store.read() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                buffered_eprintln!("Warning: ignoring saved slip: {:#}", e);
                None
            }
        };

        let restored = snapshot
            .filter(|s| s.is_from(today))
            .and_then(|s| s.counts_for(len));

        let mut sheet = Self {
            categories,
            bonus,
            counts: vec![0; len],
            day: today,
            store,
            clock,
        };

        match restored {
            Some(counts) => sheet.counts = counts,
            None => {
                if let Err(e) = sheet.persist() {
                    buffered_eprintln!("Warning: could not stamp today's slip: {:#}", e);
                }
            }
        }

        sheet
    }

    /// Set a category's count, clamped to `[COUNT_MIN, COUNT_MAX]`, then save.
    ///
    /// # Errors
    /// Returns an error if `index` is out of range (nothing changes) or if saving
    /// fails (the new count is kept in memory).
    pub fn set_count(&mut self, index: usize, value: i64) -> Result<()> {
        self.check_index(index)?;
        self.roll_day();
        self.counts[index] = clamp_count(value);
        self.persist()
    }

    /// Set a category's count from typed text. Non-digits are dropped and empty text is 0.
    pub fn set_count_text(&mut self, index: usize, text: &str) -> Result<()> {
        self.set_count(index, i64::from(sanitize_count_text(text)))
    }

    /// Move a category's count up or down by `delta`, staying within range.
    pub fn step(&mut self, index: usize, delta: i64) -> Result<()> {
        self.check_index(index)?;
        self.roll_day();
        let current = i64::from(self.counts[index]);
        self.set_count(index, current.saturating_add(delta))
    }

    /// Zero every count and save.
    pub fn reset(&mut self) -> Result<()> {
        self.counts.iter_mut().for_each(|c| *c = 0);
        self.persist()
    }

    /// Put back a full set of counts (e.g. undoing a reset) and save once.
    pub fn restore(&mut self, counts: &[u32]) -> Result<()> {
        if counts.len() != self.counts.len() {
            anyhow::bail!(
                "Cannot restore {} counts onto a slip of {} categories",
                counts.len(),
                self.counts.len()
            );
        }
        self.roll_day();
        for (slot, &count) in self.counts.iter_mut().zip(counts) {
            *slot = clamp_count(i64::from(count));
        }
        self.persist()
    }

    /// Save current counts stamped with today's date.
    ///
    /// Counts left over from an earlier day are zeroed first, so a slip is only
    /// ever saved under the day it was filled in.
    pub fn persist(&mut self) -> Result<()> {
        self.roll_day();
        let snapshot = PersistedSnapshot::new(&self.counts, self.day);
        self.store.write(&snapshot)
    }

    /// Start a fresh slip if the day changed since the sheet was loaded or last saved.
    ///
    /// Returns true when the counts were reset.
    pub fn roll_over(&mut self) -> Result<bool> {
        if !self.roll_day() {
            return Ok(false);
        }
        self.persist()?;
        Ok(true)
    }

    /// `Σ(count × weight)` over all categories.
    pub fn total_points(&self) -> i64 {
        scoring::total_points(&self.categories, &self.counts)
    }

    /// Block bonus from the configured rule (25 per 50 pages by default).
    pub fn bonus_points(&self) -> i64 {
        scoring::bonus_points(&self.bonus, &self.counts)
    }

    /// The figure shown as the slip's points: weighted total plus bonus.
    pub fn slip_total(&self) -> i64 {
        self.total_points().saturating_add(self.bonus_points())
    }

    pub fn summary(&self) -> SlipSummary {
        SlipSummary {
            total_points: self.total_points(),
            bonus_points: self.bonus_points(),
            slip_total: self.slip_total(),
            day: self.day,
        }
    }

    pub fn rows(&self) -> Vec<SlipRow<'_>> {
        self.categories
            .iter()
            .zip(&self.counts)
            .enumerate()
            .map(|(index, (category, &count))| SlipRow {
                index,
                label: &category.label,
                weight: category.weight,
                count,
                points: scoring::category_points(category, count),
            })
            .collect()
    }

    pub fn count(&self, index: usize) -> Option<u32> {
        self.counts.get(index).copied()
    }

    pub fn counts(&self) -> &[u32] {
        &self.counts
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn bonus(&self) -> &BonusRule {
        &self.bonus
    }

    pub fn day(&self) -> NaiveDate {
        self.day
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index >= self.counts.len() {
            anyhow::bail!(
                "Category index {} is out of range (0-{})",
                index,
                self.counts.len().saturating_sub(1)
            );
        }
        Ok(())
    }

    // Zeroes counts in memory when the clock has moved past the sheet's day.
    fn roll_day(&mut self) -> bool {
        let today = (self.clock)();
        if today == self.day {
            return false;
        }
        self.counts.iter_mut().for_each(|c| *c = 0);
        self.day = today;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::{default_categories, CATEGORY_COUNT};
    use crate::slip::storage::MemoryStore;
    use std::cell::Cell;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 16).unwrap()
    }

    fn yesterday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 15).unwrap()
    }

    thread_local! {
        static MOVING_DAY: Cell<NaiveDate> = Cell::new(today());
    }

    fn moving_clock() -> NaiveDate {
        MOVING_DAY.with(|d| d.get())
    }

    fn fresh_sheet() -> ScoreSheet<MemoryStore> {
        ScoreSheet::load(
            default_categories(),
            BonusRule::default(),
            MemoryStore::new(),
            today,
        )
    }

    fn sheet_from(store: MemoryStore) -> ScoreSheet<MemoryStore> {
        ScoreSheet::load(default_categories(), BonusRule::default(), store, today)
    }

    #[test]
    fn test_total_all_zero() {
        let sheet = fresh_sheet();
        assert_eq!(sheet.total_points(), 0);
        assert_eq!(sheet.slip_total(), 0);
    }

    #[test]
    fn test_total_with_one_page() {
        let mut sheet = fresh_sheet();
        sheet.set_count(0, 1).unwrap();
        assert_eq!(sheet.total_points(), 10);
    }

    #[test]
    fn test_total_matches_weighted_sum() {
        let mut sheet = fresh_sheet();
        for i in 0..CATEGORY_COUNT {
            sheet.set_count(i, i as i64).unwrap();
        }
        let expected: i64 = default_categories()
            .iter()
            .enumerate()
            .map(|(i, c)| c.weight * i as i64)
            .sum();
        assert_eq!(sheet.total_points(), expected);
    }

    #[test]
    fn test_total_can_be_negative() {
        let mut sheet = fresh_sheet();
        sheet.set_count(19, 2).unwrap();
        assert_eq!(sheet.total_points(), -400);
    }

    #[test]
    fn test_reset_zeroes_total() {
        let mut sheet = fresh_sheet();
        sheet.set_count(0, 80).unwrap();
        sheet.set_count(12, 1).unwrap();
        sheet.reset().unwrap();
        assert_eq!(sheet.total_points(), 0);
        assert!(sheet.counts().iter().all(|&c| c == 0));
        let saved = sheet.store().snapshot.clone().unwrap();
        assert!(saved.counts.iter().all(|&c| c == 0));
    }

    #[test]
    fn test_set_count_clamps() {
        let mut sheet = fresh_sheet();
        sheet.set_count(3, 10_001).unwrap();
        assert_eq!(sheet.count(3), Some(10_000));
        sheet.set_count(3, -5).unwrap();
        assert_eq!(sheet.count(3), Some(0));
    }

    #[test]
    fn test_set_count_persists_each_change() {
        let mut sheet = fresh_sheet();
        let writes_after_load = sheet.store().writes;
        sheet.set_count(2, 4).unwrap();
        sheet.set_count(2, 5).unwrap();
        assert_eq!(sheet.store().writes, writes_after_load + 2);

        let saved = sheet.store().snapshot.clone().unwrap();
        assert_eq!(saved.counts[2], 5);
        assert_eq!(saved.saved_day, "2025-07-16");
    }

    #[test]
    fn test_set_count_out_of_range() {
        let mut sheet = fresh_sheet();
        let writes = sheet.store().writes;
        assert!(sheet.set_count(20, 1).is_err());
        assert_eq!(sheet.store().writes, writes);
    }

    #[test]
    fn test_set_count_text_filters() {
        let mut sheet = fresh_sheet();
        sheet.set_count_text(0, "1x5").unwrap();
        assert_eq!(sheet.count(0), Some(15));
        sheet.set_count_text(0, "").unwrap();
        assert_eq!(sheet.count(0), Some(0));
        sheet.set_count_text(0, "123456").unwrap();
        assert_eq!(sheet.count(0), Some(10_000));
    }

    #[test]
    fn test_step_stays_in_range() {
        let mut sheet = fresh_sheet();
        sheet.step(1, -1).unwrap();
        assert_eq!(sheet.count(1), Some(0));
        sheet.step(1, 3).unwrap();
        assert_eq!(sheet.count(1), Some(3));
        sheet.set_count(1, 9_999).unwrap();
        sheet.step(1, 5).unwrap();
        assert_eq!(sheet.count(1), Some(10_000));
    }

    #[test]
    fn test_restore_after_reset() {
        let mut sheet = fresh_sheet();
        sheet.set_count(0, 12).unwrap();
        sheet.set_count(5, 2).unwrap();
        let before = sheet.counts().to_vec();

        sheet.reset().unwrap();
        sheet.restore(&before).unwrap();
        assert_eq!(sheet.counts(), before.as_slice());
        assert_eq!(sheet.store().snapshot.clone().unwrap().counts[0], 12);
    }

    #[test]
    fn test_restore_wrong_length() {
        let mut sheet = fresh_sheet();
        assert!(sheet.restore(&[1, 2, 3]).is_err());
        assert!(sheet.counts().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_bonus_included_in_slip_total() {
        let mut sheet = fresh_sheet();
        sheet.set_count(0, 100).unwrap();
        assert_eq!(sheet.total_points(), 1000);
        assert_eq!(sheet.bonus_points(), 50);
        assert_eq!(sheet.slip_total(), 1050);

        let summary = sheet.summary();
        assert_eq!(summary.total_points, 1000);
        assert_eq!(summary.bonus_points, 50);
        assert_eq!(summary.slip_total, 1050);
        assert_eq!(summary.day, today());
    }

    #[test]
    fn test_load_with_nothing_saved_stamps_today() {
        let sheet = fresh_sheet();
        let saved = sheet.store().snapshot.clone().unwrap();
        assert_eq!(saved.saved_day, "2025-07-16");
        assert_eq!(saved.counts, vec![0; CATEGORY_COUNT]);
    }

    #[test]
    fn test_load_from_today_restores_counts() {
        let mut counts = vec![0; CATEGORY_COUNT];
        counts[0] = 42;
        counts[7] = 3;
        counts[19] = 1;
        let store = MemoryStore::with_snapshot(PersistedSnapshot::new(&counts, today()));

        let sheet = sheet_from(store);
        assert_eq!(sheet.counts(), counts.as_slice());
        assert_eq!(sheet.store().writes, 0);
    }

    #[test]
    fn test_load_from_prior_day_resets() {
        let counts = vec![7; CATEGORY_COUNT];
        let store = MemoryStore::with_snapshot(PersistedSnapshot::new(&counts, yesterday()));

        let sheet = sheet_from(store);
        assert!(sheet.counts().iter().all(|&c| c == 0));
        assert_eq!(sheet.total_points(), 0);

        let saved = sheet.store().snapshot.clone().unwrap();
        assert_eq!(saved.saved_day, "2025-07-16");
        assert_eq!(saved.counts, vec![0; CATEGORY_COUNT]);
    }

    #[test]
    fn test_load_wrong_length_falls_back_to_zero() {
        let store = MemoryStore::with_snapshot(PersistedSnapshot::new(&[5, 5, 5], today()));

        let sheet = sheet_from(store);
        assert_eq!(sheet.counts().len(), CATEGORY_COUNT);
        assert!(sheet.counts().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_load_bad_date_falls_back_to_zero() {
        let snapshot = PersistedSnapshot {
            version: 1,
            counts: vec![5; CATEGORY_COUNT],
            saved_day: "not a date".to_string(),
        };
        let sheet = sheet_from(MemoryStore::with_snapshot(snapshot));
        assert!(sheet.counts().iter().all(|&c| c == 0));
    }

    #[test]
    fn test_load_survives_failing_store() {
        let store = MemoryStore {
            fail_writes: true,
            ..MemoryStore::default()
        };
        let sheet = sheet_from(store);
        assert_eq!(sheet.len(), CATEGORY_COUNT);
        assert_eq!(sheet.day(), today());
    }

    #[test]
    fn test_save_failure_keeps_count_in_memory() {
        let mut sheet = fresh_sheet();
        sheet.store_mut().fail_writes = true;
        assert!(sheet.set_count(0, 9).is_err());
        assert_eq!(sheet.count(0), Some(9));
    }

    #[test]
    fn test_rows() {
        let mut sheet = fresh_sheet();
        sheet.set_count(15, 2).unwrap();
        let rows = sheet.rows();
        assert_eq!(rows.len(), CATEGORY_COUNT);
        assert_eq!(rows[15].index, 15);
        assert_eq!(rows[15].label, "Clay Demo (50 points)");
        assert_eq!(rows[15].weight, 50);
        assert_eq!(rows[15].count, 2);
        assert_eq!(rows[15].points, 100);
    }

    #[test]
    fn test_roll_over_after_midnight() {
        MOVING_DAY.with(|d| d.set(today()));
        let mut sheet = ScoreSheet::load(
            default_categories(),
            BonusRule::default(),
            MemoryStore::new(),
            moving_clock,
        );
        sheet.set_count(0, 30).unwrap();
        assert!(!sheet.roll_over().unwrap());
        assert_eq!(sheet.count(0), Some(30));

        let tomorrow = NaiveDate::from_ymd_opt(2025, 7, 17).unwrap();
        MOVING_DAY.with(|d| d.set(tomorrow));
        assert!(sheet.roll_over().unwrap());
        assert_eq!(sheet.count(0), Some(0));
        assert_eq!(sheet.day(), tomorrow);
        assert_eq!(
            sheet.store().snapshot.clone().unwrap().saved_day,
            "2025-07-17"
        );
    }

    #[test]
    fn test_edit_after_midnight_starts_new_day() {
        MOVING_DAY.with(|d| d.set(today()));
        let mut sheet = ScoreSheet::load(
            default_categories(),
            BonusRule::default(),
            MemoryStore::new(),
            moving_clock,
        );
        sheet.set_count(0, 30).unwrap();

        MOVING_DAY.with(|d| d.set(NaiveDate::from_ymd_opt(2025, 7, 17).unwrap()));
        sheet.set_count(1, 2).unwrap();
        assert_eq!(sheet.count(0), Some(0));
        assert_eq!(sheet.count(1), Some(2));
        let saved = sheet.store().snapshot.clone().unwrap();
        assert_eq!(saved.saved_day, "2025-07-17");
        assert_eq!(saved.counts[0], 0);
    }

    #[test]
    fn test_persist_after_midnight_saves_empty_slip() {
        MOVING_DAY.with(|d| d.set(today()));
        let mut sheet = ScoreSheet::load(
            default_categories(),
            BonusRule::default(),
            MemoryStore::new(),
            moving_clock,
        );
        sheet.set_count(0, 30).unwrap();

        MOVING_DAY.with(|d| d.set(NaiveDate::from_ymd_opt(2025, 7, 17).unwrap()));
        sheet.persist().unwrap();
        assert_eq!(sheet.count(0), Some(0));
        let saved = sheet.store().snapshot.clone().unwrap();
        assert_eq!(saved.saved_day, "2025-07-17");
        assert_eq!(saved.counts[0], 0);
    }

    #[test]
    fn test_huge_weight_saturates() {
        let mut categories = default_categories();
        categories[0].weight = i64::MAX / 2;
        let mut sheet = ScoreSheet::load(
            categories,
            BonusRule::default(),
            MemoryStore::new(),
            today,
        );
        sheet.set_count(0, 3).unwrap();
        assert_eq!(sheet.total_points(), i64::MAX);
        assert_eq!(sheet.slip_total(), i64::MAX);
        assert_eq!(sheet.rows()[0].points, i64::MAX);
    }
}
