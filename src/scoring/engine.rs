use super::categories::{BonusRule, Category};

/// Points earned by a single category: `count × weight`.
///
/// Saturates at the `i64` bounds rather than overflowing.
pub fn category_points(category: &Category, count: u32) -> i64 {
    category.weight.saturating_mul(i64::from(count))
}

/// Weighted total across all categories: `Σ(count[i] × weight[i])`.
///
/// Counts are matched to categories by index. The result can be negative
/// because some weights are.
pub fn total_points(categories: &[Category], counts: &[u32]) -> i64 {
    categories
        .iter()
        .zip(counts)
        .map(|(category, &count)| category_points(category, count))
        .fold(0i64, i64::saturating_add)
}

/// Block bonus for the rule's category: `(count / every) × points`.
///
/// Returns 0 when the rule is disabled or points at a category that doesn't exist.
pub fn bonus_points(rule: &BonusRule, counts: &[u32]) -> i64 {
    if !rule.is_enabled() {
        return 0;
    }
    match counts.get(rule.category) {
        Some(&count) => i64::from(count / rule.every).saturating_mul(rule.points),
        None => 0,
    }
}
