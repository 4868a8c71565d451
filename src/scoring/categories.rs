use serde::{Deserialize, Serialize};

/// Number of categories on a points slip.
pub const CATEGORY_COUNT: usize = 20;

/// Lowest count a category can hold.
pub const COUNT_MIN: u32 = 0;

/// Highest count a category can hold.
pub const COUNT_MAX: u32 = 10_000;

/// Largest magnitude allowed for a weight or bonus points in configuration.
///
/// A full slip at this weight stays far inside `i64`.
pub const MAX_WEIGHT: i64 = 1_000_000_000;

/// A fixed scoring rule: a label and the points earned per unit.
///
/// Weights may be negative (e.g. days overdue on a course).
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Category {
    pub label: String,
    pub weight: i64,
}

impl Category {
    pub fn new(label: &str, weight: i64) -> Self {
        Self {
            label: label.to_string(),
            weight,
        }
    }
}

/// Bonus awarded for every full block of units in one category.
///
/// The default grants 25 points per 50 pages read. Set `points: 0` to turn it off.
///
/// Example YAML:
/// ```yaml
/// bonus:
///   category: 0
///   every: 50
///   points: 25
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BonusRule {
    /// Zero-based index of the category the bonus is counted on
    pub category: usize,

    /// Size of one block of units
    pub every: u32,

    /// Points per completed block
    pub points: i64,
}

impl Default for BonusRule {
    fn default() -> Self {
        Self {
            category: 0,
            every: 50,
            points: 25,
        }
    }
}

impl BonusRule {
    pub fn is_enabled(&self) -> bool {
        self.points != 0 && self.every > 0
    }
}

/// The stock Points Slip categories, in display order.
pub fn default_categories() -> Vec<Category> {
    vec![
        Category::new("Pages Read (10 points per page)", 10),
        Category::new(
            "Videos/Live or Recorded Lectures/Teacher Instruction (5 points per minute)",
            5,
        ),
        Category::new("Passing a Theory Checkout (3 points per page)", 3),
        Category::new("Giving a Theory Checkout (when passed, 3 points per page)", 3),
        Category::new("Finding MUs (5 points per word)", 5),
        Category::new("Giving a Checkout on a Demo (3 points)", 3),
        Category::new(
            "For Each Definition, Derivation, Idiom or Synonym Fully Cleared (3 points)",
            3,
        ),
        Category::new("Giving/Receiving Word Clearing (150 points per hour)", 150),
        Category::new("Theory Coaching - Student and Coach (5 points per line)", 5),
        Category::new("Any drill that takes 15 minutes or less (40 points)", 40),
        Category::new("Verbatim Learning (10 points per line)", 10),
        Category::new(
            "Any Practical, Drill, or Demonstration that takes more than 15 mins to do (150 points per hour)",
            150,
        ),
        Category::new(
            "Completing a practical, drill, or demonstration that takes more than 1 hour (500 points)",
            500,
        ),
        Category::new("Checksheet Requirement (5 points)", 5),
        Category::new("Self-Originated (3 points)", 3),
        Category::new("Clay Demo (50 points)", 50),
        Category::new("Essays, Charts, Diagrams (10 points)", 10),
        Category::new("Course Completions (2000 points)", 2000),
        Category::new("For each day ahead of target (2000 points)", 2000),
        Category::new("Each day you are overdue on a course (-200 points)", -200),
    ]
}
