pub mod categories;
pub mod engine;

pub use categories::{
    default_categories, BonusRule, Category, CATEGORY_COUNT, COUNT_MAX, COUNT_MIN, MAX_WEIGHT,
};
pub use engine::{bonus_points, category_points, total_points};
