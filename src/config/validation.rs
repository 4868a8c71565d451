use super::schema::Config;
use crate::scoring::{CATEGORY_COUNT, MAX_WEIGHT};

/// Validate configuration at startup.
/// Returns all validation errors at once (not just the first).
pub fn validate_config(config: &Config) -> Result<(), Vec<String>> {
    let mut errors = Vec::new();

    let category_count = match config.categories {
        Some(ref categories) => {
            if categories.len() != CATEGORY_COUNT {
                errors.push(format!(
                    "categories: expected {} entries, found {}",
                    CATEGORY_COUNT,
                    categories.len()
                ));
            }
            for (i, category) in categories.iter().enumerate() {
                if category.label.trim().is_empty() {
                    errors.push(format!("categories[{}].label: must not be empty", i));
                }
                if category.weight.unsigned_abs() > MAX_WEIGHT.unsigned_abs() {
                    errors.push(format!(
                        "categories[{}].weight: must be between -{} and {}",
                        i, MAX_WEIGHT, MAX_WEIGHT
                    ));
                }
            }
            categories.len()
        }
        None => CATEGORY_COUNT,
    };

    if let Some(ref bonus) = config.bonus {
        if bonus.every == 0 && bonus.points != 0 {
            errors.push("bonus.every: must be at least 1".to_string());
        }
        if bonus.points.unsigned_abs() > MAX_WEIGHT.unsigned_abs() {
            errors.push(format!(
                "bonus.points: must be between -{} and {}",
                MAX_WEIGHT, MAX_WEIGHT
            ));
        }
        if bonus.category >= category_count {
            errors.push(format!(
                "bonus.category: index {} is out of range (0-{})",
                bonus.category,
                category_count.saturating_sub(1)
            ));
        }
    }

    if let Some(ref path) = config.state_path {
        if path.trim().is_empty() {
            errors.push("state_path: must not be empty".to_string());
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
