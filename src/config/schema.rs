use serde::{Deserialize, Serialize};

use crate::scoring::{default_categories, BonusRule, Category};
use crate::tui::Theme;

/// Points slip configuration.
///
/// Every field is optional; a missing config file is the same as `{}`.
///
/// Example YAML:
/// ```yaml
/// categories:
///   - { label: "Pages Read", weight: 10 }
///   # ... 20 entries in total
/// bonus: { category: 0, every: 50, points: 25 }
/// theme: dark
/// state_path: ~/notes/slip.json
/// ```
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Category list; must hold exactly 20 entries when present
    #[serde(default)]
    pub categories: Option<Vec<Category>>,

    /// Block bonus rule (default: 25 points per 50 pages read)
    #[serde(default)]
    pub bonus: Option<BonusRule>,

    /// TUI color theme (default: auto)
    #[serde(default)]
    pub theme: Option<Theme>,

    /// Location of the saved slip (default: ~/.config/points-slip/slip.json)
    #[serde(default)]
    pub state_path: Option<String>,
}

impl Config {
    pub fn effective_categories(&self) -> Vec<Category> {
        self.categories.clone().unwrap_or_else(default_categories)
    }

    pub fn effective_bonus(&self) -> BonusRule {
        self.bonus.clone().unwrap_or_default()
    }

    pub fn effective_theme(&self) -> Theme {
        self.theme.unwrap_or_default()
    }

    /// Config with every default spelled out, as written by `points-slip init`.
    pub fn with_defaults() -> Self {
        Self {
            categories: Some(default_categories()),
            bonus: Some(BonusRule::default()),
            theme: Some(Theme::Auto),
            state_path: None,
        }
    }
}
