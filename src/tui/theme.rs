//! Color palettes for the TUI and theme selection

use ratatui::prelude::*;
use serde::{Deserialize, Serialize};

/// Theme setting from the config file
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    /// Pick dark or light from the terminal background
    #[default]
    Auto,
    Dark,
    Light,
}

/// Complete color palette for the TUI
#[derive(Debug, Clone)]
pub struct ThemeColors {
    // Points colors
    pub points_positive: Color,
    pub points_negative: Color,
    pub points_zero: Color,

    // Table colors
    pub row_alt_bg: Color,
    pub index_color: Color,
    pub header_style: Style,
    pub row_selected: Style,
    pub editing: Style,

    // General colors
    pub muted: Color,
    pub title_color: Color,
    pub total_style: Style,

    // Status bar colors
    pub status_bar_bg: Color,
    pub status_key_color: Color,
    pub flash_success: Color,
    pub flash_error: Color,

    // Popup overlay colors
    pub popup_border: Color,
    pub popup_title: Style,
}

impl ThemeColors {
    pub fn dark() -> Self {
        Self {
            points_positive: Color::Green,
            points_negative: Color::Red,
            points_zero: Color::DarkGray,
            row_alt_bg: Color::Indexed(235),
            index_color: Color::DarkGray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            editing: Style::new().fg(Color::Black).bg(Color::Yellow).bold(),
            muted: Color::Gray,
            title_color: Color::Cyan,
            total_style: Style::new().fg(Color::Cyan).bold(),
            status_bar_bg: Color::Indexed(236),
            status_key_color: Color::Cyan,
            flash_success: Color::Green,
            flash_error: Color::Red,
            popup_border: Color::Cyan,
            popup_title: Style::new().fg(Color::Cyan).bold(),
        }
    }

    pub fn light() -> Self {
        Self {
            points_positive: Color::Rgb(0, 110, 40),
            points_negative: Color::Rgb(170, 20, 20),
            points_zero: Color::Gray,
            row_alt_bg: Color::Indexed(254),
            index_color: Color::Gray,
            header_style: Style::new().bold(),
            row_selected: Style::new().reversed(),
            editing: Style::new().fg(Color::White).bg(Color::Blue).bold(),
            muted: Color::DarkGray,
            title_color: Color::Blue,
            total_style: Style::new().fg(Color::Blue).bold(),
            status_bar_bg: Color::Indexed(253),
            status_key_color: Color::Blue,
            flash_success: Color::Rgb(0, 110, 40),
            flash_error: Color::Rgb(170, 20, 20),
            popup_border: Color::Blue,
            popup_title: Style::new().fg(Color::Blue).bold(),
        }
    }

    /// Color for a points value: green above zero, red below, muted at zero
    pub fn points_color(&self, points: i64) -> Color {
        match points.signum() {
            1 => self.points_positive,
            -1 => self.points_negative,
            _ => self.points_zero,
        }
    }
}

/// Resolve a theme setting to a palette.
///
/// `Auto` queries the terminal background; if that fails it falls back to dark.
/// Must run before the terminal enters raw mode.
pub fn resolve_theme(theme: Theme) -> ThemeColors {
    match theme {
        Theme::Dark => ThemeColors::dark(),
        Theme::Light => ThemeColors::light(),
        Theme::Auto => match terminal_light::luma() {
            Ok(luma) if luma > 0.6 => ThemeColors::light(),
            _ => ThemeColors::dark(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_points_color() {
        let colors = ThemeColors::dark();
        assert_eq!(colors.points_color(10), Color::Green);
        assert_eq!(colors.points_color(-200), Color::Red);
        assert_eq!(colors.points_color(0), Color::DarkGray);
    }

    #[test]
    fn test_explicit_themes_resolve() {
        assert_eq!(resolve_theme(Theme::Dark).title_color, Color::Cyan);
        assert_eq!(resolve_theme(Theme::Light).title_color, Color::Blue);
    }

    #[test]
    fn test_default_theme_is_auto() {
        assert_eq!(Theme::default(), Theme::Auto);
    }
}
