use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::slip::{format_day, SlipRow, SlipSummary};

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Format points with thousands separators and a leading minus for negatives
/// (1250 -> "1,250", -200 -> "-200")
pub fn format_points(points: i64) -> String {
    let digits = points.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }
    if points < 0 {
        format!("-{}", grouped)
    } else {
        grouped
    }
}

/// Format a weight as a per-unit rate ("+10", "-200")
pub fn format_weight(weight: i64) -> String {
    format!("{:+}", weight)
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate label to fit available width, accounting for Unicode
pub fn truncate_label(label: &str, max_width: usize) -> String {
    let chars: Vec<char> = label.chars().collect();
    if chars.len() <= max_width {
        label.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Format the slip as a table with columns: Index, Count, Points, Label
/// followed by a totals footer.
/// Index column: 3 chars (fits "20."), right-aligned
/// Count column: 6 chars (fits "10,000"), Points column: 11 chars
pub fn format_slip_table(rows: &[SlipRow], summary: &SlipSummary, use_colors: bool) -> String {
    if rows.is_empty() {
        return "No categories configured.".to_string();
    }

    format!(
        "{}\n\n{}",
        format_rows(rows, get_terminal_width(), use_colors),
        format_summary(summary, use_colors)
    )
}

fn format_rows(rows: &[SlipRow], term_width: Option<usize>, use_colors: bool) -> String {
    let count_width = 6;
    let points_width = 11;
    let separator = "  ";
    let fixed_width = 3 + 1 + count_width + separator.len() * 2 + points_width;

    rows.iter()
        .map(|row| {
            let index_str = format!("{:>2}.", row.index + 1);
            let count_str = format!(
                "{:>width$}",
                format_points(i64::from(row.count)),
                width = count_width
            );
            let points_str = format!(
                "{:>width$}",
                format_points(row.points),
                width = points_width
            );

            let label = match term_width {
                Some(width) if width > fixed_width + 10 => {
                    truncate_label(row.label, width - fixed_width)
                }
                Some(_) => truncate_label(row.label, 20),
                None => row.label.to_string(),
            };

            if use_colors {
                let points_colored = if row.points < 0 {
                    points_str.red().to_string()
                } else if row.points > 0 {
                    points_str.green().to_string()
                } else {
                    points_str.dimmed().to_string()
                };
                format!(
                    "{} {}{}{}{}{}",
                    index_str.dimmed(),
                    count_str.bold(),
                    separator,
                    points_colored,
                    separator,
                    label
                )
            } else {
                format!(
                    "{} {}{}{}{}{}",
                    index_str, count_str, separator, points_str, separator, label
                )
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the footer: day, bonus (when earned) and the slip total
pub fn format_summary(summary: &SlipSummary, use_colors: bool) -> String {
    let day = format_day(summary.day);
    let total = format_points(summary.slip_total);
    let bonus = if summary.bonus_points != 0 {
        format!(" (includes {} bonus)", format_points(summary.bonus_points))
    } else {
        String::new()
    };

    if use_colors {
        format!("{}  {} {}{}", day.dimmed(), "Points:".bold(), total.bold().cyan(), bonus.dimmed())
    } else {
        format!("{}  Points: {}{}", day, total, bonus)
    }
}

/// Format the slip as tab-separated values for scripting
/// Columns: index, label, weight, count, points (no headers, no colors)
/// A final line carries "total", the bonus and the slip total.
pub fn format_tsv(rows: &[SlipRow], summary: &SlipSummary) -> String {
    let mut lines: Vec<String> = rows
        .iter()
        .map(|row| {
            format!(
                "{}\t{}\t{}\t{}\t{}",
                row.index + 1,
                row.label.replace('\t', " "),
                row.weight,
                row.count,
                row.points
            )
        })
        .collect();
    lines.push(format!(
        "total\t{}\t{}\t{}",
        format_day(summary.day),
        summary.bonus_points,
        summary.slip_total
    ));
    lines.join("\n")
}
