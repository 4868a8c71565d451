use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table};

use crate::output::{format_points, format_weight, truncate_label};
use crate::slip::{format_day, SlipStore};
use crate::tui::app::{App, FlashKind, InputMode};

const TITLE: &str = "Digital Points Slip";

pub fn draw<S: SlipStore>(frame: &mut Frame, app: &mut App<S>) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 8 || area.width < 40 {
        let msg = Paragraph::new("Terminal too small").alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Table(fill) + Total(1) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1), // Title bar
        Constraint::Fill(1),   // Category table
        Constraint::Length(1), // Total line
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], app);
    render_table(frame, chunks[1], app);
    render_total(frame, chunks[2], app);
    render_status_bar(frame, chunks[3], app);

    match app.input_mode {
        InputMode::ConfirmReset => render_reset_popup(frame, app),
        InputMode::Help => render_help_popup(frame, app),
        InputMode::Normal | InputMode::Editing => {}
    }
}

fn render_title<S: SlipStore>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let day = format_day(app.sheet.day());
    let padding_len = (area.width as usize).saturating_sub(TITLE.len() + day.len());

    let title = Line::from(vec![
        Span::styled(TITLE, Style::default().fg(app.colors.title_color).bold()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(day, Style::default().fg(app.colors.muted)),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_table<S: SlipStore>(frame: &mut Frame, area: Rect, app: &mut App<S>) {
    let colors = &app.colors;
    let editing_index = match app.input_mode {
        InputMode::Editing => app.selected_index(),
        _ => None,
    };

    // Index(4) + Weight(7) + Count(8) + Points(11) + column gaps
    let label_width = (area.width as usize).saturating_sub(4 + 7 + 8 + 11 + 4).max(10);

    let rows: Vec<Row> = app
        .sheet
        .rows()
        .into_iter()
        .map(|row| {
            let count_cell = if editing_index == Some(row.index) {
                Cell::from(format!("{:>7}|", app.edit_buffer)).style(colors.editing)
            } else {
                Cell::from(format!("{:>8}", row.count))
            };

            let points_cell = Cell::from(format!("{:>11}", format_points(row.points)))
                .style(Style::default().fg(colors.points_color(row.points)));

            // Alternating row background (odd rows get subtle background)
            let row_style = if row.index % 2 == 1 {
                Style::default().bg(colors.row_alt_bg)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(format!("{}.", row.index + 1))
                    .style(Style::default().fg(colors.index_color)),
                Cell::from(truncate_label(row.label, label_width)),
                Cell::from(format!("{:>7}", format_weight(row.weight)))
                    .style(Style::default().fg(colors.muted)),
                count_cell,
                points_cell,
            ])
            .style(row_style)
        })
        .collect();

    let widths = [
        Constraint::Length(4),  // Index: "20."
        Constraint::Fill(1),    // Label
        Constraint::Length(7),  // Weight: "+2000"
        Constraint::Length(8),  // Count: "10000"
        Constraint::Length(11), // Points
    ];

    let table = Table::new(rows, widths)
        .header(
            Row::new(vec![
                Cell::from("#"),
                Cell::from("Category"),
                Cell::from(format!("{:>7}", "Each")),
                Cell::from(format!("{:>8}", "Count")),
                Cell::from(format!("{:>11}", "Points")),
            ])
            .style(colors.header_style)
            .bottom_margin(1),
        )
        .row_highlight_style(colors.row_selected);

    frame.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_total<S: SlipStore>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let summary = app.sheet.summary();
    let total_text = format!("Points: {}", format_points(summary.slip_total));

    let mut spans = Vec::new();
    if summary.bonus_points != 0 {
        spans.push(Span::styled(
            format!("incl. {} bonus  ", format_points(summary.bonus_points)),
            Style::default().fg(app.colors.muted),
        ));
    }
    spans.push(Span::styled(total_text, app.colors.total_style));

    frame.render_widget(
        Paragraph::new(Line::from(spans)).alignment(Alignment::Right),
        area,
    );
}

fn render_status_bar<S: SlipStore>(frame: &mut Frame, area: Rect, app: &App<S>) {
    let colors = &app.colors;
    let text = if let Some((ref msg, kind, _)) = app.flash_message {
        let msg_color = match kind {
            FlashKind::Error => colors.flash_error,
            FlashKind::Success => colors.flash_success,
            FlashKind::Info => colors.muted,
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let hints: &[(&str, &str)] = match app.input_mode {
            InputMode::Editing => &[
                ("0-9", ":type "),
                ("Bksp", ":delete "),
                ("Enter/Esc", ":done"),
            ],
            _ => &[
                ("j/k", ":nav "),
                ("+/-", ":step "),
                ("Enter", ":edit "),
                ("R", ":reset "),
                ("z", ":undo "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
        };

        let mut spans = Vec::new();
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(colors.status_key_color)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(colors.status_bar_bg)),
        area,
    );
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);

    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

fn render_reset_popup<S: SlipStore>(frame: &mut Frame, app: &App<S>) {
    let popup_area = centered_rect_fixed(40, 5, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Reset Slip ", app.colors.popup_title))
        .border_style(Style::default().fg(app.colors.popup_border));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let lines = vec![
        Line::from("Set every count back to 0?"),
        Line::from(Span::styled(
            "y: reset | any other key: cancel",
            Style::default().fg(app.colors.muted),
        )),
    ];
    frame.render_widget(Paragraph::new(lines), inner);
}

fn render_help_popup<S: SlipStore>(frame: &mut Frame, app: &App<S>) {
    let popup_area = centered_rect_fixed(50, 16, frame.area());
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered()
        .title(Span::styled(" Keyboard Shortcuts ", app.colors.popup_title))
        .border_style(Style::default().fg(app.colors.popup_border));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(app.colors.status_key_color).bold();
    let entries = [
        ("j / Down      ", "Next category"),
        ("k / Up        ", "Previous category"),
        ("g / G         ", "First / last category"),
        ("+ / l / Right ", "Add one"),
        ("- / h / Left  ", "Remove one"),
        ("Enter / 0-9   ", "Type a count"),
        ("R             ", "Reset the slip"),
        ("z             ", "Undo last change"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, action)| Line::from(vec![Span::styled(*key, key_style), Span::raw(*action)]))
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(Span::styled(
        "Counts are saved as you go and start over each day.",
        Style::default().fg(app.colors.muted),
    )));
    help_lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(app.colors.muted),
    )));

    frame.render_widget(Paragraph::new(help_lines), inner);
}
