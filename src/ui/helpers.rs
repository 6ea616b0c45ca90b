use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::models::Coin;

/// Width of the series column in list rows.
const SERIES_WIDTH: usize = 22;

/// Build one list row: checkbox, series, year, mint mark and name. Collected
/// rows are dimmed so the gaps in a set stand out.
pub(crate) fn coin_row_line(coin: &Coin) -> Line<'static> {
    let checkbox = if coin.is_collected { "[x]" } else { "[ ]" };
    let mark = coin.mint_mark_label().unwrap_or("-");
    let text_style = if coin.is_collected {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::styled(
            format!("{checkbox} "),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{:<width$} ", truncate(&coin.series, SERIES_WIDTH), width = SERIES_WIDTH),
            Style::default().fg(Color::Gray),
        ),
        Span::styled(format!("{} {:<2} ", coin.year, mark), Style::default().fg(Color::Cyan)),
        Span::styled(coin.name.clone(), text_style),
    ])
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for the help overlay.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}
