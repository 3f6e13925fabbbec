use crate::app::{App, NoticeKind};
use crate::models::Phase;
use crate::utils::strings::truncate_chars;
use ratatui::style::Color;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub fn hex_to_rgb(hex: &str) -> Color {
    let hex = hex.trim_start_matches('#');
    if hex.len() == 6 {
        let r = u8::from_str_radix(&hex[0..2], 16).unwrap_or(255);
        let g = u8::from_str_radix(&hex[2..4], 16).unwrap_or(255);
        let b = u8::from_str_radix(&hex[4..6], 16).unwrap_or(255);
        Color::Rgb(r, g, b)
    } else {
        Color::White
    }
}

pub fn format_timer(seconds: u64) -> String {
    if seconds >= 60 {
        let minutes = seconds / 60;
        let secs = seconds % 60;
        format!("{}:{:02}", minutes, secs)
    } else {
        format!("{}", seconds)
    }
}

/// Horizontal band of `percent` width centred in `area`.
pub fn centered_columns(area: Rect, percent: u16) -> Rect {
    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Fill(1),
            Constraint::Percentage(percent),
            Constraint::Fill(1),
        ])
        .split(area)[1]
}

pub fn render_header(f: &mut Frame, app: &App) {
    let mut header_spans = vec![Span::styled(
        "quizgen",
        Style::default()
            .fg(hex_to_rgb(&app.theme.main))
            .add_modifier(Modifier::BOLD),
    )];

    let stats = app.engine.stats();
    header_spans.push(Span::styled(
        format!(
            " | {} | streak {} (best {}) | acc {:.0}%",
            app.difficulty,
            stats.stats().current_streak,
            stats.stats().best_streak,
            stats.accuracy_percent()
        ),
        Style::default().fg(hex_to_rgb(&app.theme.sub)),
    ));

    let header_row_area = Rect::new(0, 1, f.area().width, 1);
    f.render_widget(
        Paragraph::new(Line::from(header_spans)),
        centered_columns(header_row_area, 82),
    );
}

pub fn render_notice(f: &mut Frame, app: &App, area: Rect) {
    let Some(notice) = &app.notice else { return };
    let color = match notice.kind {
        NoticeKind::Info => hex_to_rgb(&app.theme.sub),
        NoticeKind::Warning => hex_to_rgb(&app.theme.error),
    };
    f.render_widget(
        // single line, long service errors are cut to fit
        Paragraph::new(truncate_chars(&notice.text, area.width as usize))
            .style(Style::default().fg(color))
            .alignment(Alignment::Center),
        area,
    );
}

pub fn render_footer(f: &mut Frame, app: &App) {
    let hints = match app.phase() {
        Phase::Idle => "enter: generate | tab: difficulty | up/down: questions | esc: quit",
        Phase::InProgress => "a-d / enter: answer | up/down: select | tab: abandon | esc: quit",
        Phase::Results => "tab / r: new quiz | esc: quit",
    };
    let footer = Paragraph::new(hints)
        .style(Style::default().fg(hex_to_rgb(&app.theme.sub)))
        .alignment(Alignment::Center);
    f.render_widget(footer, Rect::new(0, f.area().height.saturating_sub(1), f.area().width, 1));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_to_rgb() {
        assert_eq!(hex_to_rgb("#e2b714"), Color::Rgb(0xe2, 0xb7, 0x14));
        assert_eq!(hex_to_rgb("nope"), Color::White);
    }

    #[test]
    fn test_format_timer() {
        assert_eq!(format_timer(59), "59");
        assert_eq!(format_timer(61), "1:01");
    }
}
