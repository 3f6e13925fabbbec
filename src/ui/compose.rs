use crate::app::App;
use crate::ui::utils::{centered_columns, hex_to_rgb, render_footer, render_header, render_notice};
use crate::utils::strings::normalize_source_text;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use textwrap::Options;

pub fn draw(f: &mut Frame, app: &App) {
    render_header(f, app);

    let vertical_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(2),
            Constraint::Length(1),
        ])
        .split(f.area());

    let area = centered_columns(vertical_layout[1], 80);
    let block = Block::default()
        .title(" Paste the text to quiz yourself on ")
        .borders(Borders::ALL)
        .style(Style::default().fg(hex_to_rgb(&app.theme.sub_alt)));
    let inner = block.inner(area);
    f.render_widget(block, area);

    // keep the tail of the text and the caret in view
    let width = inner.width.saturating_sub(1).max(1) as usize;
    let mut lines: Vec<String> = app
        .input
        .split('\n')
        .flat_map(|paragraph| {
            let wrapped = textwrap::wrap(paragraph, Options::new(width));
            if wrapped.is_empty() {
                vec![String::new()]
            } else {
                wrapped.into_iter().map(|c| c.into_owned()).collect()
            }
        })
        .collect();
    let visible = inner.height as usize;
    if lines.len() > visible {
        lines.drain(0..lines.len() - visible);
    }

    let text_style = Style::default().fg(hex_to_rgb(&app.theme.text));
    let caret_style = Style::default().fg(hex_to_rgb(&app.theme.caret));
    let last = lines.len().saturating_sub(1);
    let rendered: Vec<Line> = lines
        .into_iter()
        .enumerate()
        .map(|(i, l)| {
            let mut spans = vec![Span::styled(l, text_style)];
            if i == last && !app.generating {
                spans.push(Span::styled("▌", caret_style));
            }
            Line::from(spans)
        })
        .collect();
    f.render_widget(Paragraph::new(rendered), inner);

    let sub = Style::default().fg(hex_to_rgb(&app.theme.sub));
    let main = Style::default().fg(hex_to_rgb(&app.theme.main));
    let mut settings = vec![
        Span::styled("difficulty: ", sub),
        Span::styled(app.difficulty.label(), main),
        Span::styled("  questions: ", sub),
        Span::styled(app.question_count.to_string(), main),
        Span::styled(format!("  words: {}", app.input.split_whitespace().count()), sub),
    ];
    if !normalize_source_text(&app.input).is_empty() && app.engine.is_cached(&app.input, app.difficulty) {
        settings.push(Span::styled("  (cached)", sub));
    }
    f.render_widget(
        Paragraph::new(Line::from(settings)).alignment(Alignment::Center),
        vertical_layout[2],
    );

    render_notice(f, app, centered_columns(vertical_layout[3], 80));
    render_footer(f, app);
}
