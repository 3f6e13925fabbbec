use crate::app::App;
use crate::history::format_history;
use crate::models::Difficulty;
use crate::ui::utils::{centered_columns, hex_to_rgb, render_footer, render_header};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{BarChart, Block, Borders, Paragraph, Wrap},
    Frame,
};

#[derive(Debug, Clone, Copy)]
enum LayoutMode {
    Full,
    Compact,
}

pub fn draw(f: &mut Frame, app: &App) {
    render_header(f, app);

    let main_area = Rect::new(0, 2, f.area().width, f.area().height.saturating_sub(3));
    let area = centered_columns(main_area, 82);

    let layout_mode = if area.height >= 30 { LayoutMode::Full } else { LayoutMode::Compact };

    let sub_color = hex_to_rgb(&app.theme.sub);
    let main_color = hex_to_rgb(&app.theme.main);

    match layout_mode {
        LayoutMode::Full => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(6),
                    Constraint::Fill(2),
                    Constraint::Length(8),
                    Constraint::Fill(1),
                ])
                .split(area);
            draw_stats_card(f, app, rows[0], sub_color, main_color);
            draw_review(f, app, rows[1], sub_color, main_color);
            draw_difficulty_chart(f, app, rows[2], sub_color, main_color);
            draw_history(f, app, rows[3], sub_color);
        }
        LayoutMode::Compact => {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(6), Constraint::Fill(2), Constraint::Fill(1)])
                .split(area);
            draw_stats_card(f, app, rows[0], sub_color, main_color);
            draw_review(f, app, rows[1], sub_color, main_color);
            draw_history(f, app, rows[2], sub_color);
        }
    }

    render_footer(f, app);
}

fn draw_stats_card(f: &mut Frame, app: &App, area: Rect, sub_color: Color, main_color: Color) {
    let Some(session) = app.engine.session() else { return };
    let tracker = app.engine.stats();
    let stats = tracker.stats();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);

    let border = "─".repeat(area.width as usize);
    f.render_widget(Paragraph::new(border.clone()).style(Style::default().fg(sub_color)), rows[0]);

    let score_line = Line::from(vec![
        Span::styled("  You scored ", Style::default().fg(sub_color)),
        Span::styled(
            format!("{} / {}", session.score(), session.len()),
            Style::default()
                .fg(main_color)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        ),
        Span::styled(
            format!(
                "  {:.0}%  ({})",
                session.score() as f64 / session.len() as f64 * 100.0,
                session.difficulty()
            ),
            Style::default().fg(sub_color),
        ),
    ]);
    f.render_widget(Paragraph::new(score_line).alignment(Alignment::Center), rows[1]);

    let overall = Line::from(vec![
        Span::styled("accuracy ", Style::default().fg(sub_color)),
        Span::styled(format!("{:.2}%", tracker.accuracy_percent()), Style::default().fg(main_color)),
        Span::styled("  │  ", Style::default().fg(sub_color)),
        Span::styled("answered ", Style::default().fg(sub_color)),
        Span::styled(
            format!("{}/{}", stats.correct_answered, stats.total_answered),
            Style::default().fg(main_color),
        ),
        Span::styled("  │  ", Style::default().fg(sub_color)),
        Span::styled("avg time ", Style::default().fg(sub_color)),
        Span::styled(format!("{:.1}s", stats.average_time_per_question), Style::default().fg(main_color)),
    ]);
    f.render_widget(Paragraph::new(overall).alignment(Alignment::Center), rows[2]);

    let streaks = Line::from(vec![
        Span::styled("streak ", Style::default().fg(sub_color)),
        Span::styled(stats.current_streak.to_string(), Style::default().fg(main_color)),
        Span::styled("  │  ", Style::default().fg(sub_color)),
        Span::styled("best ", Style::default().fg(sub_color)),
        Span::styled(stats.best_streak.to_string(), Style::default().fg(main_color)),
    ]);
    f.render_widget(Paragraph::new(streaks).alignment(Alignment::Center), rows[3]);

    let wrong = session.review().filter(|(q, picked)| !q.is_correct(*picked)).count();
    let tally = Line::from(vec![
        Span::styled("correct ", Style::default().fg(sub_color)),
        Span::styled(session.score().to_string(), Style::default().fg(main_color)),
        Span::styled("  │  ", Style::default().fg(sub_color)),
        Span::styled("wrong ", Style::default().fg(sub_color)),
        Span::styled(wrong.to_string(), Style::default().fg(hex_to_rgb(&app.theme.error))),
    ]);
    f.render_widget(Paragraph::new(tally).alignment(Alignment::Center), rows[4]);

    f.render_widget(Paragraph::new(border).style(Style::default().fg(sub_color)), rows[5]);
}

/// Every question with the option picked and, for misses, the right one.
fn draw_review(f: &mut Frame, app: &App, area: Rect, sub_color: Color, main_color: Color) {
    let Some(session) = app.engine.session() else { return };
    let text_color = hex_to_rgb(&app.theme.text);
    let error_color = hex_to_rgb(&app.theme.error);

    let mut lines = Vec::new();
    for (i, (question, picked)) in session.review().enumerate() {
        lines.push(Line::from(vec![
            Span::styled(format!("{}. ", i + 1), Style::default().fg(sub_color)),
            Span::styled(question.prompt.as_str(), Style::default().fg(text_color)),
        ]));

        let was_correct = question.is_correct(picked);
        let mut answer = vec![
            Span::styled("   your answer ", Style::default().fg(sub_color)),
            Span::styled(
                format!("{}) {}", picked, question.option(picked)),
                Style::default().fg(if was_correct { main_color } else { error_color }),
            ),
        ];
        if !was_correct {
            answer.push(Span::styled("   correct ", Style::default().fg(sub_color)));
            answer.push(Span::styled(
                format!("{}) {}", question.correct, question.option(question.correct)),
                Style::default().fg(main_color),
            ));
        }
        lines.push(Line::from(answer));
    }

    f.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .title(" review ")
                    .borders(Borders::TOP)
                    .style(Style::default().fg(hex_to_rgb(&app.theme.sub_alt))),
            )
            .wrap(Wrap { trim: false }),
        area,
    );
}

fn draw_difficulty_chart(f: &mut Frame, app: &App, area: Rect, sub_color: Color, main_color: Color) {
    let counts = &app.engine.stats().stats().difficulty_counts;
    let data: Vec<(&str, u64)> = Difficulty::all()
        .iter()
        .map(|d| (d.label(), counts.get(d).copied().unwrap_or(0) as u64))
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(" answers by difficulty ")
                .borders(Borders::ALL)
                .style(Style::default().fg(hex_to_rgb(&app.theme.sub_alt))),
        )
        .data(data.as_slice())
        .bar_width(8)
        .bar_gap(3)
        .bar_style(Style::default().fg(main_color))
        .value_style(Style::default().fg(hex_to_rgb(&app.theme.bg)).bg(main_color))
        .label_style(Style::default().fg(sub_color));

    f.render_widget(chart, centered_columns(area, 60));
}

fn draw_history(f: &mut Frame, app: &App, area: Rect, sub_color: Color) {
    let lines: Vec<Line> = format_history(app.engine.stats().stats(), area.width as usize)
        .into_iter()
        .map(Line::from)
        .collect();
    f.render_widget(Paragraph::new(lines).style(Style::default().fg(sub_color)), area);
}
