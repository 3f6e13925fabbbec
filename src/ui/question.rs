use crate::app::App;
use crate::models::Letter;
use crate::ui::utils::{centered_columns, format_timer, hex_to_rgb, render_footer, render_header, render_notice};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use textwrap::Options;

pub fn draw(f: &mut Frame, app: &App) {
    let Some(session) = app.engine.session() else { return };
    let question = session.current_question();

    render_header(f, app);

    let vertical_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(3),
            Constraint::Length(1),
            Constraint::Length(4),
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .split(f.area());

    let sub = Style::default().fg(hex_to_rgb(&app.theme.sub));
    let main = Style::default().fg(hex_to_rgb(&app.theme.main));
    let text = Style::default().fg(hex_to_rgb(&app.theme.text));

    let status = Line::from(vec![
        Span::styled(
            format!("{}/{}", session.current_index() + 1, session.len()),
            main.add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  score {}  time {}", session.score(), format_timer(app.question_elapsed())),
            sub,
        ),
    ]);
    f.render_widget(Paragraph::new(status), centered_columns(vertical_layout[1], 80));

    let question_area = centered_columns(vertical_layout[3], 80);
    let width = question_area.width.max(1) as usize;
    let prompt_lines: Vec<Line> = textwrap::wrap(&question.prompt, Options::new(width))
        .into_iter()
        .map(|l| Line::from(Span::styled(l.into_owned(), text.add_modifier(Modifier::BOLD))))
        .collect();
    f.render_widget(Paragraph::new(prompt_lines), question_area);

    let options: Vec<Line> = Letter::ALL
        .iter()
        .map(|letter| {
            let selected = *letter == app.cursor;
            let marker = if selected { "> " } else { "  " };
            let style = if selected { main } else { text };
            Line::from(vec![
                Span::styled(format!("{}{}) ", marker, letter), sub),
                Span::styled(question.option(*letter).to_string(), style),
            ])
        })
        .collect();
    f.render_widget(Paragraph::new(options), centered_columns(vertical_layout[5], 80));

    if let Some(outcome) = app.last_outcome {
        let feedback = if outcome.was_correct {
            Span::styled("previous answer: correct", main)
        } else {
            Span::styled(
                format!("previous answer: {} was wrong, it was {}", outcome.selected, outcome.correct),
                Style::default().fg(hex_to_rgb(&app.theme.error)),
            )
        };
        f.render_widget(
            Paragraph::new(Line::from(feedback)).alignment(Alignment::Center),
            vertical_layout[6],
        );
    }

    render_notice(f, app, centered_columns(vertical_layout[7], 80));
    render_footer(f, app);
}
