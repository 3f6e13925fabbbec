pub mod compose;
pub mod question;
pub mod results;
pub mod utils;

use crate::app::App;
use crate::models::Phase;
use crate::ui::utils::hex_to_rgb;
use ratatui::{
    style::Style,
    widgets::Block,
    Frame,
};

pub fn render(f: &mut Frame, app: &App) {
    let bg_color = hex_to_rgb(&app.theme.bg);
    f.render_widget(
        Block::default().style(Style::default().bg(bg_color)),
        f.area(),
    );

    match app.phase() {
        Phase::Idle => compose::draw(f, app),
        Phase::InProgress => question::draw(f, app),
        Phase::Results => results::draw(f, app),
    }
}
