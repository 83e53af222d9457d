//! UI rendering
//!
//! Pure functions turning a [`Screen`] into ratatui widgets. No I/O.

mod status;

use deauther_app::Screen;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
};

pub use status::StatusView;

/// Render the whole terminal: scrollback with the live prompt, then a status bar.
pub fn render(frame: &mut Frame, screen: &Screen, status: StatusView) {
    const BODY_MIN_HEIGHT: u16 = 1;
    const STATUS_HEIGHT: u16 = 1;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(BODY_MIN_HEIGHT), Constraint::Length(STATUS_HEIGHT)])
        .split(frame.area());

    let [body_area, status_area] = chunks.as_ref() else {
        return;
    };

    render_body(frame, screen, *body_area);
    status::render(frame, screen, status, *status_area);
}

/// Scrollback tail. The live input line, if any, sits below the last line.
fn render_body(frame: &mut Frame, screen: &Screen, area: Rect) {
    let input = screen.input().map(|input| format!("{}{}", input.label, input.echo));

    let mut rows: Vec<&str> = screen.lines().iter().map(String::as_str).collect();
    if let Some(input) = input.as_deref() {
        rows.push(input);
    }

    let skip = rows.len().saturating_sub(area.height as usize);
    let visible: Vec<Line> = rows.iter().skip(skip).map(|row| Line::raw(*row)).collect();
    let shown = visible.len();

    let paragraph = Paragraph::new(visible).style(Style::default().fg(Color::Green));
    frame.render_widget(paragraph, area);

    if let Some(input) = input.as_deref() {
        let width = input.chars().count() as u16;
        let cursor_x = area.x.saturating_add(width).min(area.right().saturating_sub(1));
        let cursor_y = area.y.saturating_add(shown.saturating_sub(1) as u16);
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}
