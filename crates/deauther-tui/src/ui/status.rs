//! Status bar
//!
//! Busy indicator plus host mode.

use deauther_app::Screen;
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
};

/// Host state shown next to the busy indicator.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusView {
    /// Fast mode is on.
    pub fast: bool,
    /// A run is listening for the interrupt combination.
    pub armed: bool,
}

/// Render the status bar.
pub fn render(frame: &mut Frame, screen: &Screen, view: StatusView, area: Rect) {
    let state = if screen.is_busy() {
        Span::styled("BUSY", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    } else {
        Span::styled("READY", Style::default().fg(Color::Green))
    };

    let mut spans = vec![Span::raw(" "), state];
    if view.fast {
        spans.push(Span::raw(" | FAST"));
    }
    if view.armed {
        spans.push(Span::raw(" | ctrl+c to stop"));
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .style(Style::default().bg(Color::DarkGray).fg(Color::White));

    frame.render_widget(paragraph, area);
}
