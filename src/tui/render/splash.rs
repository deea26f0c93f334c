use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::app::App;

/// Render the splash screen: app name, tagline, and a skip hint,
/// vertically centered.
pub fn render_splash(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;

    let mut lines: Vec<Line> = Vec::new();
    let top_pad = area.height.saturating_sub(5) / 2;
    for _ in 0..top_pad {
        lines.push(Line::from(""));
    }
    lines.push(Line::from(Span::styled(
        "[/] TaskMate",
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Organize your day with ease.",
        Style::default().fg(app.theme.text).bg(bg),
    )));
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "press any key",
        Style::default().fg(app.theme.dim).bg(bg),
    )));

    frame.render_widget(
        Paragraph::new(lines)
            .style(Style::default().bg(bg))
            .centered(),
        area,
    );
}
