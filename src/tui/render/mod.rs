pub mod add_form;
pub mod completed;
pub mod home;
pub mod splash;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::util::unicode::truncate_to_width;

use super::app::{App, Screen};

/// Main render function: dispatches to the current screen
pub fn render(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    if app.screen == Screen::Splash {
        splash::render_splash(frame, app, area);
        return;
    }

    // Layout: header (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    match app.screen {
        Screen::Home => home::render_home(frame, app, chunks[0], chunks[1]),
        Screen::Completed => completed::render_completed(frame, app, chunks[0], chunks[1]),
        Screen::Splash => {}
    }

    render_status_row(frame, app, chunks[2]);

    // Popups, innermost last so it draws on top
    if app.confirm_delete.is_some() {
        render_confirm_popup(frame, app, area);
    }
    if app.add_form.is_some() {
        add_form::render_add_form(frame, app, area);
    }
    if let Some(message) = &app.alert {
        render_alert(frame, app, area, message.clone());
    }
}

/// Bottom line: transient notice, or the key hints for the screen
fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let (text, style) = if let Some(notice) = &app.notice {
        (
            format!(" {}", notice),
            Style::default().fg(app.theme.warning).bg(app.theme.background),
        )
    } else {
        let hints = match app.screen {
            Screen::Home => " j/k move   space toggle   a add   d delete   c completed   q quit",
            Screen::Completed => " j/k move   b back   q quit",
            Screen::Splash => "",
        };
        (
            hints.to_string(),
            Style::default().fg(app.theme.dim).bg(app.theme.background),
        )
    };
    frame.render_widget(Paragraph::new(text).style(style), area);
}

fn render_confirm_popup(frame: &mut Frame, app: &App, area: Rect) {
    let popup = centered_rect(area, 40, 5);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.selection_border))
        .style(Style::default().bg(app.theme.selection_bg));

    let lines = vec![
        Line::from(Span::styled(
            "Delete this task?",
            Style::default()
                .fg(app.theme.text_bright)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "y delete    any other key cancels",
            Style::default().fg(app.theme.dim),
        )),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(block).centered(),
        popup,
    );
}

fn render_alert(frame: &mut Frame, app: &App, area: Rect, message: String) {
    let width = (area.width.saturating_sub(4)).min(60).max(20);
    let popup = centered_rect(area, width, 5);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.error))
        .style(Style::default().bg(app.theme.selection_bg));

    let inner_width = width.saturating_sub(2) as usize;
    let lines = vec![
        Line::from(Span::styled(
            truncate_to_width(&message, inner_width),
            Style::default().fg(app.theme.text_bright),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "press any key to dismiss",
            Style::default().fg(app.theme.dim),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).block(block).centered(), popup);
}

/// A rect of the given size centered in `area`, clamped to fit.
pub(super) fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
