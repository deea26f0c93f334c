use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::tui::app::{App, FormField};
use crate::util::unicode::truncate_to_width;

use super::centered_rect;

const FIELDS: [(FormField, &str); 3] = [
    (FormField::Title, "Title"),
    (FormField::Description, "Description"),
    (FormField::Due, "Due (YYYY-MM-DD)"),
];

/// Render the add-task popup over the home screen.
pub fn render_add_form(frame: &mut Frame, app: &App, area: Rect) {
    let Some(form) = &app.add_form else {
        return;
    };

    let width = area.width.saturating_sub(6).min(52).max(24);
    let popup = centered_rect(area, width, 10);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" New Task ")
        .border_style(Style::default().fg(app.theme.accent))
        .style(Style::default().bg(app.theme.selection_bg));

    let inner_width = width.saturating_sub(4) as usize;
    let mut lines: Vec<Line> = Vec::new();
    for (field, label) in FIELDS {
        let focused = form.focused() == field;
        let marker = if focused { "> " } else { "  " };
        let label_style = if focused {
            Style::default()
                .fg(app.theme.text_bright)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.dim)
        };
        lines.push(Line::from(Span::styled(
            format!("{}{}", marker, label),
            label_style,
        )));

        let text = form.field_text(field);
        let shown = truncate_to_width(text, inner_width.saturating_sub(3));
        let value_style = Style::default().fg(app.theme.text);
        let cursor_span = if focused && !form.submitting {
            Span::styled(
                "\u{2581}",
                Style::default().fg(app.theme.accent),
            )
        } else {
            Span::raw("")
        };
        lines.push(Line::from(vec![
            Span::styled(format!("  {}", shown), value_style),
            cursor_span,
        ]));
    }

    lines.push(Line::from(""));
    if form.submitting {
        lines.push(Line::from(Span::styled(
            "  saving\u{2026}",
            Style::default().fg(app.theme.accent),
        )));
    } else if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(
            format!("  {}", truncate_to_width(error, inner_width)),
            Style::default().fg(app.theme.error),
        )));
    } else {
        lines.push(Line::from(Span::styled(
            "  tab next field   enter save   esc cancel",
            Style::default().fg(app.theme.dim),
        )));
    }

    frame.render_widget(Paragraph::new(lines).block(block), popup);
}

#[cfg(test)]
mod tests {
    use crate::tui::app::AddForm;
    use crate::tui::render::test_helpers::*;

    #[test]
    fn form_shows_fields_and_hints() {
        let mut app = app_with_tasks(Vec::new());
        app.add_form = Some(AddForm::new());
        let output = render_app_to_string(&mut app);
        assert!(output.contains("New Task"));
        assert!(output.contains("> Title"));
        assert!(output.contains("Description"));
        assert!(output.contains("Due (YYYY-MM-DD)"));
        assert!(output.contains("enter save"));
    }

    #[test]
    fn form_shows_validation_error() {
        let mut app = app_with_tasks(Vec::new());
        let mut form = AddForm::new();
        form.error = Some("title must not be empty".into());
        app.add_form = Some(form);
        let output = render_app_to_string(&mut app);
        assert!(output.contains("title must not be empty"));
    }

    #[test]
    fn form_shows_submitting_state() {
        let mut app = app_with_tasks(Vec::new());
        let mut form = AddForm::new();
        form.title = "Buy milk".into();
        form.submitting = true;
        app.add_form = Some(form);
        let output = render_app_to_string(&mut app);
        assert!(output.contains("saving"));
    }
}
