use chrono::Local;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Task;
use crate::store::views;
use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};

/// Render the home screen: header with the pending count, then one row
/// per pending task.
pub fn render_home(frame: &mut Frame, app: &mut App, header: Rect, content: Rect) {
    render_header(frame, app, header);

    let today = Local::now().date_naive();
    let tasks = app.store.tasks().to_vec();
    let pending = views::pending_tasks(&tasks);

    if pending.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                " No pending tasks",
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(app.theme.background)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                " Press a to add one",
                Style::default().fg(app.theme.dim).bg(app.theme.background),
            )),
        ])
        .style(Style::default().bg(app.theme.background));
        frame.render_widget(empty, content);
        return;
    }

    // Clamp cursor and scroll to the visible window
    let cursor = app.home_cursor.min(pending.len() - 1);
    app.home_cursor = cursor;
    let visible_height = content.height as usize;
    let mut scroll = app.home_scroll.min(pending.len().saturating_sub(1));
    if cursor < scroll {
        scroll = cursor;
    } else if visible_height > 0 && cursor >= scroll + visible_height {
        scroll = cursor - visible_height + 1;
    }
    app.home_scroll = scroll;

    let mut lines: Vec<Line> = Vec::new();
    for (idx, task) in pending.iter().enumerate().skip(scroll).take(visible_height) {
        let is_cursor = idx == cursor;
        let done = app.renders_completed(&task.id, task.completed);
        lines.push(task_row(app, task, is_cursor, done, today, content.width));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(app.theme.background));
    frame.render_widget(paragraph, content);
}

fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let lines = vec![
        Line::from(vec![
            Span::styled(
                " TaskMate",
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {} pending", app.pending_count()),
                Style::default().fg(app.theme.dim).bg(bg),
            ),
            Span::styled(
                format!("  {} completed", app.completed_count()),
                Style::default().fg(app.theme.dim).bg(bg),
            ),
        ]),
        Line::from(Span::styled(
            "─".repeat(area.width as usize),
            Style::default().fg(app.theme.dim).bg(bg),
        )),
    ];
    frame.render_widget(Paragraph::new(lines).style(Style::default().bg(bg)), area);
}

/// One task row: cursor bar, checkbox, title, dim description, due date
/// right-aligned (warning color when overdue).
fn task_row<'a>(
    app: &App,
    task: &Task,
    is_cursor: bool,
    done: bool,
    today: chrono::NaiveDate,
    width: u16,
) -> Line<'a> {
    let bg = if is_cursor {
        app.theme.selection_bg
    } else {
        app.theme.background
    };
    let mut spans: Vec<Span> = Vec::new();

    if is_cursor {
        spans.push(Span::styled(
            "\u{258E}",
            Style::default().fg(app.theme.selection_border).bg(bg),
        ));
    } else {
        spans.push(Span::styled(" ", Style::default().bg(bg)));
    }

    let (checkbox, checkbox_color) = if done {
        ("[x] ", app.theme.done)
    } else {
        ("[ ] ", app.theme.text)
    };
    spans.push(Span::styled(
        checkbox,
        Style::default().fg(checkbox_color).bg(bg),
    ));

    let due_label = task.due_date.map(|d| format!("due {}", d));
    let due_width = due_label.as_deref().map_or(0, |l| l.len() + 2);

    let mut title_style = Style::default().fg(app.theme.text_bright).bg(bg);
    if done {
        title_style = title_style
            .fg(app.theme.dim)
            .add_modifier(Modifier::CROSSED_OUT);
    } else if is_cursor {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }

    let prefix_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    let mut available = (width as usize).saturating_sub(prefix_width + due_width + 1);
    let title = truncate_to_width(&task.title, available);
    available = available.saturating_sub(display_width(&title));
    spans.push(Span::styled(title, title_style));

    if let Some(desc) = &task.description {
        if available > 4 {
            let text = truncate_to_width(&format!("  {}", desc.replace('\n', " ")), available);
            spans.push(Span::styled(text, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    // Right-justify the due date with a 1-space buffer
    if let Some(label) = due_label {
        let content_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let start = (width as usize).saturating_sub(label.len() + 1);
        if content_width < start {
            spans.push(Span::styled(
                " ".repeat(start - content_width),
                Style::default().bg(bg),
            ));
        }
        let due_color = if task.is_overdue(today) {
            app.theme.warning
        } else {
            app.theme.dim
        };
        spans.push(Span::styled(label, Style::default().fg(due_color).bg(bg)));
    }

    // Pad to full width so the selection background spans the row
    let final_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
    if final_width < width as usize {
        spans.push(Span::styled(
            " ".repeat(width as usize - final_width),
            Style::default().bg(bg),
        ));
    }

    Line::from(spans)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TaskId;
    use crate::tui::render::test_helpers::*;
    use std::time::Instant;

    #[test]
    fn home_lists_pending_only() {
        let mut app = app_with_tasks(vec![
            task("a", "Buy milk", false),
            task("b", "Old chore", true),
        ]);
        let output = render_home_to_string(&mut app);
        assert!(output.contains("Buy milk"));
        assert!(!output.contains("Old chore"));
        assert!(output.contains("1 pending"));
        assert!(output.contains("1 completed"));
    }

    #[test]
    fn home_empty_state() {
        let mut app = app_with_tasks(Vec::new());
        let output = render_home_to_string(&mut app);
        assert!(output.contains("No pending tasks"));
        assert!(output.contains("Press a to add one"));
    }

    #[test]
    fn pending_commit_renders_checked_while_store_lags() {
        let mut app = app_with_tasks(vec![task("a", "Buy milk", false)]);
        app.tap_task(&TaskId::from("a"), Instant::now());
        assert!(!app.store.tasks()[0].completed);
        let output = render_home_to_string(&mut app);
        assert!(output.contains("[x]"), "row must render completed:\n{}", output);
    }

    #[test]
    fn due_date_is_right_aligned() {
        let mut app = app_with_tasks(vec![task_due("a", "Report", "2026-03-10")]);
        let output = render_home_to_string(&mut app);
        let row = output
            .lines()
            .find(|l| l.contains("Report"))
            .expect("task row");
        assert!(row.trim_end().ends_with("due 2026-03-10"));
    }
}
