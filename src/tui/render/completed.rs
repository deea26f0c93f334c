use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::store::views;
use crate::tui::app::App;
use crate::util::unicode::{display_width, truncate_to_width};

/// Render the completed-tasks screen. View-only: rows cannot be toggled
/// or deleted from here.
pub fn render_completed(frame: &mut Frame, app: &mut App, header: Rect, content: Rect) {
    let bg = app.theme.background;

    let header_lines = vec![
        Line::from(vec![
            Span::styled(
                " Completed Tasks",
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  {}", app.completed_count()),
                Style::default().fg(app.theme.done).bg(bg),
            ),
        ]),
        Line::from(Span::styled(
            "─".repeat(header.width as usize),
            Style::default().fg(app.theme.dim).bg(bg),
        )),
    ];
    frame.render_widget(
        Paragraph::new(header_lines).style(Style::default().bg(bg)),
        header,
    );

    let tasks = app.store.tasks().to_vec();
    let completed = views::completed_tasks(&tasks);

    if completed.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                " No completed tasks",
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(bg)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                " Finish a task to see it here",
                Style::default().fg(app.theme.dim).bg(bg),
            )),
        ])
        .style(Style::default().bg(bg));
        frame.render_widget(empty, content);
        return;
    }

    let cursor = app.completed_cursor.min(completed.len() - 1);
    app.completed_cursor = cursor;
    let visible_height = content.height as usize;
    let mut scroll = app.completed_scroll.min(completed.len().saturating_sub(1));
    if cursor < scroll {
        scroll = cursor;
    } else if visible_height > 0 && cursor >= scroll + visible_height {
        scroll = cursor - visible_height + 1;
    }
    app.completed_scroll = scroll;

    let mut lines: Vec<Line> = Vec::new();
    for (idx, task) in completed
        .iter()
        .enumerate()
        .skip(scroll)
        .take(visible_height)
    {
        let is_cursor = idx == cursor;
        let row_bg = if is_cursor { app.theme.selection_bg } else { bg };
        let mut spans: Vec<Span> = Vec::new();

        if is_cursor {
            spans.push(Span::styled(
                "\u{258E}",
                Style::default().fg(app.theme.selection_border).bg(row_bg),
            ));
        } else {
            spans.push(Span::styled(" ", Style::default().bg(row_bg)));
        }
        spans.push(Span::styled(
            "[x] ",
            Style::default().fg(app.theme.done).bg(row_bg),
        ));

        let prefix_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        let available = (content.width as usize).saturating_sub(prefix_width + 1);
        let title = truncate_to_width(&task.title, available);
        spans.push(Span::styled(
            title,
            Style::default()
                .fg(app.theme.text)
                .bg(row_bg)
                .add_modifier(Modifier::CROSSED_OUT),
        ));

        let final_width: usize = spans.iter().map(|s| display_width(&s.content)).sum();
        if final_width < content.width as usize {
            spans.push(Span::styled(
                " ".repeat(content.width as usize - final_width),
                Style::default().bg(row_bg),
            ));
        }
        lines.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(lines).style(Style::default().bg(bg));
    frame.render_widget(paragraph, content);
}
