use std::time::Instant;

use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;

use crate::model::{AppConfig, Task, TaskDraft, TaskId};
use crate::store::LocalStore;
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// A task fixture with just an id, title, and completion flag.
pub fn task(id: &str, title: &str, completed: bool) -> Task {
    let mut t = Task::new(
        TaskId::from(id),
        TaskDraft {
            title: title.into(),
            ..Default::default()
        },
    );
    t.completed = completed;
    t
}

/// A pending task with a due date.
pub fn task_due(id: &str, title: &str, due: &str) -> Task {
    let mut t = task(id, title, false);
    t.due_date = Some(due.parse().unwrap());
    t
}

/// Build an App over a seeded local store, past the splash.
pub fn app_with_tasks(tasks: Vec<Task>) -> App {
    let store = Box::new(LocalStore::with_tasks(tasks));
    let mut app = App::new(store, &AppConfig::default(), Instant::now());
    app.finish_splash();
    app
}

/// Render the full app (current screen plus overlays).
pub fn render_app_to_string(app: &mut App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, _area| {
        super::render(frame, app);
    })
}

/// Render just the home screen's header and list.
pub fn render_home_to_string(app: &mut App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, area| {
        let header = Rect { height: 2, ..area };
        let content = Rect {
            y: area.y + 2,
            height: area.height - 2,
            ..area
        };
        super::home::render_home(frame, app, header, content);
    })
}

/// Render just the completed screen's header and list.
pub fn render_completed_to_string(app: &mut App) -> String {
    render_to_string(TERM_W, TERM_H, |frame, area| {
        let header = Rect { height: 2, ..area };
        let content = Rect {
            y: area.y + 2,
            height: area.height - 2,
            ..area
        };
        super::completed::render_completed(frame, app, header, content);
    })
}
