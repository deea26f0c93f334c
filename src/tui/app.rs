use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use chrono::Local;
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use crate::io::config_io::load_config;
use crate::model::{AppConfig, TaskDraft, TaskId, parse_due_date};
use crate::pending::{PendingCommits, TapOutcome};
use crate::store::{AddOutcome, StoreEvent, StoreOp, TaskStore, open_store, views};

use super::input;
use super::render;
use super::theme::Theme;

/// Which screen is currently displayed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Splash,
    Home,
    Completed,
}

/// Field focus inside the add form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Title,
    Description,
    Due,
}

/// State of the add-task popup
#[derive(Debug, Default)]
pub struct AddForm {
    pub title: String,
    pub description: String,
    pub due: String,
    pub field: Option<FormField>,
    /// Byte offset of the cursor within the focused field
    pub cursor: usize,
    /// Validation or remote failure shown inside the form
    pub error: Option<String>,
    /// Remote backing: waiting for the server to acknowledge the add
    pub submitting: bool,
}

impl AddForm {
    pub fn new() -> Self {
        AddForm {
            field: Some(FormField::Title),
            ..Default::default()
        }
    }

    pub fn focused(&self) -> FormField {
        self.field.unwrap_or(FormField::Title)
    }

    pub fn field_text(&self, field: FormField) -> &str {
        match field {
            FormField::Title => &self.title,
            FormField::Description => &self.description,
            FormField::Due => &self.due,
        }
    }

    pub fn field_text_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::Title => &mut self.title,
            FormField::Description => &mut self.description,
            FormField::Due => &mut self.due,
        }
    }
}

/// Main application state
pub struct App {
    pub store: Box<dyn TaskStore>,
    pub pending: PendingCommits,
    pub theme: Theme,
    pub screen: Screen,
    pub should_quit: bool,
    /// Cursor index into the pending list on the home screen
    pub home_cursor: usize,
    pub home_scroll: usize,
    pub completed_cursor: usize,
    pub completed_scroll: usize,
    pub add_form: Option<AddForm>,
    /// Delete awaiting confirmation
    pub confirm_delete: Option<TaskId>,
    /// Dismissible failure overlay
    pub alert: Option<String>,
    /// One-line transient message in the status row
    pub notice: Option<String>,
    splash_until: Option<Instant>,
}

impl App {
    pub fn new(store: Box<dyn TaskStore>, config: &AppConfig, now: Instant) -> Self {
        App {
            store,
            pending: PendingCommits::new(Duration::from_millis(config.ui.commit_delay_ms)),
            theme: Theme::from_config(&config.ui),
            screen: Screen::Splash,
            should_quit: false,
            home_cursor: 0,
            home_scroll: 0,
            completed_cursor: 0,
            completed_scroll: 0,
            add_form: None,
            confirm_delete: None,
            alert: None,
            notice: None,
            splash_until: Some(now + Duration::from_millis(config.ui.splash_ms)),
        }
    }

    /// How the row should render: the store's flag, or ahead of it while a
    /// commit is pending.
    pub fn renders_completed(&self, id: &TaskId, stored: bool) -> bool {
        stored || self.pending.is_pending(id)
    }

    /// Leave the splash early (any key) or on its deadline.
    pub fn finish_splash(&mut self) {
        if self.screen == Screen::Splash {
            self.screen = Screen::Home;
            self.splash_until = None;
        }
    }

    /// Advance time-driven state: the splash deadline, store notifications,
    /// and due optimistic commits. Runs once per event-loop turn.
    pub fn tick(&mut self, now: Instant) {
        if let Some(deadline) = self.splash_until {
            if now >= deadline {
                self.finish_splash();
            }
        }

        for event in self.store.poll() {
            match event {
                StoreEvent::Changed => {
                    // Tasks deleted elsewhere must not keep a timer alive
                    let live: Vec<TaskId> =
                        self.store.tasks().iter().map(|t| t.id.clone()).collect();
                    self.pending.prune_missing(live.iter());
                }
                StoreEvent::Added(_) => {
                    if let Some(form) = &mut self.add_form {
                        if form.submitting {
                            self.add_form = None;
                            self.notice = Some("task added".into());
                        }
                    }
                }
                StoreEvent::OpFailed { op, message } => self.op_failed(op, message),
            }
        }

        for id in self.pending.take_due(now) {
            if let Err(e) = self.store.toggle(&id, Some(true)) {
                self.alert = Some(format!("could not complete task: {}", e));
            }
        }

        self.clamp_cursors();
    }

    fn op_failed(&mut self, op: StoreOp, message: String) {
        match op {
            // Keep the form open with the input intact so the user can retry
            StoreOp::Add => match &mut self.add_form {
                Some(form) if form.submitting => {
                    form.submitting = false;
                    form.error = Some(format!("could not save: {}", message));
                }
                _ => self.alert = Some(format!("add failed: {}", message)),
            },
            // The next snapshot reverts any optimistic state on its own
            StoreOp::Toggle => self.alert = Some(format!("toggle failed: {}", message)),
            StoreOp::Delete => self.alert = Some(format!("delete failed: {}", message)),
        }
    }

    /// The checkbox tap on the home screen: optimistic completion with a
    /// cancellation window.
    pub fn tap_task(&mut self, id: &TaskId, now: Instant) {
        let stored = self
            .store
            .tasks()
            .iter()
            .find(|t| &t.id == id)
            .map(|t| t.completed);
        let Some(stored) = stored else {
            return; // row raced a deletion
        };
        match self.pending.tap(id, stored, now) {
            TapOutcome::Scheduled | TapOutcome::Cancelled => {}
            TapOutcome::RevertNow => {
                if let Err(e) = self.store.toggle(id, Some(false)) {
                    self.alert = Some(format!("toggle failed: {}", e));
                }
            }
        }
    }

    /// Delete the task, cancelling its pending commit first so the timer
    /// can never fire on a gone task.
    pub fn delete_task(&mut self, id: &TaskId) {
        self.pending.cancel(id);
        if let Err(e) = self.store.delete(id) {
            self.alert = Some(format!("delete failed: {}", e));
        }
    }

    /// Validate the add form and hand it to the store. Validation failures
    /// stay in the form; with the remote backing the form waits for the
    /// server's acknowledgement.
    pub fn submit_add_form(&mut self) {
        let Some(form) = &mut self.add_form else {
            return;
        };
        if form.submitting {
            return;
        }

        let due = match form.due.trim() {
            "" => None,
            text => match parse_due_date(text) {
                Ok(date) => Some(date),
                Err(e) => {
                    form.error = Some(e.to_string());
                    return;
                }
            },
        };
        let draft = TaskDraft {
            title: form.title.clone(),
            description: Some(form.description.clone()).filter(|d| !d.trim().is_empty()),
            due_date: due,
        };
        let draft = match draft.validate(Local::now().date_naive()) {
            Ok(draft) => draft,
            Err(e) => {
                form.error = Some(e.to_string());
                return;
            }
        };

        match self.store.add(draft) {
            Ok(AddOutcome::Added(_)) => {
                self.add_form = None;
                self.notice = Some("task added".into());
            }
            Ok(AddOutcome::Submitted) => {
                form.error = None;
                form.submitting = true;
            }
            Err(e) => {
                form.error = Some(format!("could not save: {}", e));
            }
        }
    }

    pub fn pending_count(&self) -> usize {
        views::pending_tasks(self.store.tasks()).len()
    }

    pub fn completed_count(&self) -> usize {
        views::completed_tasks(self.store.tasks()).len()
    }

    /// Id under the home cursor, if any.
    pub fn home_selected(&self) -> Option<TaskId> {
        views::pending_tasks(self.store.tasks())
            .get(self.home_cursor)
            .map(|t| t.id.clone())
    }

    fn clamp_cursors(&mut self) {
        let pending = self.pending_count();
        self.home_cursor = self.home_cursor.min(pending.saturating_sub(1));
        let completed = self.completed_count();
        self.completed_cursor = self.completed_cursor.min(completed.saturating_sub(1));
    }

    /// Poll timeout for the event loop: short enough to hit the splash
    /// deadline and the earliest optimistic commit on time.
    pub fn poll_timeout(&self, now: Instant) -> Duration {
        let tick = Duration::from_millis(250);
        let mut deadline = self.splash_until;
        if let Some(commit) = self.pending.next_deadline() {
            deadline = Some(deadline.map_or(commit, |d| d.min(commit)));
        }
        match deadline {
            Some(d) => d.saturating_duration_since(now).min(tick),
            None => tick,
        }
    }
}

/// Run the TUI application
pub fn run(data_dir: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(data_dir)?;
    let store = open_store(&config, data_dir)?;
    info!(backing = ?config.store.backing, "starting TUI");

    let mut app = App::new(store, &config, Instant::now());

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    // Run event loop
    let result = run_event_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        let now = Instant::now();
        app.tick(now);

        terminal.draw(|frame| render::render(frame, app))?;

        if event::poll(app.poll_timeout(Instant::now()))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            input::handle_key(app, key);
        }

        if app.should_quit {
            break;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Task;
    use crate::store::LocalStore;

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.into(),
            ..Default::default()
        }
    }

    fn task(id: &str, completed: bool) -> Task {
        let mut t = Task::new(TaskId::from(id), draft(id));
        t.completed = completed;
        t
    }

    fn app_with(tasks: Vec<Task>) -> App {
        let store = Box::new(LocalStore::with_tasks(tasks));
        App::new(store, &AppConfig::default(), Instant::now())
    }

    const DELAY: Duration = Duration::from_millis(1200);

    #[test]
    fn splash_finishes_on_deadline() {
        let start = Instant::now();
        let store = Box::new(LocalStore::new());
        let mut app = App::new(store, &AppConfig::default(), start);
        assert_eq!(app.screen, Screen::Splash);
        app.tick(start + Duration::from_millis(999));
        assert_eq!(app.screen, Screen::Splash);
        app.tick(start + Duration::from_millis(1001));
        assert_eq!(app.screen, Screen::Home);
    }

    #[test]
    fn any_key_can_skip_the_splash() {
        let mut app = app_with(Vec::new());
        app.finish_splash();
        assert_eq!(app.screen, Screen::Home);
        // Idempotent once home
        app.finish_splash();
        assert_eq!(app.screen, Screen::Home);
    }

    #[test]
    fn tap_then_wait_commits_once() {
        let mut app = app_with(vec![task("a", false)]);
        let id = TaskId::from("a");
        let now = Instant::now();

        app.tap_task(&id, now);
        // Optimistic: renders completed, store still pending
        assert!(app.renders_completed(&id, app.store.tasks()[0].completed));
        assert!(!app.store.tasks()[0].completed);

        app.tick(now + DELAY);
        assert!(app.store.tasks()[0].completed);
        assert!(app.pending.is_empty());
    }

    #[test]
    fn second_tap_cancels_before_commit() {
        let mut app = app_with(vec![task("a", false)]);
        let id = TaskId::from("a");
        let now = Instant::now();

        app.tap_task(&id, now);
        app.tap_task(&id, now + DELAY / 2);
        assert!(!app.renders_completed(&id, app.store.tasks()[0].completed));

        app.tick(now + DELAY * 2);
        assert!(!app.store.tasks()[0].completed, "cancelled tap must not commit");
    }

    #[test]
    fn delete_while_pending_prevents_commit() {
        let mut app = app_with(vec![task("a", false), task("b", false)]);
        let id = TaskId::from("a");
        let now = Instant::now();

        app.tap_task(&id, now);
        app.delete_task(&id);
        app.tick(now + DELAY * 2);

        assert_eq!(app.store.tasks().len(), 1);
        assert_eq!(app.store.tasks()[0].id.as_str(), "b");
        assert!(!app.store.tasks()[0].completed);
    }

    #[test]
    fn tap_on_externally_completed_task_reverts_directly() {
        let mut app = app_with(vec![task("a", true)]);
        let id = TaskId::from("a");
        app.tap_task(&id, Instant::now());
        assert!(!app.store.tasks()[0].completed);
        assert!(app.pending.is_empty());
    }

    #[test]
    fn tap_on_missing_task_is_a_noop() {
        let mut app = app_with(Vec::new());
        app.tap_task(&TaskId::from("ghost"), Instant::now());
        assert!(app.pending.is_empty());
        assert!(app.alert.is_none());
    }

    #[test]
    fn submit_form_rejects_invalid_input_without_mutating() {
        let mut app = app_with(Vec::new());
        app.add_form = Some(AddForm::new());
        app.submit_add_form();
        assert!(app.add_form.as_ref().unwrap().error.is_some());
        assert!(app.store.tasks().is_empty());

        let form = app.add_form.as_mut().unwrap();
        form.title = "Report".into();
        form.due = "yesterday".into();
        app.submit_add_form();
        assert!(app.add_form.as_ref().unwrap().error.is_some());
        assert!(app.store.tasks().is_empty());
    }

    #[test]
    fn submit_form_adds_and_closes_on_local_backing() {
        let mut app = app_with(Vec::new());
        let mut form = AddForm::new();
        form.title = "Buy milk".into();
        app.add_form = Some(form);
        app.submit_add_form();
        assert!(app.add_form.is_none());
        assert_eq!(app.store.tasks()[0].title, "Buy milk");
        assert!(!app.store.tasks()[0].completed);
    }

    #[test]
    fn poll_timeout_tracks_commit_deadline() {
        let mut app = app_with(vec![task("a", false)]);
        app.finish_splash();
        let now = Instant::now();
        assert_eq!(app.poll_timeout(now), Duration::from_millis(250));

        app.tap_task(&TaskId::from("a"), now);
        // Just before the deadline the timeout shrinks to what's left
        let timeout = app.poll_timeout(now + DELAY - Duration::from_millis(50));
        assert!(timeout <= Duration::from_millis(50));
    }

    #[test]
    fn cursor_clamps_when_list_shrinks() {
        let mut app = app_with(vec![task("a", false), task("b", false), task("c", false)]);
        app.home_cursor = 2;
        app.delete_task(&TaskId::from("a"));
        app.delete_task(&TaskId::from("b"));
        app.tick(Instant::now());
        assert_eq!(app.home_cursor, 0);
    }
}
