use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::util::unicode::{next_grapheme_boundary, prev_grapheme_boundary};

use super::app::{AddForm, App, FormField, Screen};

/// Handle a key event for the current screen
pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return;
    }
    app.notice = None;

    // Failure overlay intercepts everything until dismissed
    if app.alert.is_some() {
        if matches!(key.code, KeyCode::Esc | KeyCode::Enter | KeyCode::Char(_)) {
            app.alert = None;
        }
        return;
    }

    match app.screen {
        Screen::Splash => app.finish_splash(),
        Screen::Home => handle_home(app, key),
        Screen::Completed => handle_completed(app, key),
    }
}

fn handle_home(app: &mut App, key: KeyEvent) {
    if app.add_form.is_some() {
        handle_form(app, key);
        return;
    }

    if let Some(id) = app.confirm_delete.take() {
        match key.code {
            KeyCode::Char('y') | KeyCode::Char('d') | KeyCode::Enter => app.delete_task(&id),
            _ => {} // anything else backs out
        }
        return;
    }

    let pending = app.pending_count();
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('j') | KeyCode::Down => {
            if pending > 0 {
                app.home_cursor = (app.home_cursor + 1).min(pending - 1);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.home_cursor = app.home_cursor.saturating_sub(1);
        }
        KeyCode::Char('g') => app.home_cursor = 0,
        KeyCode::Char('G') => app.home_cursor = pending.saturating_sub(1),
        KeyCode::Char(' ') | KeyCode::Char('x') => {
            if let Some(id) = app.home_selected() {
                app.tap_task(&id, Instant::now());
            }
        }
        KeyCode::Char('a') => {
            app.add_form = Some(AddForm::new());
        }
        KeyCode::Char('d') => {
            app.confirm_delete = app.home_selected();
        }
        KeyCode::Char('c') => {
            app.screen = Screen::Completed;
            app.completed_cursor = 0;
        }
        _ => {}
    }
}

fn handle_completed(app: &mut App, key: KeyEvent) {
    let completed = app.completed_count();
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char('b') | KeyCode::Esc | KeyCode::Char('c') => {
            app.screen = Screen::Home;
        }
        KeyCode::Char('j') | KeyCode::Down => {
            if completed > 0 {
                app.completed_cursor = (app.completed_cursor + 1).min(completed - 1);
            }
        }
        KeyCode::Char('k') | KeyCode::Up => {
            app.completed_cursor = app.completed_cursor.saturating_sub(1);
        }
        // This screen is view-only
        KeyCode::Char(' ') | KeyCode::Char('x') | KeyCode::Char('d') => {
            app.notice = Some("Completed tasks cannot be modified here.".into());
        }
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Add form
// ---------------------------------------------------------------------------

fn handle_form(app: &mut App, key: KeyEvent) {
    let submit = matches!(key.code, KeyCode::Enter);
    let Some(form) = &mut app.add_form else {
        return;
    };

    match key.code {
        KeyCode::Esc => {
            app.add_form = None;
            return;
        }
        KeyCode::Enter => {}
        _ if form.submitting => return, // input is frozen while in flight
        KeyCode::Tab => {
            focus(form, next_field(form.focused()));
        }
        KeyCode::BackTab => {
            focus(form, prev_field(form.focused()));
        }
        KeyCode::Down => focus(form, next_field(form.focused())),
        KeyCode::Up => focus(form, prev_field(form.focused())),
        KeyCode::Left => {
            let field = form.focused();
            let cursor = form.cursor;
            if let Some(prev) = prev_grapheme_boundary(form.field_text(field), cursor) {
                form.cursor = prev;
            }
        }
        KeyCode::Right => {
            let field = form.focused();
            let cursor = form.cursor;
            if let Some(next) = next_grapheme_boundary(form.field_text(field), cursor) {
                form.cursor = next;
            }
        }
        KeyCode::Home => form.cursor = 0,
        KeyCode::End => form.cursor = form.field_text(form.focused()).len(),
        KeyCode::Backspace => {
            let field = form.focused();
            let cursor = form.cursor;
            if let Some(prev) = prev_grapheme_boundary(form.field_text(field), cursor) {
                form.field_text_mut(field).replace_range(prev..cursor, "");
                form.cursor = prev;
                form.error = None;
            }
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let field = form.focused();
            let cursor = form.cursor;
            form.field_text_mut(field).insert(cursor, c);
            form.cursor = cursor + c.len_utf8();
            form.error = None;
        }
        _ => {}
    }

    if submit {
        app.submit_add_form();
    }
}

fn focus(form: &mut AddForm, field: FormField) {
    form.field = Some(field);
    form.cursor = form.field_text(field).len();
}

fn next_field(field: FormField) -> FormField {
    match field {
        FormField::Title => FormField::Description,
        FormField::Description => FormField::Due,
        FormField::Due => FormField::Title,
    }
}

fn prev_field(field: FormField) -> FormField {
    match field {
        FormField::Title => FormField::Due,
        FormField::Description => FormField::Title,
        FormField::Due => FormField::Description,
    }
}
