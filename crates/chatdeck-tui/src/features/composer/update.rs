//! Composer key and paste handling.

use std::path::PathBuf;

use chatdeck_core::attachment;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::debug;

use crate::common::{TaskKind, sanitize_for_display};
use crate::effects::UiEffect;
use crate::state::AppState;

/// Lines scrolled per PageUp/PageDown.
const PAGE_LINES: usize = 10;

pub fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Enter if key.modifiers.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) => {
            app.input.insert_newline();
            app.sync_draft_from_input();
            vec![]
        }
        KeyCode::Enter => submit(app),
        KeyCode::PageUp => {
            app.transcript.scroll_up(PAGE_LINES);
            vec![]
        }
        KeyCode::PageDown => {
            app.transcript.scroll_down(PAGE_LINES);
            vec![]
        }
        _ => {
            if app.input.input(key) {
                app.sync_draft_from_input();
            }
            vec![]
        }
    }
}

/// Sends the draft. A session is created when none is active.
pub fn submit(app: &mut AppState) -> Vec<UiEffect> {
    if app.manager.composer().is_busy() {
        app.notice = Some("Still waiting for the previous reply".to_string());
        return vec![];
    }
    let Some(ticket) = app.manager.submit_draft() else {
        return vec![];
    };
    app.sync_input_from_draft();
    app.transcript.follow();
    let task = app.task_seq.next_id();
    vec![UiEffect::ScheduleReply { task, ticket }]
}

/// Handles bracketed paste.
///
/// A pasted path to an existing image file is loaded as the attachment;
/// anything else is inserted as text.
pub fn handle_paste(app: &mut AppState, text: &str) -> Vec<UiEffect> {
    if let Some(path) = attachment::pasted_image_path(text) {
        return load_image(app, path);
    }
    app.input.insert_str(&sanitize_for_display(text));
    app.sync_draft_from_input();
    vec![]
}

/// Cancels an in-flight image load so its result never reaches the composer.
///
/// Called whenever the active session changes: the composer belongs to the
/// session the image was pasted into.
pub fn abandon_image_load(app: &mut AppState) -> Vec<UiEffect> {
    let running = app.tasks.state_mut(TaskKind::ImageLoad);
    if !running.is_running() {
        return vec![];
    }
    let token = running.cancel.take();
    running.clear();
    debug!("image load abandoned");
    vec![UiEffect::CancelTask {
        kind: TaskKind::ImageLoad,
        token,
    }]
}

fn load_image(app: &mut AppState, path: PathBuf) -> Vec<UiEffect> {
    let mut effects = Vec::new();
    let running = app.tasks.state(TaskKind::ImageLoad);
    if running.is_running() {
        effects.push(UiEffect::CancelTask {
            kind: TaskKind::ImageLoad,
            token: running.cancel.clone(),
        });
    }
    debug!(path = %path.display(), "loading pasted image");
    let task = app.task_seq.next_id();
    effects.push(UiEffect::LoadImage { task, path });
    effects
}
