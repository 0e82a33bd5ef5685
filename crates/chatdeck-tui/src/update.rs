//! TUI reducer.
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use tracing::{debug, warn};

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::{composer, sidebar};
use crate::state::{AppState, Focus};

/// Lines scrolled per mouse wheel notch.
const WHEEL_LINES: usize = 3;

pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.spinner_frame = app.spinner_frame.wrapping_add(1);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event),
        UiEvent::TaskStarted { kind, started } => {
            app.tasks.state_mut(kind).on_started(&started);
            vec![]
        }
        UiEvent::TaskCompleted { kind, completed } => {
            let current = app.tasks.state_mut(kind).finish_if_active(completed.id);
            // Replies are never superseded; they belong to their session.
            if current || kind == TaskKind::Reply {
                update(app, *completed.result)
            } else {
                debug!(?kind, "stale task result dropped");
                vec![]
            }
        }
        UiEvent::ReplyReady {
            session_id,
            content,
        } => {
            app.manager.complete_reply(session_id, content);
            if app.manager.active_id() == Some(session_id) {
                app.transcript.follow();
            }
            vec![]
        }
        UiEvent::PromptsRefreshed => {
            app.manager.finish_refresh();
            vec![]
        }
        UiEvent::ImageLoaded(file) => {
            if !app.manager.attach_image_file(&file) {
                app.notice = Some(format!("{} is not an image", file.path.display()));
            }
            vec![]
        }
        UiEvent::ImageLoadFailed { path, error } => {
            warn!(%path, %error, "image load failed");
            app.notice = Some(error);
            vec![]
        }
        UiEvent::ImageLoadCancelled => vec![],
    }
}

fn handle_terminal_event(app: &mut AppState, event: Event) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind != KeyEventKind::Release => {
            app.notice = None;
            handle_key(app, key)
        }
        Event::Paste(text) => {
            app.notice = None;
            match app.focus {
                Focus::Composer => composer::handle_paste(app, &text),
                Focus::Search => sidebar::handle_search_paste(app, &text),
                Focus::SessionList => vec![],
            }
        }
        Event::Mouse(mouse) => {
            match mouse.kind {
                MouseEventKind::ScrollUp => app.transcript.scroll_up(WHEEL_LINES),
                MouseEventKind::ScrollDown => app.transcript.scroll_down(WHEEL_LINES),
                _ => {}
            }
            vec![]
        }
        _ => vec![],
    }
}

fn handle_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('c') if ctrl => return vec![UiEffect::Quit],
        KeyCode::Esc => {
            if app.focus.in_sidebar() {
                app.focus = Focus::Composer;
                return vec![];
            }
            return vec![UiEffect::Quit];
        }
        KeyCode::Char('n') if ctrl => return new_chat(app),
        KeyCode::Char('b') if ctrl => {
            app.manager.toggle_sidebar();
            if !app.manager.is_sidebar_expanded() {
                app.focus = Focus::Composer;
            }
            return vec![];
        }
        KeyCode::Char('r') if ctrl => return refresh_prompts(app),
        KeyCode::Char('x') if ctrl => {
            app.manager.clear_attachment();
            return vec![];
        }
        KeyCode::Tab => {
            set_focus(app, app.focus.next());
            return vec![];
        }
        KeyCode::BackTab => {
            set_focus(app, app.focus.prev());
            return vec![];
        }
        KeyCode::Char(ch @ '1'..='4') if alt && app.on_landing() => {
            let index = ch as usize - '1' as usize;
            let effects = composer::abandon_image_load(app);
            if app.manager.start_from_prompt(index).is_some() {
                app.sync_input_from_draft();
                app.transcript.follow();
                app.focus = Focus::Composer;
            }
            return effects;
        }
        _ => {}
    }

    match app.focus {
        Focus::Composer => composer::handle_key(app, key),
        Focus::Search => sidebar::handle_search_key(app, key),
        Focus::SessionList => sidebar::handle_list_key(app, key),
    }
}

fn new_chat(app: &mut AppState) -> Vec<UiEffect> {
    let effects = composer::abandon_image_load(app);
    app.manager.create_session();
    app.sync_input_from_draft();
    app.transcript.follow();
    app.focus = Focus::Composer;
    effects
}

fn set_focus(app: &mut AppState, focus: Focus) {
    if focus.in_sidebar() && !app.manager.is_sidebar_expanded() {
        app.manager.toggle_sidebar();
    }
    app.focus = focus;
}

fn refresh_prompts(app: &mut AppState) -> Vec<UiEffect> {
    if !app.on_landing() || !app.manager.refresh_prompts() {
        return vec![];
    }
    let task = app.task_seq.next_id();
    vec![UiEffect::ScheduleRefresh { task }]
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chatdeck_core::SessionId;
    use chatdeck_core::attachment::ImageFile;
    use chatdeck_core::config::Config;
    use chatdeck_core::prompts::PROMPT_CARDS;
    use tempfile::tempdir;
    use tokio_util::sync::CancellationToken;

    use super::*;
    use crate::common::{TaskCompleted, TaskId, TaskMeta, TaskStarted};

    const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    fn app() -> AppState {
        AppState::new(Config::default())
    }

    fn press(app: &mut AppState, code: KeyCode, modifiers: KeyModifiers) -> Vec<UiEffect> {
        update(
            app,
            UiEvent::Terminal(Event::Key(KeyEvent::new(code, modifiers))),
        )
    }

    fn type_text(app: &mut AppState, text: &str) {
        for ch in text.chars() {
            press(app, KeyCode::Char(ch), KeyModifiers::NONE);
        }
    }

    fn paste(app: &mut AppState, text: &str) -> Vec<UiEffect> {
        update(app, UiEvent::Terminal(Event::Paste(text.to_string())))
    }

    /// Runs the reply effect the way the runtime would, without the delay.
    fn deliver(app: &mut AppState, effects: Vec<UiEffect>, content: &str) {
        for effect in effects {
            if let UiEffect::ScheduleReply { task, ticket } = effect {
                update(
                    app,
                    UiEvent::TaskStarted {
                        kind: TaskKind::Reply,
                        started: TaskStarted {
                            id: task,
                            cancel: None,
                            meta: TaskMeta::Reply {
                                session_id: ticket.session_id,
                            },
                        },
                    },
                );
                update(
                    app,
                    UiEvent::TaskCompleted {
                        kind: TaskKind::Reply,
                        completed: TaskCompleted {
                            id: task,
                            result: Box::new(UiEvent::ReplyReady {
                                session_id: ticket.session_id,
                                content: content.to_string(),
                            }),
                        },
                    },
                );
            }
        }
    }

    fn assert_synced(app: &AppState) {
        assert_eq!(app.input.text(), app.manager.composer().draft());
    }

    #[test]
    fn enter_on_landing_creates_session_and_schedules_reply() {
        let mut app = app();
        type_text(&mut app, "hello");
        assert_synced(&app);

        let effects = press(&mut app, KeyCode::Enter, KeyModifiers::NONE);

        assert!(matches!(effects.as_slice(), [UiEffect::ScheduleReply { .. }]));
        assert!(!app.on_landing());
        assert!(app.manager.composer().is_busy());
        assert!(app.input.is_empty());
        assert_synced(&app);

        deliver(&mut app, effects, "dummy");
        let session = app.manager.active_session().unwrap();
        assert_eq!(session.messages().len(), 2);
        assert_eq!(session.messages()[1].content, "dummy");
        assert!(!app.manager.composer().is_busy());
    }

    #[test]
    fn shift_enter_inserts_newline() {
        let mut app = app();
        type_text(&mut app, "a");
        let effects = press(&mut app, KeyCode::Enter, KeyModifiers::SHIFT);
        type_text(&mut app, "b");

        assert!(effects.is_empty());
        assert_eq!(app.manager.composer().draft(), "a\nb");
        assert!(app.manager.sessions().is_empty());
    }

    #[test]
    fn empty_enter_does_nothing() {
        let mut app = app();
        type_text(&mut app, "   ");
        assert!(press(&mut app, KeyCode::Enter, KeyModifiers::NONE).is_empty());
        assert!(app.manager.sessions().is_empty());
    }

    #[test]
    fn second_send_while_busy_is_rejected_with_notice() {
        let mut app = app();
        type_text(&mut app, "one");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        type_text(&mut app, "two");

        let effects = press(&mut app, KeyCode::Enter, KeyModifiers::NONE);

        assert!(effects.is_empty());
        assert!(app.notice.is_some());
        assert_eq!(app.manager.composer().draft(), "two");
        assert_eq!(app.manager.active_session().unwrap().messages().len(), 1);
    }

    #[test]
    fn reply_follows_its_session_after_switch() {
        let mut app = app();
        type_text(&mut app, "from first");
        let effects = press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        let first = app.manager.active_id().unwrap();

        press(&mut app, KeyCode::Char('n'), KeyModifiers::CONTROL);
        let second = app.manager.active_id().unwrap();
        assert_ne!(first, second);

        deliver(&mut app, effects, "reply");

        assert_eq!(app.manager.active_id(), Some(second));
        assert_eq!(app.manager.session(first).unwrap().messages().len(), 2);
        assert!(app.manager.session(second).unwrap().messages().is_empty());
    }

    #[test]
    fn reply_result_is_applied_even_if_not_latest() {
        let mut app = app();
        let id = app.manager.create_session();
        app.manager.send_message("x").unwrap();
        app.tasks.state_mut(TaskKind::Reply).on_started(&TaskStarted {
            id: TaskId(9),
            cancel: None,
            meta: TaskMeta::None,
        });

        update(
            &mut app,
            UiEvent::TaskCompleted {
                kind: TaskKind::Reply,
                completed: TaskCompleted {
                    id: TaskId(1),
                    result: Box::new(UiEvent::ReplyReady {
                        session_id: id,
                        content: "late".to_string(),
                    }),
                },
            },
        );

        assert_eq!(app.manager.session(id).unwrap().messages().len(), 2);
    }

    #[test]
    fn reply_for_missing_session_clears_busy() {
        let mut app = app();
        type_text(&mut app, "x");
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);

        update(
            &mut app,
            UiEvent::ReplyReady {
                session_id: SessionId(404),
                content: "lost".to_string(),
            },
        );

        assert!(!app.manager.composer().is_busy());
    }

    #[test]
    fn ctrl_n_clears_composer() {
        let mut app = app();
        type_text(&mut app, "draft");
        app.manager.attach_image(&PNG_MAGIC, None);

        press(&mut app, KeyCode::Char('n'), KeyModifiers::CONTROL);

        assert!(app.input.is_empty());
        assert!(app.manager.composer().attachment().is_none());
        assert!(app.manager.is_sidebar_expanded());
        assert_eq!(app.manager.sessions().len(), 1);
    }

    #[test]
    fn search_filters_and_list_selects() {
        let mut app = app();
        for _ in 0..3 {
            press(&mut app, KeyCode::Char('n'), KeyModifiers::CONTROL);
        }
        type_text(&mut app, "unsent");

        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(app.focus, Focus::Search);
        type_text(&mut app, "chat 2");
        assert_eq!(app.manager.search_query(), "chat 2");
        assert_eq!(app.manager.visible_sessions().len(), 1);

        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);
        assert_eq!(app.focus, Focus::SessionList);
        press(&mut app, KeyCode::Enter, KeyModifiers::NONE);

        assert_eq!(app.focus, Focus::Composer);
        assert_eq!(app.manager.active_session().unwrap().title, "New Chat 2");
        assert!(app.input.is_empty());
        assert_synced(&app);
    }

    #[test]
    fn tab_into_search_expands_sidebar() {
        let mut app = app();
        assert!(!app.manager.is_sidebar_expanded());
        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert!(app.manager.is_sidebar_expanded());

        press(&mut app, KeyCode::Char('b'), KeyModifiers::CONTROL);
        assert!(!app.manager.is_sidebar_expanded());
        assert_eq!(app.focus, Focus::Composer);
    }

    #[test]
    fn esc_leaves_sidebar_before_quitting() {
        let mut app = app();
        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert!(press(&mut app, KeyCode::Esc, KeyModifiers::NONE).is_empty());
        assert_eq!(app.focus, Focus::Composer);
        assert!(matches!(
            press(&mut app, KeyCode::Esc, KeyModifiers::NONE).as_slice(),
            [UiEffect::Quit]
        ));
    }

    #[test]
    fn alt_digit_starts_prompt_on_landing_only() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'), KeyModifiers::ALT);
        assert_eq!(app.manager.sessions().len(), 1);
        assert_eq!(app.input.text(), PROMPT_CARDS[2].title);
        assert_synced(&app);

        press(&mut app, KeyCode::Char('1'), KeyModifiers::ALT);
        assert_eq!(app.manager.sessions().len(), 1);
    }

    #[test]
    fn refresh_runs_once_until_finished() {
        let mut app = app();
        let effects = press(&mut app, KeyCode::Char('r'), KeyModifiers::CONTROL);
        assert!(matches!(effects.as_slice(), [UiEffect::ScheduleRefresh { .. }]));
        assert!(app.manager.is_refreshing());

        assert!(press(&mut app, KeyCode::Char('r'), KeyModifiers::CONTROL).is_empty());

        update(&mut app, UiEvent::PromptsRefreshed);
        assert!(!app.manager.is_refreshing());
    }

    #[test]
    fn pasted_image_path_loads_attachment() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("shot.png");
        fs::write(&image, PNG_MAGIC).unwrap();

        let mut app = app();
        let effects = paste(&mut app, &image.display().to_string());

        match effects.as_slice() {
            [UiEffect::LoadImage { path, .. }] => assert_eq!(path, &image),
            other => panic!("unexpected effects: {other:?}"),
        }
        assert!(app.input.is_empty());

        update(
            &mut app,
            UiEvent::ImageLoaded(ImageFile {
                path: image.clone(),
                bytes: PNG_MAGIC.to_vec(),
                media_type: Some("image/png".to_string()),
            }),
        );
        let attachment = app.manager.composer().attachment().unwrap();
        assert_eq!(attachment.media_type, "image/png");

        press(&mut app, KeyCode::Char('x'), KeyModifiers::CONTROL);
        assert!(app.manager.composer().attachment().is_none());
    }

    #[test]
    fn second_paste_cancels_running_load() {
        let mut app = app();
        let token = CancellationToken::new();
        app.tasks.state_mut(TaskKind::ImageLoad).on_started(&TaskStarted {
            id: TaskId(0),
            cancel: Some(token.clone()),
            meta: TaskMeta::ImageLoad {
                path: "old.png".to_string(),
            },
        });

        let dir = tempdir().unwrap();
        let image = dir.path().join("new.png");
        fs::write(&image, PNG_MAGIC).unwrap();
        let effects = paste(&mut app, &image.display().to_string());

        assert!(matches!(
            effects.as_slice(),
            [UiEffect::CancelTask { kind: TaskKind::ImageLoad, token: Some(_) }, UiEffect::LoadImage { .. }]
        ));
    }

    #[test]
    fn stale_image_result_is_dropped() {
        let mut app = app();
        app.tasks.state_mut(TaskKind::ImageLoad).on_started(&TaskStarted {
            id: TaskId(2),
            cancel: None,
            meta: TaskMeta::None,
        });

        update(
            &mut app,
            UiEvent::TaskCompleted {
                kind: TaskKind::ImageLoad,
                completed: TaskCompleted {
                    id: TaskId(1),
                    result: Box::new(UiEvent::ImageLoaded(ImageFile {
                        path: "old.png".into(),
                        bytes: PNG_MAGIC.to_vec(),
                        media_type: None,
                    })),
                },
            },
        );

        assert!(app.manager.composer().attachment().is_none());
        assert!(app.tasks.state(TaskKind::ImageLoad).is_running());
    }

    /// Pastes `path` and reports the load as started, like the runtime does.
    fn start_image_load(app: &mut AppState, path: &std::path::Path) -> (TaskId, CancellationToken) {
        let effects = paste(app, &path.display().to_string());
        let task = match effects.as_slice() {
            [UiEffect::LoadImage { task, .. }] => *task,
            other => panic!("unexpected effects: {other:?}"),
        };
        let token = CancellationToken::new();
        update(
            app,
            UiEvent::TaskStarted {
                kind: TaskKind::ImageLoad,
                started: TaskStarted {
                    id: task,
                    cancel: Some(token.clone()),
                    meta: TaskMeta::ImageLoad {
                        path: path.display().to_string(),
                    },
                },
            },
        );
        (task, token)
    }

    fn finish_image_load(app: &mut AppState, task: TaskId, path: &std::path::Path) {
        update(
            app,
            UiEvent::TaskCompleted {
                kind: TaskKind::ImageLoad,
                completed: TaskCompleted {
                    id: task,
                    result: Box::new(UiEvent::ImageLoaded(ImageFile {
                        path: path.to_path_buf(),
                        bytes: PNG_MAGIC.to_vec(),
                        media_type: Some("image/png".to_string()),
                    })),
                },
            },
        );
    }

    #[test]
    fn image_load_in_flight_is_dropped_on_new_chat() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("shot.png");
        fs::write(&image, PNG_MAGIC).unwrap();

        let mut app = app();
        press(&mut app, KeyCode::Char('n'), KeyModifiers::CONTROL);
        let first = app.manager.active_id();
        let (task, token) = start_image_load(&mut app, &image);

        let effects = press(&mut app, KeyCode::Char('n'), KeyModifiers::CONTROL);
        assert_ne!(app.manager.active_id(), first);
        assert!(matches!(
            effects.as_slice(),
            [UiEffect::CancelTask { kind: TaskKind::ImageLoad, token: Some(_) }]
        ));
        assert!(!app.tasks.state(TaskKind::ImageLoad).is_running());

        for effect in effects {
            if let UiEffect::CancelTask { token: Some(t), .. } = effect {
                t.cancel();
            }
        }
        assert!(token.is_cancelled());

        finish_image_load(&mut app, task, &image);
        assert!(app.manager.composer().attachment().is_none());
    }

    #[test]
    fn image_load_in_flight_is_dropped_on_switch() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("shot.png");
        fs::write(&image, PNG_MAGIC).unwrap();

        let mut app = app();
        press(&mut app, KeyCode::Char('n'), KeyModifiers::CONTROL);
        press(&mut app, KeyCode::Char('n'), KeyModifiers::CONTROL);
        let (task, _token) = start_image_load(&mut app, &image);

        // Open "New Chat 1" from the list.
        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert_eq!(app.focus, Focus::SessionList);
        let effects = press(&mut app, KeyCode::Enter, KeyModifiers::NONE);

        assert_eq!(app.manager.active_session().unwrap().title, "New Chat 1");
        assert!(matches!(effects.as_slice(), [UiEffect::CancelTask { .. }]));

        finish_image_load(&mut app, task, &image);
        assert!(app.manager.composer().attachment().is_none());
    }

    #[test]
    fn reopening_active_session_keeps_image_load() {
        let dir = tempdir().unwrap();
        let image = dir.path().join("shot.png");
        fs::write(&image, PNG_MAGIC).unwrap();

        let mut app = app();
        press(&mut app, KeyCode::Char('n'), KeyModifiers::CONTROL);
        let (task, _token) = start_image_load(&mut app, &image);

        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        press(&mut app, KeyCode::Tab, KeyModifiers::NONE);
        assert!(press(&mut app, KeyCode::Enter, KeyModifiers::NONE).is_empty());

        finish_image_load(&mut app, task, &image);
        assert!(app.manager.composer().attachment().is_some());
    }

    #[test]
    fn non_image_file_leaves_attachment_and_sets_notice() {
        let mut app = app();
        update(
            &mut app,
            UiEvent::ImageLoaded(ImageFile {
                path: "notes.png".into(),
                bytes: b"plain".to_vec(),
                media_type: Some("text/plain".to_string()),
            }),
        );
        assert!(app.manager.composer().attachment().is_none());
        assert!(app.notice.is_some());
    }

    #[test]
    fn text_paste_is_inserted() {
        let mut app = app();
        let effects = paste(&mut app, "line one\r\nline two");
        assert!(effects.is_empty());
        assert_eq!(app.manager.composer().draft(), "line one\nline two");
    }

    #[test]
    fn tick_advances_spinner() {
        let mut app = app();
        update(&mut app, UiEvent::Tick);
        update(&mut app, UiEvent::Tick);
        assert_eq!(app.spinner_frame, 2);
    }
}
