//! Search field and session list input.

use crossterm::event::{KeyCode, KeyEvent};

use crate::effects::UiEffect;
use crate::features::composer;
use crate::state::{AppState, Focus};

pub fn handle_search_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    match key.code {
        KeyCode::Enter | KeyCode::Down => {
            app.focus = Focus::SessionList;
        }
        KeyCode::Up => {}
        _ => {
            if app.sidebar.search.input(key) {
                apply_query(app);
            }
        }
    }
    vec![]
}

/// Pastes into the search field as a single line.
pub fn handle_search_paste(app: &mut AppState, text: &str) -> Vec<UiEffect> {
    let line = text.replace(['\r', '\n'], " ");
    app.sidebar.search.insert_str(line.trim());
    apply_query(app);
    vec![]
}

pub fn handle_list_key(app: &mut AppState, key: KeyEvent) -> Vec<UiEffect> {
    let len = app.manager.visible_sessions().len();
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => {
            if app.sidebar.selected_index(len) == Some(0) {
                app.focus = Focus::Search;
            } else {
                app.sidebar.select_prev(len);
            }
        }
        KeyCode::Down | KeyCode::Char('j') => app.sidebar.select_next(len),
        KeyCode::Enter => return open_highlighted(app),
        _ => {}
    }
    vec![]
}

fn apply_query(app: &mut AppState) {
    app.manager.set_search_query(app.sidebar.search.text());
    app.sidebar.selected = 0;
}

fn open_highlighted(app: &mut AppState) -> Vec<UiEffect> {
    let visible = app.manager.visible_sessions();
    let Some(id) = app
        .sidebar
        .selected_index(visible.len())
        .map(|idx| visible[idx].id)
    else {
        return vec![];
    };
    let effects = if app.manager.active_id() == Some(id) {
        vec![]
    } else {
        composer::abandon_image_load(app)
    };
    app.manager.select_session(id);
    app.sync_input_from_draft();
    app.transcript.follow();
    app.focus = Focus::Composer;
    effects
}
