//! Pure view functions.
//!
//! Everything here takes `&AppState` and draws to a ratatui `Frame`; nothing
//! mutates state or returns effects.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::common::truncate_with_ellipsis;
use crate::features::{composer, landing, sidebar, transcript};
use crate::state::{AppState, Focus};

const STATUS_HEIGHT: u16 = 1;

/// Composer may take at most this share of the main pane.
const COMPOSER_MAX_PERCENT: u16 = 40;

const SPINNER_FRAMES: &[&str] = &["◐", "◓", "◑", "◒"];

/// Spinner glyph for an animation frame counter.
pub fn spinner(frame: usize) -> &'static str {
    SPINNER_FRAMES[(frame / 4) % SPINNER_FRAMES.len()]
}

pub fn render(app: &AppState, frame: &mut Frame) {
    let area = frame.area();

    let [side, main] = Layout::horizontal([
        Constraint::Length(sidebar::sidebar_width(app).min(area.width / 2)),
        Constraint::Min(1),
    ])
    .areas(area);

    sidebar::render_sidebar(app, frame, side);

    let max_composer = (main.height * COMPOSER_MAX_PERCENT / 100).max(3);
    let composer_height = composer::composer_height(app, main.width).min(max_composer);
    let [content, input, status] = Layout::vertical([
        Constraint::Min(1),
        Constraint::Length(composer_height),
        Constraint::Length(STATUS_HEIGHT),
    ])
    .areas(main);

    if app.on_landing() {
        landing::render_landing(app, frame, content);
    } else {
        transcript::render_transcript(app, frame, content);
    }
    composer::render_composer(app, frame, input);
    render_status_line(app, frame, status);
}

fn status_hints(app: &AppState) -> &'static str {
    match app.focus {
        Focus::Composer if app.on_landing() => {
            "Enter send · Alt+1-4 prompt · Ctrl+R refresh · Ctrl+N new · Ctrl+B chats · Esc quit"
        }
        Focus::Composer => {
            "Enter send · Shift+Enter newline · PgUp/PgDn scroll · Ctrl+N new · Ctrl+B chats · Esc quit"
        }
        Focus::Search => "Type to filter · Enter/↓ list · Tab next · Esc back",
        Focus::SessionList => "↑/↓ move · Enter open · Tab next · Esc back",
    }
}

fn render_status_line(app: &AppState, frame: &mut Frame, area: Rect) {
    let width = area.width as usize;
    let line = match &app.notice {
        Some(notice) => Line::from(Span::styled(
            truncate_with_ellipsis(notice, width),
            Style::default().fg(Color::Yellow),
        )),
        None => Line::from(Span::styled(
            truncate_with_ellipsis(status_hints(app), width),
            Style::default().fg(Color::DarkGray),
        )),
    };
    frame.render_widget(Paragraph::new(line), area);
}
