//! Sidebar view.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::common::{sanitize_for_display, truncate_with_ellipsis};
use crate::state::{AppState, Focus};

const RAIL_WIDTH: u16 = 5;
const EXPANDED_WIDTH: u16 = 32;

pub fn sidebar_width(app: &AppState) -> u16 {
    if app.manager.is_sidebar_expanded() {
        EXPANDED_WIDTH
    } else {
        RAIL_WIDTH
    }
}

pub fn render_sidebar(app: &AppState, frame: &mut Frame, area: Rect) {
    if app.manager.is_sidebar_expanded() {
        render_expanded(app, frame, area);
    } else {
        render_rail(frame, area);
    }
}

fn render_rail(frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(Color::DarkGray));
    let glyph = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let lines = vec![
        Line::default(),
        Line::from(Span::styled(" + ", glyph)),
        Line::default(),
        Line::from(Span::styled(" ⌕ ", glyph)),
    ];
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_expanded(app: &AppState, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .borders(Borders::RIGHT)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Line::from(Span::styled(
            " Chats ",
            Style::default().add_modifier(Modifier::BOLD),
        )));
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.height == 0 || inner.width == 0 {
        return;
    }
    let width = inner.width as usize;

    let mut lines = Vec::new();
    lines.push(Line::from(Span::styled(
        "+ New chat (Ctrl+N)",
        Style::default().fg(Color::Cyan),
    )));

    let search_focused = app.focus == Focus::Search;
    let search_style = if search_focused {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let query = app.sidebar.search.text();
    let search_text = if query.is_empty() && !search_focused {
        "Search chats".to_string()
    } else {
        query.to_string()
    };
    lines.push(Line::from(vec![
        Span::styled("⌕ ", search_style),
        Span::styled(
            truncate_with_ellipsis(&search_text, width.saturating_sub(2)),
            search_style,
        ),
    ]));
    lines.push(Line::default());

    let visible = app.manager.visible_sessions();
    if visible.is_empty() {
        let empty = if app.manager.sessions().is_empty() {
            "No chats yet"
        } else {
            "No matching chats"
        };
        lines.push(Line::from(Span::styled(
            empty,
            Style::default().fg(Color::DarkGray),
        )));
    }

    let active = app.manager.active_id();
    let highlighted = app.sidebar.selected_index(visible.len());
    let items: Vec<Vec<Line>> = visible
        .iter()
        .enumerate()
        .map(|(idx, session)| {
            let mut title_style = Style::default();
            if Some(session.id) == active {
                title_style = title_style.fg(Color::Cyan).add_modifier(Modifier::BOLD);
            }
            if app.focus == Focus::SessionList && highlighted == Some(idx) {
                title_style = title_style.add_modifier(Modifier::REVERSED);
            }
            let mut item = vec![Line::from(Span::styled(
                truncate_with_ellipsis(&session.title, width),
                title_style,
            ))];
            if let Some(preview) = session.preview() {
                item.push(Line::from(Span::styled(
                    truncate_with_ellipsis(&sanitize_for_display(&preview), width),
                    Style::default().fg(Color::DarkGray),
                )));
            }
            item
        })
        .collect();

    let heights: Vec<usize> = items.iter().map(Vec::len).collect();
    let capacity = (inner.height as usize).saturating_sub(lines.len());
    let start = app.sidebar.window_start(&heights, highlighted, capacity);
    lines.extend(items.into_iter().skip(start).flatten());

    frame.render_widget(Paragraph::new(lines), inner);

    if search_focused {
        let (_, col) = app.sidebar.search.cursor();
        let x = inner.x + 2 + (col as u16).min(inner.width.saturating_sub(3));
        frame.set_cursor_position((x, inner.y + 1));
    }
}
