//! Transcript view.
//!
//! User messages hug the right edge, assistant messages the left. Bubbles
//! take at most three quarters of the width.

use chatdeck_core::{Message, Session};
use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::common::{sanitize_for_display, wrap_text};
use crate::render::spinner;
use crate::state::AppState;

const MIN_BUBBLE_WIDTH: usize = 10;

/// Builds the transcript lines for `session` at `width` columns.
pub fn transcript_lines(
    session: &Session,
    width: usize,
    pending: Option<&str>,
) -> Vec<Line<'static>> {
    let bubble_width = (width * 3 / 4).max(MIN_BUBBLE_WIDTH).min(width.max(1));
    let mut lines = Vec::new();

    for message in session.messages() {
        push_message(&mut lines, message, bubble_width);
        lines.push(Line::default());
    }

    if let Some(indicator) = pending {
        lines.push(Line::from(vec![
            Span::styled("assistant ", Style::default().fg(Color::Green)),
            Span::styled(indicator.to_string(), Style::default().fg(Color::Yellow)),
        ]));
    }

    lines
}

fn push_message(lines: &mut Vec<Line<'static>>, message: &Message, bubble_width: usize) {
    let (alignment, accent) = if message.is_user() {
        (Alignment::Right, Color::Cyan)
    } else {
        (Alignment::Left, Color::Green)
    };

    lines.push(
        Line::from(vec![
            Span::styled(
                message.author.label(),
                Style::default().fg(accent).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {}", message.created_at.format("%H:%M")),
                Style::default().fg(Color::DarkGray),
            ),
        ])
        .alignment(alignment),
    );

    if !message.content.is_empty() {
        for row in wrap_text(&sanitize_for_display(&message.content), bubble_width) {
            lines.push(Line::from(row).alignment(alignment));
        }
    }

    if let Some(attachment) = &message.attachment {
        lines.push(
            Line::from(Span::styled(
                attachment.label(),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
            ))
            .alignment(alignment),
        );
    }
}

pub fn render_transcript(app: &AppState, frame: &mut Frame, area: Rect) {
    let Some(session) = app.manager.active_session() else {
        return;
    };
    let height = area.height as usize;
    let width = area.width.saturating_sub(2) as usize;

    let waiting = app.manager.composer().is_busy()
        && app.tasks.pending_reply_session() == Some(session.id);
    let indicator = waiting.then(|| format!("{} typing…", spinner(app.spinner_frame)));

    let mut lines = transcript_lines(session, width, indicator.as_deref());
    if lines.is_empty() {
        lines.push(
            Line::from(Span::styled(
                "Send a message to start the conversation",
                Style::default().fg(Color::DarkGray),
            ))
            .alignment(Alignment::Center),
        );
    }

    let total = lines.len();
    let max_offset = total.saturating_sub(height);
    app.transcript.set_max_offset(max_offset);
    let start = max_offset - app.transcript.offset();

    let mut visible: Vec<Line<'static>> = lines.into_iter().skip(start).take(height).collect();
    if visible.len() < height {
        let mut padded = vec![Line::default(); height - visible.len()];
        padded.append(&mut visible);
        visible = padded;
    }

    let inner = Rect {
        x: area.x + 1,
        width: area.width.saturating_sub(2),
        ..area
    };
    frame.render_widget(Paragraph::new(visible), inner);
}
