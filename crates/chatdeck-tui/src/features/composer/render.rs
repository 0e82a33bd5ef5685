//! Composer view.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use unicode_width::UnicodeWidthChar;

use super::TextBuffer;
use crate::render::spinner;
use crate::state::{AppState, Focus};

/// Max visible text rows before the composer scrolls.
const MAX_TEXT_ROWS: usize = 8;

const PLACEHOLDER: &str = "Ask anything… (Enter to send, Shift+Enter for a new line)";

/// Buffer lines hard-wrapped to a width, with the cursor's visual position.
struct WrappedInput {
    lines: Vec<String>,
    cursor_row: usize,
    cursor_col: usize,
}

fn wrap_input(buffer: &TextBuffer, width: usize) -> WrappedInput {
    let width = width.max(1);
    let (cursor_row, cursor_col) = buffer.cursor();
    let mut out = WrappedInput {
        lines: Vec::new(),
        cursor_row: 0,
        cursor_col: 0,
    };

    for (row, line) in buffer.lines().into_iter().enumerate() {
        let mut current = String::new();
        let mut current_width = 0;

        for (col, ch) in line.chars().enumerate() {
            let ch_width = ch.width().unwrap_or(0);
            if current_width + ch_width > width && !current.is_empty() {
                out.lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            if row == cursor_row && col == cursor_col {
                out.cursor_row = out.lines.len();
                out.cursor_col = current_width;
            }
            current.push(ch);
            current_width += ch_width;
        }

        if row == cursor_row && cursor_col >= line.chars().count() {
            if current_width >= width {
                out.lines.push(std::mem::take(&mut current));
                current_width = 0;
            }
            out.cursor_row = out.lines.len();
            out.cursor_col = current_width;
        }
        out.lines.push(current);
    }

    out
}

/// Total composer height (borders included) for the given outer width.
pub fn composer_height(app: &AppState, width: u16) -> u16 {
    let inner_width = width.saturating_sub(2) as usize;
    let rows = wrap_input(&app.input, inner_width)
        .lines
        .len()
        .clamp(1, MAX_TEXT_ROWS);
    rows as u16 + 2
}

pub fn render_composer(app: &AppState, frame: &mut Frame, area: Rect) {
    let composer = app.manager.composer();
    let focused = app.focus == Focus::Composer;

    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let mut title = vec![Span::raw(" Message ")];
    if composer.is_busy() {
        title.push(Span::styled(
            format!("{} waiting for reply ", spinner(app.spinner_frame)),
            Style::default().fg(Color::Yellow),
        ));
    }

    let limit = app.config.draft_display_limit;
    let counter_style = if composer.draft_len() > limit {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let counter = Line::from(Span::styled(
        format!(" {}/{} ", composer.draft_len(), limit),
        counter_style,
    ))
    .right_aligned();

    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(Line::from(title))
        .title_top(counter);

    if let Some(attachment) = composer.attachment() {
        block = block.title_bottom(Line::from(vec![
            Span::styled(
                format!(" 📎 {} ", attachment.label()),
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("Ctrl+X remove ", Style::default().fg(Color::DarkGray)),
        ]));
    }

    let inner = block.inner(area);
    frame.render_widget(block, area);

    if app.input.is_empty() {
        let placeholder = Paragraph::new(Span::styled(
            PLACEHOLDER,
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(placeholder, inner);
        if focused {
            frame.set_cursor_position((inner.x, inner.y));
        }
        return;
    }

    let wrapped = wrap_input(&app.input, inner.width as usize);
    let visible = (inner.height as usize).max(1);
    let skip = wrapped.cursor_row.saturating_sub(visible - 1);
    let lines: Vec<Line<'_>> = wrapped
        .lines
        .iter()
        .skip(skip)
        .take(visible)
        .map(|l| Line::from(l.as_str()))
        .collect();
    frame.render_widget(Paragraph::new(lines), inner);

    if focused {
        let x = inner.x + wrapped.cursor_col as u16;
        let y = inner.y + (wrapped.cursor_row - skip) as u16;
        frame.set_cursor_position((x, y));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buffer(text: &str) -> TextBuffer {
        let mut buf = TextBuffer::default();
        buf.set_text(text);
        buf
    }

    #[test]
    fn wrap_input_hard_wraps_and_tracks_cursor() {
        let wrapped = wrap_input(&buffer("abcdefg"), 3);
        assert_eq!(wrapped.lines, vec!["abc", "def", "g"]);
        assert_eq!((wrapped.cursor_row, wrapped.cursor_col), (2, 1));
    }

    #[test]
    fn wrap_input_cursor_at_full_line_moves_down() {
        let wrapped = wrap_input(&buffer("abc"), 3);
        assert_eq!(wrapped.lines, vec!["abc", ""]);
        assert_eq!((wrapped.cursor_row, wrapped.cursor_col), (1, 0));
    }

    #[test]
    fn wrap_input_keeps_empty_lines() {
        let wrapped = wrap_input(&buffer("a\n\nb"), 10);
        assert_eq!(wrapped.lines, vec!["a", "", "b"]);
        assert_eq!((wrapped.cursor_row, wrapped.cursor_col), (2, 1));
    }

    #[test]
    fn composer_height_is_clamped() {
        let mut app = AppState::new(chatdeck_core::config::Config::default());
        assert_eq!(composer_height(&app, 40), 3);
        app.input.set_text(&"line\n".repeat(20));
        assert_eq!(composer_height(&app, 40), MAX_TEXT_ROWS as u16 + 2);
    }
}
