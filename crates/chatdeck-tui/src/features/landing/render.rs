use chatdeck_core::prompts::{self, PROMPT_CARDS, PromptCard};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::common::wrap_text;
use crate::render::spinner;
use crate::state::AppState;

const CARD_HEIGHT: u16 = 5;
const MAX_GRID_WIDTH: u16 = 72;

pub fn render_landing(app: &AppState, frame: &mut Frame, area: Rect) {
    let [_, header, _, grid, _, refresh, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(CARD_HEIGHT * 2),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .areas(area);

    let header_lines = vec![
        Line::from(Span::styled(
            prompts::greeting(&app.config.user_name),
            Style::default().fg(Color::Magenta),
        )),
        Line::from(Span::styled(
            prompts::HEADLINE,
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            prompts::SUBTITLE,
            Style::default().fg(Color::DarkGray),
        )),
    ];
    frame.render_widget(
        Paragraph::new(header_lines).alignment(Alignment::Center),
        header,
    );

    render_cards(frame, centered(grid, MAX_GRID_WIDTH));

    let refresh_line = if app.manager.is_refreshing() {
        Line::from(Span::styled(
            format!("{} Refreshing prompts…", spinner(app.spinner_frame)),
            Style::default().fg(Color::Yellow),
        ))
    } else {
        Line::from(vec![
            Span::styled("↻ Refresh Prompts", Style::default().fg(Color::Cyan)),
            Span::styled(" (Ctrl+R)", Style::default().fg(Color::DarkGray)),
        ])
    };
    frame.render_widget(
        Paragraph::new(refresh_line).alignment(Alignment::Center),
        refresh,
    );
}

fn render_cards(frame: &mut Frame, area: Rect) {
    let rows = Layout::vertical([Constraint::Length(CARD_HEIGHT); 2]).split(area);
    for (row_idx, row) in rows.iter().enumerate() {
        let cols = Layout::horizontal([Constraint::Ratio(1, 2); 2]).split(*row);
        for (col_idx, cell) in cols.iter().enumerate() {
            let index = row_idx * 2 + col_idx;
            if let Some(card) = PROMPT_CARDS.get(index) {
                render_card(frame, *cell, index, card);
            }
        }
    }
}

fn render_card(frame: &mut Frame, area: Rect, index: usize, card: &PromptCard) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Line::from(vec![
            Span::styled(
                format!(" Alt+{} ", index + 1),
                Style::default().fg(Color::Cyan),
            ),
            Span::raw(format!("{} ", card.glyph)),
        ]));
    let inner = block.inner(area);
    let lines: Vec<Line<'_>> = wrap_text(card.title, inner.width as usize)
        .into_iter()
        .take(inner.height as usize)
        .map(Line::from)
        .collect();
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn centered(area: Rect, max_width: u16) -> Rect {
    let width = area.width.min(max_width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_limits_width() {
        let area = Rect::new(0, 0, 100, 10);
        assert_eq!(centered(area, 72), Rect::new(14, 0, 72, 10));
        let narrow = Rect::new(2, 1, 40, 10);
        assert_eq!(centered(narrow, 72), narrow);
    }
}
