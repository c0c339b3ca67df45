use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem};
use unicode_width::UnicodeWidthStr;

use askql_app::autocomplete::Autocomplete;
use askql_app::completion::CompletionKind;

use crate::theme::Theme;

const MAX_ITEMS: usize = 8;
const POPUP_WIDTH: u16 = 45;

pub struct CompletionPopup;

impl CompletionPopup {
    /// Draws the suggestion list next to `cursor` (screen coordinates),
    /// clamped to `bounds`.
    pub fn render(frame: &mut Frame, bounds: Rect, cursor: (u16, u16), completion: &Autocomplete) {
        let candidates = completion.candidates();
        if candidates.is_empty() {
            return;
        }
        let (cursor_x, cursor_y) = cursor;

        let visible_count = candidates.len().min(MAX_ITEMS);
        let popup_height = (visible_count as u16) + 2;
        let popup_width = POPUP_WIDTH.min(bounds.width);

        let popup_x = cursor_x.min(bounds.right().saturating_sub(popup_width));
        // Show above cursor if not enough space below
        let popup_y = if cursor_y + 1 + popup_height > bounds.bottom() {
            cursor_y.saturating_sub(popup_height)
        } else {
            cursor_y + 1
        };
        let popup_area = Rect::new(popup_x, popup_y, popup_width, popup_height).intersection(bounds);

        frame.render_widget(Clear, popup_area);

        let highlighted = completion.highlighted();
        let offset = scroll_offset(highlighted.unwrap_or(0), candidates.len());

        let max_text_width = candidates
            .iter()
            .skip(offset)
            .take(MAX_ITEMS)
            .map(|c| c.text.width())
            .max()
            .unwrap_or(0);

        let items: Vec<ListItem> = candidates
            .iter()
            .enumerate()
            .skip(offset)
            .take(MAX_ITEMS)
            .map(|(i, candidate)| {
                let padding = max_text_width.saturating_sub(candidate.text.width()) + 2;
                let text = format!(
                    " {}{:padding$}{}",
                    candidate.text,
                    "",
                    kind_label(candidate.kind),
                );

                let style = if highlighted == Some(i) {
                    Style::default()
                        .bg(Theme::COMPLETION_SELECTED_BG)
                        .fg(Color::White)
                } else {
                    Style::default().fg(Color::Gray)
                };

                ListItem::new(text).style(style)
            })
            .collect();

        let list = List::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .style(Style::default().bg(Theme::PANEL_BG)),
        );

        frame.render_widget(list, popup_area);
    }
}

fn kind_label(kind: CompletionKind) -> &'static str {
    match kind {
        CompletionKind::Keyword => "keyword",
        CompletionKind::Table => "table",
        CompletionKind::Column => "column",
    }
}

/// First visible row, keeping the highlight near the middle of the window.
fn scroll_offset(selected: usize, total: usize) -> usize {
    if total <= MAX_ITEMS {
        return 0;
    }
    let half = MAX_ITEMS / 2;
    if selected < half {
        0
    } else if selected >= total - half {
        total - MAX_ITEMS
    } else {
        selected - half
    }
}
