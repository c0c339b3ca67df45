use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use unicode_width::UnicodeWidthStr;

use askql_app::input_mode::InputMode;
use askql_app::state::AppState;

use super::completion_popup::CompletionPopup;
use super::pane::pane_block;
use crate::theme::Theme;

pub struct QueryEditorPane;

impl QueryEditorPane {
    /// `popup_bounds` limits where the suggestion box may spill over.
    pub fn render(frame: &mut Frame, area: Rect, popup_bounds: Rect, state: &AppState) {
        let focused = state.input_mode == InputMode::Editor;
        let block = pane_block("SQL", focused);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let content = state.editor.content();
        let (cursor_row, cursor_col) = state.editor.cursor_line_col();
        let scroll = Self::scroll_offset(cursor_row, inner.height);

        let current_line_style = Style::default().bg(Theme::EDITOR_CURRENT_LINE_BG);

        let lines: Vec<Line> = if content.is_empty() {
            let mut spans = Vec::new();
            if focused {
                spans.push(Span::styled("█", Style::default().fg(Color::White)));
            }
            spans.push(Span::styled(
                " Generated SQL appears here",
                Style::default().fg(Theme::TEXT_MUTED),
            ));
            vec![Line::from(spans)]
        } else {
            content
                .split('\n')
                .enumerate()
                .map(|(row, line)| {
                    if focused && row == cursor_row {
                        Self::line_with_cursor(line, cursor_col).style(current_line_style)
                    } else {
                        Line::from(line.to_string())
                    }
                })
                .collect()
        };

        let paragraph = Paragraph::new(lines)
            .scroll((scroll, 0))
            .style(Style::default().bg(Theme::PANEL_BG));
        frame.render_widget(paragraph, inner);

        if focused && state.editor.autocomplete().is_visible() {
            let line = content.split('\n').nth(cursor_row).unwrap_or("");
            let prefix: String = line.chars().take(cursor_col).collect();
            let cursor_x = inner.x + prefix.width() as u16;
            let cursor_y = inner.y + (cursor_row as u16).saturating_sub(scroll);
            CompletionPopup::render(
                frame,
                popup_bounds,
                (cursor_x, cursor_y),
                state.editor.autocomplete(),
            );
        }
    }

    /// First visible row so the cursor line stays inside the pane.
    fn scroll_offset(cursor_row: usize, height: u16) -> u16 {
        let height = height.max(1) as usize;
        cursor_row.saturating_sub(height - 1) as u16
    }

    fn line_with_cursor(line: &str, cursor_col: usize) -> Line<'static> {
        let chars: Vec<char> = line.chars().collect();

        if cursor_col >= chars.len() {
            Line::from(vec![
                Span::raw(line.to_string()),
                Span::styled("█", Style::default().fg(Color::White)),
            ])
        } else {
            let before: String = chars[..cursor_col].iter().collect();
            let under: String = chars[cursor_col].to_string();
            let after: String = chars[cursor_col + 1..].iter().collect();

            Line::from(vec![
                Span::raw(before),
                Span::styled(
                    under,
                    Style::default()
                        .bg(Color::White)
                        .fg(Color::Black)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::raw(after),
            ])
        }
    }
}
