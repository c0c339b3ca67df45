use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use askql_app::input_mode::InputMode;
use askql_app::state::AppState;

use super::pane::pane_block;
use crate::theme::Theme;

pub struct QuestionBox;

impl QuestionBox {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let focused = state.input_mode == InputMode::Question;
        let block = pane_block("Question", focused);
        let text = &state.question.text;

        let mut spans = if text.is_empty() && !focused {
            vec![Span::styled(
                "Ask something about your data...",
                Style::default().fg(Theme::TEXT_MUTED),
            )]
        } else {
            vec![Span::raw(text.clone())]
        };
        if focused {
            spans.push(Span::styled("█", Style::default().fg(Color::White)));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
    }
}
