use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use askql_app::input_mode::InputMode;
use askql_app::state::{AppState, SchemaStatus};

use super::status_message::{MessageType, StatusMessage};
use crate::theme::Theme;

const QUESTION_HINTS: &[(&str, &str)] = &[
    ("Enter", "Ask"),
    ("Tab", "Editor"),
    ("Esc", "Cancel"),
    ("^R", "Reload"),
    ("^C", "Quit"),
];

const EDITOR_HINTS: &[(&str, &str)] = &[
    ("^E", "Run"),
    ("Tab", "Complete"),
    ("S-Tab", "Question"),
    ("^L", "Clear"),
    ("Esc", "Close"),
    ("^C", "Quit"),
];

pub struct Footer;

impl Footer {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState) {
        let line = if let Some(error) = &state.messages.last_error {
            StatusMessage::render_line(error, MessageType::Error)
        } else if let SchemaStatus::Failed { summary, hint } = &state.schema_status
            && state.messages.last_notice.is_none()
        {
            StatusMessage::render_line(&format!("{summary}. {hint}"), MessageType::Error)
        } else {
            Self::hint_line(state)
        };
        frame.render_widget(Paragraph::new(line), area);
    }

    fn hint_line(state: &AppState) -> Line<'static> {
        let hints = match state.input_mode {
            InputMode::Question => QUESTION_HINTS,
            InputMode::Editor => EDITOR_HINTS,
        };

        let mut spans = Vec::new();
        if let Some(notice) = &state.messages.last_notice {
            spans.push(Span::styled(
                format!("{notice}  "),
                Style::default().fg(Theme::TEXT_SUCCESS),
            ));
        }
        for (i, (key, desc)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw("  "));
            }
            spans.push(Span::styled(*key, Style::default().fg(Theme::TEXT_ACCENT)));
            spans.push(Span::styled(
                format!(" {desc}"),
                Style::default().fg(Theme::TEXT_MUTED),
            ));
        }
        Line::from(spans)
    }
}
