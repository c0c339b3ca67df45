use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::theme::Theme;

pub enum MessageType {
    Error,
    Notice,
}

pub struct StatusMessage;

impl StatusMessage {
    pub fn render_line(message: &str, msg_type: MessageType) -> Line<'static> {
        let color = match msg_type {
            MessageType::Error => Theme::TEXT_ERROR,
            MessageType::Notice => Theme::TEXT_SUCCESS,
        };

        Line::from(Span::styled(message.to_string(), Style::default().fg(color)))
    }
}
