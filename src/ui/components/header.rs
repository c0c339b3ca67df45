use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use askql_app::state::{AppState, SchemaStatus};

use super::atoms::spinner_char;

pub struct Header;

impl Header {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState, time_ms: u128) {
        let db_name = state.database_name().unwrap_or("-");

        let (status_text, status_color) = match &state.schema_status {
            SchemaStatus::Ready => {
                let tables = state
                    .schema
                    .as_ref()
                    .map_or(0, |snapshot| snapshot.model.table_count());
                (format!("{tables} tables"), Color::Green)
            }
            SchemaStatus::Loading => (
                format!("{} loading schema", spinner_char(time_ms)),
                Color::Yellow,
            ),
            SchemaStatus::Failed { .. } => ("schema error".to_string(), Color::Red),
            SchemaStatus::NotLoaded => ("not loaded".to_string(), Color::Gray),
        };

        let line = Line::from(vec![
            Span::styled("askql", Style::default().fg(Color::Cyan)),
            Span::raw(" | "),
            Span::raw(db_name.to_string()),
            Span::raw(" | "),
            Span::styled(status_text, Style::default().fg(status_color)),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}
