use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Wrap};

use askql_app::state::{AppState, ExecutionStatus, TranslationStatus};
use askql_domain::Provenance;

use super::atoms::spinner_char;
use super::pane::pane_block;
use crate::theme::Theme;

/// Explanation of the last translation and the outcome of the last run,
/// or why either failed.
pub struct ResultPane;

impl ResultPane {
    pub fn render(frame: &mut Frame, area: Rect, state: &AppState, time_ms: u128) {
        let mut lines = Self::build_lines(&state.translation.status, time_ms);
        let run = Self::execution_lines(&state.execution.status, time_ms);
        if !run.is_empty() {
            lines.push(Line::default());
            lines.extend(run);
        }
        let paragraph = Paragraph::new(lines)
            .block(pane_block("Result", false))
            .wrap(Wrap { trim: false });

        frame.render_widget(paragraph, area);
    }

    fn build_lines(status: &TranslationStatus, time_ms: u128) -> Vec<Line<'static>> {
        let muted = Style::default().fg(Theme::TEXT_MUTED);

        match status {
            TranslationStatus::Idle => vec![Line::from(Span::styled(
                "Type a question and press Enter",
                muted,
            ))],
            TranslationStatus::Running { question } => vec![Line::from(Span::styled(
                format!("{} Translating: {question}", spinner_char(time_ms)),
                Style::default().fg(Theme::TEXT_ACCENT),
            ))],
            TranslationStatus::Done(result) => {
                let mut lines = Vec::new();
                if result.explanation.is_empty() {
                    lines.push(Line::from(Span::styled("(no explanation)", muted)));
                } else {
                    lines.extend(result.explanation.lines().map(|l| Line::from(l.to_string())));
                }
                let style = match result.provenance {
                    Provenance::Structured => muted,
                    Provenance::FallbackRegex => Style::default().fg(Theme::TEXT_ACCENT),
                };
                lines.push(Line::from(Span::styled(
                    format!("source: {}", result.provenance),
                    style,
                )));
                lines
            }
            TranslationStatus::Failed {
                summary,
                hint,
                raw,
                retryable,
            } => {
                let mut lines = vec![error_line(summary), Line::from(hint.clone())];
                if *retryable {
                    lines.push(Line::from(Span::styled("Press Enter to ask again", muted)));
                }
                if let Some(raw) = raw {
                    lines.push(Line::from(Span::styled("Model reply:", muted)));
                    lines.extend(raw.lines().map(|l| Line::from(l.to_string())));
                }
                lines
            }
        }
    }

    fn execution_lines(status: &ExecutionStatus, time_ms: u128) -> Vec<Line<'static>> {
        let muted = Style::default().fg(Theme::TEXT_MUTED);

        match status {
            ExecutionStatus::Idle => vec![],
            ExecutionStatus::Running => vec![Line::from(Span::styled(
                format!("{} Running query", spinner_char(time_ms)),
                Style::default().fg(Theme::TEXT_ACCENT),
            ))],
            ExecutionStatus::Done(result) => {
                let mut lines = vec![Line::from(Span::styled(
                    result.summary(),
                    Style::default().fg(Theme::TEXT_SUCCESS),
                ))];
                if !result.columns.is_empty() {
                    lines.push(Line::from(Span::styled(
                        format!("columns: {}", result.columns.join(", ")),
                        muted,
                    )));
                }
                lines
            }
            ExecutionStatus::Failed {
                summary,
                hint,
                details,
            } => {
                let mut lines = vec![error_line(summary), Line::from(hint.clone())];
                if let Some(details) = details {
                    lines.extend(
                        details
                            .lines()
                            .map(|l| Line::from(Span::styled(l.to_string(), muted))),
                    );
                }
                lines
            }
        }
    }
}

fn error_line(summary: &str) -> Line<'static> {
    Line::from(Span::styled(
        summary.to_string(),
        Style::default()
            .fg(Theme::TEXT_ERROR)
            .add_modifier(Modifier::BOLD),
    ))
}
