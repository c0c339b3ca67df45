use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use askql_app::state::AppState;

use super::footer::Footer;
use super::header::Header;
use super::query_editor::QueryEditorPane;
use super::question::QuestionBox;
use super::result::ResultPane;

pub struct MainLayout;

impl MainLayout {
    pub fn render(frame: &mut Frame, state: &AppState, time_ms: Option<u128>) {
        let time_ms = time_ms.unwrap_or_else(|| {
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or(0)
        });
        let area = frame.area();

        let [header_area, question_area, main_area, footer_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(6),
            Constraint::Length(1),
        ])
        .areas(area);

        let [editor_area, result_area] =
            Layout::vertical([Constraint::Percentage(65), Constraint::Percentage(35)])
                .areas(main_area);

        Header::render(frame, header_area, state, time_ms);
        QuestionBox::render(frame, question_area, state);
        ResultPane::render(frame, result_area, state, time_ms);
        Footer::render(frame, footer_area, state);

        // Last, so the suggestion box may overlap the result pane
        QueryEditorPane::render(frame, editor_area, main_area, state);
    }
}
