use color_eyre::eyre::Result;

use askql_app::ports::Renderer;
use askql_app::state::AppState;

use crate::components::layout::MainLayout;
use crate::tui::TuiSession;

pub struct TuiRenderer<'a> {
    tui: &'a mut TuiSession,
}

impl<'a> TuiRenderer<'a> {
    pub fn new(tui: &'a mut TuiSession) -> Self {
        Self { tui }
    }
}

impl Renderer for TuiRenderer<'_> {
    fn draw(&mut self, state: &AppState) -> Result<()> {
        self.tui.terminal().draw(|frame| {
            MainLayout::render(frame, state, None);
        })?;
        Ok(())
    }
}
