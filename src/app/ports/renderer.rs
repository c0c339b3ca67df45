use color_eyre::eyre::Result;

use crate::state::AppState;

/// Draws one frame of the current state.
pub trait Renderer {
    fn draw(&mut self, state: &AppState) -> Result<()>;
}
