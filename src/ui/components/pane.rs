use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};

use crate::theme::Theme;

/// Bordered pane whose border lights up while it owns the keyboard.
pub fn pane_block(title: &str, focused: bool) -> Block<'static> {
    let border = if focused {
        Theme::FOCUS_BORDER
    } else {
        Theme::IDLE_BORDER
    };
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border))
}
