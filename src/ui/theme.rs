use ratatui::style::Color;

/// Base color palette
pub struct Palette;

impl Palette {
    pub const DUCKBONES: Color = Color::Rgb(0x15, 0x19, 0x26);
    pub const SURFACE: Color = Color::Rgb(0x2a, 0x2a, 0x2e);
}

/// Application color theme constants
pub struct Theme;

impl Theme {
    pub const PANEL_BG: Color = Palette::DUCKBONES;

    // Pane borders
    pub const FOCUS_BORDER: Color = Color::Cyan;
    pub const IDLE_BORDER: Color = Color::DarkGray;

    // Query editor
    pub const EDITOR_CURRENT_LINE_BG: Color = Palette::SURFACE;

    // Completion popup
    pub const COMPLETION_SELECTED_BG: Color = Color::Rgb(0x45, 0x47, 0x5a);

    // Text
    pub const TEXT_ACCENT: Color = Color::Yellow;
    pub const TEXT_MUTED: Color = Color::DarkGray;
    pub const TEXT_ERROR: Color = Color::Red;
    pub const TEXT_SUCCESS: Color = Color::Green;
}
