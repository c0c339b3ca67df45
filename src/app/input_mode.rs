/// Which pane receives typed keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Question,
    Editor,
}

impl InputMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Question => Self::Editor,
            Self::Editor => Self::Question,
        }
    }
}
