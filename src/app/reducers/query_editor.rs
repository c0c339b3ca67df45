//! Query editor sub-reducer.

use std::time::Instant;

use crate::action::Action;
use crate::editor::EditorKey;
use crate::effect::Effect;
use crate::input_mode::InputMode;
use crate::state::AppState;

pub fn reduce_query_editor(
    state: &mut AppState,
    action: &Action,
    _now: Instant,
) -> Option<Vec<Effect>> {
    match action {
        Action::Editor(key) => {
            let consumed = state.editor_key(*key);
            if !consumed && *key == EditorKey::Escape {
                state.input_mode = InputMode::Question;
            }
            Some(vec![])
        }
        Action::EditorClear => {
            state.editor.clear();
            Some(vec![])
        }
        Action::ToggleFocus => {
            if state.input_mode == InputMode::Editor {
                state.blur_editor();
            }
            state.input_mode = state.input_mode.toggled();
            Some(vec![])
        }
        _ => None,
    }
}
