//! Translation result sub-reducer.

use std::time::Instant;

use crate::action::Action;
use crate::effect::Effect;
use crate::input_mode::InputMode;
use crate::state::{AppState, TranslationStatus};

pub fn reduce_translation(
    state: &mut AppState,
    action: &Action,
    now: Instant,
) -> Option<Vec<Effect>> {
    let Action::TranslationFinished { generation, result } = action else {
        return None;
    };
    if *generation != state.translation.generation || !state.translation.is_running() {
        return Some(vec![]);
    }

    match result {
        Ok(translation) => {
            state.editor.set_content(translation.sql_query.clone());
            state.input_mode = InputMode::Editor;
            state.translation.status = TranslationStatus::Done(translation.clone());
            state.execution.reset();
        }
        // Nothing was sent, so the previous outcome stays on screen.
        Err(e) if e.is_precondition() => {
            state.messages.set_error_at(e.summary().to_string(), now);
            state.translation.status = TranslationStatus::Idle;
        }
        Err(e) => {
            state.messages.set_error_at(e.summary().to_string(), now);
            state.translation.status = TranslationStatus::Failed {
                summary: e.summary().to_string(),
                hint: e.hint().to_string(),
                raw: e.raw_response().map(str::to_string),
                retryable: e.is_retryable(),
            };
        }
    }
    Some(vec![])
}
