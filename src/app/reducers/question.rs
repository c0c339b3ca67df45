//! Question line sub-reducer: typing and submitting a question.

use std::sync::Arc;
use std::time::Instant;

use crate::action::Action;
use crate::effect::Effect;
use crate::input_mode::InputMode;
use crate::state::{AppState, SchemaStatus, TranslationStatus};

pub fn reduce_question(state: &mut AppState, action: &Action, now: Instant) -> Option<Vec<Effect>> {
    match action {
        Action::QuestionInput(c) => {
            state.question.text.push(*c);
            Some(vec![])
        }
        Action::QuestionBackspace => {
            state.question.text.pop();
            Some(vec![])
        }
        Action::QuestionClear => {
            state.question.text.clear();
            Some(vec![])
        }
        Action::SubmitQuestion => {
            let Some(snapshot) = state.schema.as_ref() else {
                let msg = if state.schema_status == SchemaStatus::Loading {
                    "Schema is still loading"
                } else {
                    "No schema loaded; press Ctrl+R to retry"
                };
                state.messages.set_error_at(msg.to_string(), now);
                return Some(vec![]);
            };
            let model = Arc::clone(&snapshot.model);
            let question = state.question.text.clone();

            state.translation.generation += 1;
            state.translation.status = TranslationStatus::Running {
                question: question.clone(),
            };
            Some(vec![Effect::Translate {
                generation: state.translation.generation,
                question,
                model,
            }])
        }
        Action::Escape if state.input_mode == InputMode::Question => {
            if state.translation.is_running() {
                // Bumping the generation orphans the in-flight reply.
                state.translation.generation += 1;
                state.translation.status = TranslationStatus::Idle;
                state.messages.set_notice_at("Translation abandoned".to_string(), now);
            } else {
                state.question.text.clear();
            }
            Some(vec![])
        }
        _ => None,
    }
}
