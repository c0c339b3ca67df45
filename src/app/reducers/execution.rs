//! Query execution sub-reducer.

use std::time::Instant;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, ExecutionStatus};

pub fn reduce_execution(
    state: &mut AppState,
    action: &Action,
    now: Instant,
) -> Option<Vec<Effect>> {
    match action {
        Action::ExecuteQuery => {
            if state.execution.is_running() {
                state
                    .messages
                    .set_notice_at("Query is still running".to_string(), now);
                return Some(vec![]);
            }
            let sql = state.editor.content().trim().to_string();
            if sql.is_empty() {
                state
                    .messages
                    .set_error_at("Editor is empty".to_string(), now);
                return Some(vec![]);
            }
            let Some(dsn) = state.dsn.clone() else {
                state
                    .messages
                    .set_error_at("No database configured".to_string(), now);
                return Some(vec![]);
            };

            state.execution.generation += 1;
            state.execution.status = ExecutionStatus::Running;
            Some(vec![Effect::Execute {
                generation: state.execution.generation,
                dsn,
                sql,
            }])
        }
        Action::ExecutionFinished { generation, result } => {
            if *generation != state.execution.generation || !state.execution.is_running() {
                return Some(vec![]);
            }
            match result {
                Ok(rows) => {
                    state.messages.set_notice_at(rows.summary(), now);
                    state.execution.status = ExecutionStatus::Done(rows.clone());
                }
                Err(e) => {
                    state.messages.set_error_at(e.summary().to_string(), now);
                    state.execution.status = ExecutionStatus::Failed {
                        summary: e.summary().to_string(),
                        hint: e.hint().to_string(),
                        details: e.details().map(str::to_string),
                    };
                }
            }
            Some(vec![])
        }
        _ => None,
    }
}
