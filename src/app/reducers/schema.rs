//! Schema loading sub-reducer.

use std::sync::Arc;
use std::time::Instant;

use crate::action::Action;
use crate::effect::Effect;
use crate::state::{AppState, SchemaStatus};

pub fn reduce_schema(state: &mut AppState, action: &Action, now: Instant) -> Option<Vec<Effect>> {
    match action {
        Action::LoadSchema | Action::ReloadSchema => {
            if state.schema_status == SchemaStatus::Loading {
                return Some(vec![]);
            }
            let Some(dsn) = state.dsn.clone() else {
                state.schema_status = SchemaStatus::Failed {
                    summary: "No database configured".to_string(),
                    hint: "Pass --dsn, set ASKQL_DSN, or add [database] dsn to config.toml".to_string(),
                };
                return Some(vec![]);
            };
            if matches!(action, Action::ReloadSchema) {
                state.messages.set_notice_at("Reloading schema...".to_string(), now);
            }
            state.schema_status = SchemaStatus::Loading;
            Some(vec![Effect::FetchSchema { dsn }])
        }
        Action::SchemaLoaded(snapshot) => {
            let msg = format!(
                "Loaded {} tables from {}",
                snapshot.model.table_count(),
                snapshot.model.database_name()
            );
            state.schema = Some(Arc::clone(snapshot));
            state.schema_status = SchemaStatus::Ready;
            state.messages.set_notice_at(msg, now);
            Some(vec![])
        }
        Action::SchemaFailed { summary, hint } => {
            // A previous snapshot, if any, stays usable.
            state.schema_status = SchemaStatus::Failed {
                summary: summary.clone(),
                hint: hint.clone(),
            };
            state.messages.set_error_at(summary.clone(), now);
            Some(vec![])
        }
        _ => None,
    }
}
