//! Pure reducer: state transitions only, no I/O.
//!
//! Time arrives as the `now` parameter and every side effect is returned as
//! an [`Effect`] for the runner, so transitions are testable without mocks.

use std::time::Instant;

use crate::action::Action;
use crate::effect::Effect;
use crate::reducers::{
    reduce_execution, reduce_query_editor, reduce_question, reduce_schema, reduce_translation,
};
use crate::state::AppState;

pub fn reduce(state: &mut AppState, action: Action, now: Instant) -> Vec<Effect> {
    let should_mark_dirty = !matches!(action, Action::None | Action::Render);

    let effects = reduce_inner(state, action, now);

    if should_mark_dirty {
        state.mark_dirty();
    }
    effects
}

fn reduce_inner(state: &mut AppState, action: Action, now: Instant) -> Vec<Effect> {
    if let Some(effects) = reduce_schema(state, &action, now) {
        return effects;
    }
    if let Some(effects) = reduce_translation(state, &action, now) {
        return effects;
    }
    if let Some(effects) = reduce_execution(state, &action, now) {
        return effects;
    }
    if let Some(effects) = reduce_question(state, &action, now) {
        return effects;
    }
    if let Some(effects) = reduce_query_editor(state, &action, now) {
        return effects;
    }

    match action {
        Action::Quit => {
            state.should_quit = true;
            vec![]
        }
        Action::Resize(_w, h) => {
            state.terminal_height = h;
            vec![]
        }
        Action::Render => {
            state.messages.clear_expired_at(now);
            state.clear_dirty();
            vec![Effect::Render]
        }
        _ => vec![],
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::editor::EditorKey;
    use crate::error::TranslationError;
    use crate::input_mode::InputMode;
    use crate::schema_session::SchemaSnapshot;
    use crate::ports::ExecutionError;
    use crate::state::{ExecutionStatus, SchemaStatus, TranslationStatus};
    use askql_domain::{ColumnRow, IntrospectionRows, QueryResult, TranslationResult};

    fn snapshot() -> Arc<SchemaSnapshot> {
        let rows = IntrospectionRows {
            database_name: "shop".to_string(),
            columns: vec![
                ColumnRow::new("orders", "id", "integer", false),
                ColumnRow::new("orders", "total", "numeric", true),
            ],
            foreign_keys: vec![],
        };
        Arc::new(SchemaSnapshot::build(rows, &[]).unwrap())
    }

    fn ready_state() -> AppState {
        let mut state = AppState::new(Some("postgres://localhost/shop".to_string()));
        reduce(&mut state, Action::SchemaLoaded(snapshot()), Instant::now());
        state
    }

    fn submit(state: &mut AppState, question: &str) -> Vec<Effect> {
        for c in question.chars() {
            reduce(state, Action::QuestionInput(c), Instant::now());
        }
        reduce(state, Action::SubmitQuestion, Instant::now())
    }

    mod schema {
        use super::*;

        #[test]
        fn load_without_dsn_fails_without_effect() {
            let mut state = AppState::new(None);

            let effects = reduce(&mut state, Action::LoadSchema, Instant::now());

            assert!(effects.is_empty());
            assert!(matches!(state.schema_status, SchemaStatus::Failed { .. }));
        }

        #[test]
        fn load_emits_fetch_once() {
            let mut state = AppState::new(Some("dsn".to_string()));

            let first = reduce(&mut state, Action::LoadSchema, Instant::now());
            let second = reduce(&mut state, Action::ReloadSchema, Instant::now());

            assert!(matches!(first.as_slice(), [Effect::FetchSchema { dsn }] if dsn == "dsn"));
            assert!(second.is_empty());
            assert_eq!(state.schema_status, SchemaStatus::Loading);
        }

        #[test]
        fn loaded_snapshot_feeds_completion() {
            let state = ready_state();

            assert_eq!(state.schema_status, SchemaStatus::Ready);
            assert_eq!(state.database_name(), Some("shop"));
            assert_eq!(state.completion_index().tables(), ["orders"]);
        }

        #[test]
        fn failure_keeps_previous_snapshot() {
            let mut state = ready_state();

            reduce(
                &mut state,
                Action::SchemaFailed {
                    summary: "Connection refused".to_string(),
                    hint: "start the server".to_string(),
                },
                Instant::now(),
            );

            assert!(state.schema.is_some());
            assert_eq!(state.messages.last_error.as_deref(), Some("Connection refused"));
        }
    }

    mod translation {
        use super::*;

        #[test]
        fn submit_without_schema_reports_error() {
            let mut state = AppState::new(Some("dsn".to_string()));

            let effects = submit(&mut state, "how many orders");

            assert!(effects.is_empty());
            assert!(state.messages.last_error.is_some());
        }

        #[test]
        fn submit_emits_translate_with_new_generation() {
            let mut state = ready_state();

            let effects = submit(&mut state, "how many orders");

            match effects.as_slice() {
                [Effect::Translate { generation, question, model }] => {
                    assert_eq!(*generation, 1);
                    assert_eq!(question, "how many orders");
                    assert_eq!(model.database_name(), "shop");
                }
                other => panic!("unexpected effects: {other:?}"),
            }
            assert!(state.translation.is_running());
        }

        #[test]
        fn success_loads_query_into_editor() {
            let mut state = ready_state();
            submit(&mut state, "count");

            reduce(
                &mut state,
                Action::TranslationFinished {
                    generation: 1,
                    result: Ok(TranslationResult::structured("SELECT count(*) FROM orders", "counts")),
                },
                Instant::now(),
            );

            assert_eq!(state.editor.content(), "SELECT count(*) FROM orders");
            assert_eq!(state.input_mode, InputMode::Editor);
            assert!(matches!(state.translation.status, TranslationStatus::Done(_)));
        }

        #[test]
        fn stale_generation_is_discarded() {
            let mut state = ready_state();
            submit(&mut state, "first");
            reduce(&mut state, Action::SubmitQuestion, Instant::now());

            reduce(
                &mut state,
                Action::TranslationFinished {
                    generation: 1,
                    result: Ok(TranslationResult::fallback("SELECT 1")),
                },
                Instant::now(),
            );

            assert_eq!(state.translation.generation, 2);
            assert!(state.translation.is_running());
            assert_eq!(state.editor.content(), "");
        }

        #[test]
        fn escape_abandons_running_translation() {
            let mut state = ready_state();
            submit(&mut state, "count");

            reduce(&mut state, Action::Escape, Instant::now());
            reduce(
                &mut state,
                Action::TranslationFinished {
                    generation: 1,
                    result: Ok(TranslationResult::fallback("SELECT 1")),
                },
                Instant::now(),
            );

            assert_eq!(state.translation.status, TranslationStatus::Idle);
            assert_eq!(state.editor.content(), "");
        }

        #[test]
        fn unparseable_failure_keeps_raw_text() {
            let mut state = ready_state();
            submit(&mut state, "count");

            reduce(
                &mut state,
                Action::TranslationFinished {
                    generation: 1,
                    result: Err(TranslationError::UnparseableResponse {
                        raw: "no idea".to_string(),
                    }),
                },
                Instant::now(),
            );

            assert!(matches!(
                state.translation.status,
                TranslationStatus::Failed { raw: Some(ref raw), retryable: true, .. } if raw == "no idea"
            ));
        }

        #[test]
        fn blank_question_keeps_previous_result() {
            let mut state = ready_state();
            submit(&mut state, "count");
            reduce(
                &mut state,
                Action::TranslationFinished {
                    generation: 1,
                    result: Ok(TranslationResult::structured("SELECT 1", "one")),
                },
                Instant::now(),
            );
            reduce(&mut state, Action::SubmitQuestion, Instant::now());

            reduce(
                &mut state,
                Action::TranslationFinished {
                    generation: 2,
                    result: Err(TranslationError::EmptyQuestion),
                },
                Instant::now(),
            );

            assert_eq!(state.translation.status, TranslationStatus::Idle);
            assert_eq!(state.editor.content(), "SELECT 1");
            assert_eq!(state.messages.last_error.as_deref(), Some("Type a question first"));
        }
    }

    mod execution {
        use super::*;

        fn editor_with(sql: &str) -> AppState {
            let mut state = ready_state();
            state.editor.set_content(sql);
            state.input_mode = InputMode::Editor;
            state
        }

        fn finish(state: &mut AppState, generation: u64, result: Result<QueryResult, ExecutionError>) {
            reduce(
                state,
                Action::ExecutionFinished { generation, result },
                Instant::now(),
            );
        }

        #[test]
        fn execute_sends_trimmed_editor_text() {
            let mut state = editor_with("  SELECT id FROM orders\n");

            let effects = reduce(&mut state, Action::ExecuteQuery, Instant::now());

            match effects.as_slice() {
                [Effect::Execute { generation, dsn, sql }] => {
                    assert_eq!(*generation, 1);
                    assert_eq!(dsn, "postgres://localhost/shop");
                    assert_eq!(sql, "SELECT id FROM orders");
                }
                other => panic!("unexpected effects: {other:?}"),
            }
            assert!(state.execution.is_running());
        }

        #[test]
        fn empty_editor_is_not_executed() {
            let mut state = editor_with("   ");

            let effects = reduce(&mut state, Action::ExecuteQuery, Instant::now());

            assert!(effects.is_empty());
            assert_eq!(state.messages.last_error.as_deref(), Some("Editor is empty"));
        }

        #[test]
        fn second_execute_while_running_is_ignored() {
            let mut state = editor_with("SELECT 1");
            reduce(&mut state, Action::ExecuteQuery, Instant::now());

            let effects = reduce(&mut state, Action::ExecuteQuery, Instant::now());

            assert!(effects.is_empty());
            assert_eq!(state.execution.generation, 1);
        }

        #[test]
        fn rows_are_summarised() {
            let mut state = editor_with("SELECT id, total FROM orders");
            reduce(&mut state, Action::ExecuteQuery, Instant::now());

            let rows = QueryResult::new(
                vec!["id".to_string(), "total".to_string()],
                vec![
                    vec!["1".to_string(), "9.50".to_string()],
                    vec!["2".to_string(), "12.00".to_string()],
                ],
            );
            finish(&mut state, 1, Ok(rows));

            assert!(matches!(state.execution.status, ExecutionStatus::Done(ref r) if r.row_count() == 2));
            assert_eq!(
                state.messages.last_notice.as_deref(),
                Some("Found 2 records with 2 columns")
            );
        }

        #[test]
        fn empty_result_says_no_records() {
            let mut state = editor_with("SELECT id FROM orders WHERE false");
            reduce(&mut state, Action::ExecuteQuery, Instant::now());

            finish(&mut state, 1, Ok(QueryResult::new(vec!["id".to_string()], vec![])));

            assert_eq!(state.messages.last_notice.as_deref(), Some("No records found"));
        }

        #[test]
        fn failure_keeps_server_message() {
            let mut state = editor_with("SELECT * FROM ordrs");
            reduce(&mut state, Action::ExecuteQuery, Instant::now());

            finish(
                &mut state,
                1,
                Err(ExecutionError::from_stderr(r#"ERROR:  relation "ordrs" does not exist"#)),
            );

            match &state.execution.status {
                ExecutionStatus::Failed { summary, details, .. } => {
                    assert_eq!(summary, "Query failed");
                    assert!(details.as_deref().unwrap().contains("ordrs"));
                }
                other => panic!("unexpected status: {other:?}"),
            }
        }

        #[test]
        fn new_translation_drops_running_query() {
            let mut state = editor_with("SELECT 1");
            reduce(&mut state, Action::ExecuteQuery, Instant::now());
            submit(&mut state, "count");
            reduce(
                &mut state,
                Action::TranslationFinished {
                    generation: 1,
                    result: Ok(TranslationResult::structured("SELECT count(*) FROM orders", "")),
                },
                Instant::now(),
            );

            finish(&mut state, 1, Ok(QueryResult::default()));

            assert_eq!(state.execution.status, ExecutionStatus::Idle);
        }
    }

    mod editor {
        use super::*;

        #[test]
        fn escape_with_no_suggestions_returns_to_question() {
            let mut state = ready_state();
            reduce(&mut state, Action::ToggleFocus, Instant::now());

            reduce(&mut state, Action::Editor(EditorKey::Escape), Instant::now());

            assert_eq!(state.input_mode, InputMode::Question);
        }

        #[test]
        fn typing_uses_loaded_schema_for_suggestions() {
            let mut state = ready_state();
            reduce(&mut state, Action::ToggleFocus, Instant::now());

            for c in "SELECT orders.".chars() {
                reduce(&mut state, Action::Editor(EditorKey::Char(c)), Instant::now());
            }

            let names: Vec<_> = state
                .editor
                .autocomplete()
                .candidates()
                .iter()
                .map(|c| c.text.as_str())
                .collect();
            assert_eq!(names, vec!["id", "total"]);
        }

        #[test]
        fn leaving_the_editor_closes_suggestions() {
            let mut state = ready_state();
            reduce(&mut state, Action::ToggleFocus, Instant::now());
            for c in "SELECT orders.".chars() {
                reduce(&mut state, Action::Editor(EditorKey::Char(c)), Instant::now());
            }

            reduce(&mut state, Action::ToggleFocus, Instant::now());

            assert!(!state.editor.autocomplete().is_visible());
        }
    }

    #[test]
    fn render_clears_dirty_flag() {
        let mut state = ready_state();

        let effects = reduce(&mut state, Action::Render, Instant::now());

        assert!(matches!(effects.as_slice(), [Effect::Render]));
        assert!(!state.is_dirty());
    }
}
