mod harness;

use std::time::Instant;

use harness::{create_test_terminal, render_to_string};

use askql::app::editor::EditorKey;
use askql::app::input_mode::InputMode;
use askql::app::state::{AppState, ExecutionStatus, SchemaStatus, TranslationStatus};
use askql::app::test_support::ready_state;
use askql::domain::{QueryResult, TranslationResult};

fn type_into_editor(state: &mut AppState, text: &str) {
    for c in text.chars() {
        state.editor_key(EditorKey::Char(c));
    }
}

#[test]
fn initial_state_without_schema() {
    let state = AppState::new(None);
    let mut terminal = create_test_terminal();

    let output = render_to_string(&mut terminal, &state);

    assert!(output.contains("askql"));
    assert!(output.contains("not loaded"));
    assert!(output.contains("Question"));
    assert!(output.contains("Type a question and press Enter"));
    assert!(output.contains("Enter Ask"));
}

#[test]
fn header_shows_loaded_schema() {
    let state = ready_state();
    let mut terminal = create_test_terminal();

    let output = render_to_string(&mut terminal, &state);

    let header = output.lines().next().unwrap();
    assert!(header.contains("shop"));
    assert!(header.contains("2 tables"));
}

#[test]
fn schema_failure_shows_summary_and_hint_in_footer() {
    let mut state = AppState::new(Some("postgres://nowhere/db".to_string()));
    state.schema_status = SchemaStatus::Failed {
        summary: "Connection refused".to_string(),
        hint: "Is the server running?".to_string(),
    };
    let mut terminal = create_test_terminal();

    let output = render_to_string(&mut terminal, &state);

    let footer = output.lines().last().unwrap();
    assert!(footer.contains("Connection refused. Is the server running?"));
}

#[test]
fn editor_with_completion_popup() {
    let mut state = ready_state();
    state.input_mode = InputMode::Editor;
    type_into_editor(&mut state, "SELECT * FROM ord");
    let mut terminal = create_test_terminal();

    let output = render_to_string(&mut terminal, &state);

    assert!(state.editor.autocomplete().is_visible());
    assert!(output.contains("SELECT * FROM ord"));
    assert!(output.contains("orders"));
    assert!(output.contains("table"));
    assert!(output.contains("ORDER"));
    assert!(output.contains("keyword"));
    assert!(output.contains("Complete"));
}

#[test]
fn popup_hidden_while_question_line_has_focus() {
    let mut state = ready_state();
    state.input_mode = InputMode::Editor;
    type_into_editor(&mut state, "SELECT * FROM ord");
    state.input_mode = InputMode::Question;
    let mut terminal = create_test_terminal();

    let output = render_to_string(&mut terminal, &state);

    assert!(!output.contains("keyword"));
}

#[test]
fn finished_translation_shows_query_and_explanation() {
    let mut state = ready_state();
    state.editor.set_content("SELECT count(*) FROM orders");
    state.translation.status = TranslationStatus::Done(TranslationResult::structured(
        "SELECT count(*) FROM orders",
        "Counts every order.",
    ));
    let mut terminal = create_test_terminal();

    let output = render_to_string(&mut terminal, &state);

    assert!(output.contains("SELECT count(*) FROM orders"));
    assert!(output.contains("Counts every order."));
    assert!(output.contains("source: structured"));
}

#[test]
fn unparseable_reply_is_shown_for_diagnosis() {
    let mut state = ready_state();
    state.translation.status = TranslationStatus::Failed {
        summary: "Could not read a query from the reply".to_string(),
        hint: "Try rephrasing the question".to_string(),
        raw: Some("Sorry, I cannot help with that.".to_string()),
        retryable: true,
    };
    let mut terminal = create_test_terminal();

    let output = render_to_string(&mut terminal, &state);

    assert!(output.contains("Could not read a query from the reply"));
    assert!(output.contains("Model reply:"));
    assert!(output.contains("Sorry, I cannot help with that."));
    assert!(output.contains("Press Enter to ask again"));
}

#[test]
fn executed_query_summary_follows_explanation() {
    let mut state = ready_state();
    state.input_mode = InputMode::Editor;
    state.editor.set_content("SELECT id FROM orders");
    state.translation.status =
        TranslationStatus::Done(TranslationResult::structured("SELECT id FROM orders", "Order ids."));
    state.execution.status = ExecutionStatus::Done(QueryResult::new(
        vec!["id".to_string()],
        vec![vec!["1".to_string()], vec!["2".to_string()]],
    ));
    let mut terminal = create_test_terminal();

    let output = render_to_string(&mut terminal, &state);

    assert!(output.contains("Order ids."));
    assert!(output.contains("Found 2 records with 1 columns"));
    assert!(output.contains("^E Run"));
}

#[test]
fn error_message_replaces_key_hints() {
    let mut state = ready_state();
    state
        .messages
        .set_error_at("Schema is not loaded yet".to_string(), Instant::now());
    let mut terminal = create_test_terminal();

    let output = render_to_string(&mut terminal, &state);

    let footer = output.lines().last().unwrap();
    assert!(footer.contains("Schema is not loaded yet"));
    assert!(!footer.contains("Enter Ask"));
}
