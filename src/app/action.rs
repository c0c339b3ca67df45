use std::sync::Arc;

use askql_domain::{QueryResult, TranslationResult};

use crate::editor::EditorKey;
use crate::error::TranslationError;
use crate::ports::ExecutionError;
use crate::schema_session::SchemaSnapshot;

#[derive(Debug)]
pub enum Action {
    None,
    Quit,
    Render,
    Resize(u16, u16),
    ToggleFocus,
    Escape,

    // Question line
    QuestionInput(char),
    QuestionBackspace,
    QuestionClear,
    SubmitQuestion,

    // Query editor
    Editor(EditorKey),
    EditorClear,

    // Schema loading
    LoadSchema,
    ReloadSchema,
    SchemaLoaded(Arc<SchemaSnapshot>),
    SchemaFailed { summary: String, hint: String },

    // Translation
    TranslationFinished {
        generation: u64,
        result: Result<TranslationResult, TranslationError>,
    },

    // Query execution
    ExecuteQuery,
    ExecutionFinished {
        generation: u64,
        result: Result<QueryResult, ExecutionError>,
    },
}
