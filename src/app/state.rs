use std::sync::Arc;

use askql_domain::{QueryResult, TranslationResult};

use crate::completion::AutocompleteIndex;
use crate::editor::{EditorKey, QueryEditor};
use crate::input_mode::InputMode;
use crate::message_state::MessageState;
use crate::schema_session::SchemaSnapshot;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SchemaStatus {
    #[default]
    NotLoaded,
    Loading,
    Ready,
    Failed {
        summary: String,
        hint: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum TranslationStatus {
    #[default]
    Idle,
    Running {
        question: String,
    },
    Done(TranslationResult),
    Failed {
        summary: String,
        hint: String,
        raw: Option<String>,
        retryable: bool,
    },
}

/// The latest question's outcome. `generation` increases with every
/// submission so late replies to an abandoned question can be recognised.
#[derive(Debug, Clone, Default)]
pub struct TranslationState {
    pub generation: u64,
    pub status: TranslationStatus,
}

impl TranslationState {
    pub fn is_running(&self) -> bool {
        matches!(self.status, TranslationStatus::Running { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ExecutionStatus {
    #[default]
    Idle,
    Running,
    Done(QueryResult),
    Failed {
        summary: String,
        hint: String,
        details: Option<String>,
    },
}

/// Outcome of running the editor's query. Tagged by generation like
/// [`TranslationState`] so a result for replaced text is dropped.
#[derive(Debug, Clone, Default)]
pub struct ExecutionState {
    pub generation: u64,
    pub status: ExecutionStatus,
}

impl ExecutionState {
    pub fn is_running(&self) -> bool {
        self.status == ExecutionStatus::Running
    }

    /// Forgets the shown result and orphans any run still in flight.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.status = ExecutionStatus::Idle;
    }
}

#[derive(Debug, Default)]
pub struct QuestionLine {
    pub text: String,
}

#[derive(Debug, Default)]
pub struct AppState {
    pub should_quit: bool,
    pub input_mode: InputMode,
    pub dsn: Option<String>,
    pub question: QuestionLine,
    pub editor: QueryEditor,
    pub schema: Option<Arc<SchemaSnapshot>>,
    pub schema_status: SchemaStatus,
    pub translation: TranslationState,
    pub execution: ExecutionState,
    pub messages: MessageState,
    pub terminal_height: u16,
    empty_index: AutocompleteIndex,
    render_dirty: bool,
}

impl AppState {
    pub fn new(dsn: Option<String>) -> Self {
        Self {
            dsn,
            render_dirty: true,
            ..Self::default()
        }
    }

    /// Index for the current schema, or an empty one before the first load.
    pub fn completion_index(&self) -> &AutocompleteIndex {
        self.schema
            .as_ref()
            .map_or(&self.empty_index, |snapshot| snapshot.index.as_ref())
    }

    /// Feeds one key to the query editor against the current index.
    pub fn editor_key(&mut self, key: EditorKey) -> bool {
        let index = self
            .schema
            .as_ref()
            .map_or(&self.empty_index, |snapshot| snapshot.index.as_ref());
        self.editor.handle_key(key, index)
    }

    pub fn blur_editor(&mut self) {
        let index = self
            .schema
            .as_ref()
            .map_or(&self.empty_index, |snapshot| snapshot.index.as_ref());
        self.editor.blur(index);
    }

    pub fn database_name(&self) -> Option<&str> {
        self.schema
            .as_ref()
            .map(|snapshot| snapshot.model.database_name())
    }

    pub fn mark_dirty(&mut self) {
        self.render_dirty = true;
    }

    pub fn clear_dirty(&mut self) {
        self.render_dirty = false;
    }

    pub fn is_dirty(&self) -> bool {
        self.render_dirty
    }
}
