//! Side effects returned by the reducer, executed by EffectRunner.

use std::sync::Arc;

use askql_domain::SchemaModel;

#[derive(Debug, Clone)]
pub enum Effect {
    Render,

    FetchSchema {
        dsn: String,
    },

    /// Result comes back as `Action::TranslationFinished` tagged with `generation`.
    Translate {
        generation: u64,
        question: String,
        model: Arc<SchemaModel>,
    },

    /// Result comes back as `Action::ExecutionFinished` tagged with `generation`.
    Execute {
        generation: u64,
        dsn: String,
        sql: String,
    },
}
