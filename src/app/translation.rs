use std::sync::Arc;
use std::time::Instant;

use askql_domain::{SchemaModel, TranslationResult};

use crate::error::TranslationError;
use crate::ports::AiClient;
use crate::prompt;
use crate::response;
use crate::schema_context::ContextBudget;

/// Runs one question through prompt building, a single AI call and response
/// interpretation. Holds no per-request state, so one instance can serve
/// concurrent questions against the same model.
pub struct Translator {
    ai: Arc<dyn AiClient>,
    budget: ContextBudget,
}

impl Translator {
    pub fn new(ai: Arc<dyn AiClient>, budget: ContextBudget) -> Self {
        Self { ai, budget }
    }

    pub fn budget(&self) -> &ContextBudget {
        &self.budget
    }

    pub async fn translate(
        &self,
        model: &SchemaModel,
        question: &str,
    ) -> Result<TranslationResult, TranslationError> {
        let prompt = prompt::build(model, question, &self.budget)?;
        tracing::info!(
            database = model.database_name(),
            tables = model.table_count(),
            prompt_len = prompt.len(),
            "sending translation request"
        );

        let started = Instant::now();
        let raw = self.ai.complete(&prompt).await.inspect_err(|e| {
            tracing::warn!(error = %e, "AI call failed");
        })?;
        tracing::info!(
            elapsed_ms = started.elapsed().as_millis() as u64,
            response_len = raw.len(),
            "AI response received"
        );

        let result = response::interpret(&raw)?;
        tracing::info!(provenance = %result.provenance, "translation finished");
        Ok(result)
    }
}
