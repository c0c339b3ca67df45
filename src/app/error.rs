use crate::ports::{AiFailureKind, AiServiceError};

/// Failures of one question-to-query translation, tagged by stage.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TranslationError {
    #[error("schema has no tables")]
    EmptySchema,
    #[error("question is blank")]
    EmptyQuestion,
    #[error(transparent)]
    AiService(#[from] AiServiceError),
    #[error("could not extract a query from the AI response")]
    UnparseableResponse { raw: String },
}

impl TranslationError {
    pub fn summary(&self) -> &'static str {
        match self {
            Self::EmptySchema => "No tables found in the database",
            Self::EmptyQuestion => "Type a question first",
            Self::AiService(e) => e.kind.summary(),
            Self::UnparseableResponse { .. } => "The AI response did not contain a query",
        }
    }

    pub fn hint(&self) -> &'static str {
        match self {
            Self::EmptySchema => "Check the DSN or the excluded column patterns",
            Self::EmptyQuestion => "Describe the data you want in plain language",
            Self::AiService(e) => e.kind.hint(),
            Self::UnparseableResponse { .. } => "Rephrase the question and try again",
        }
    }

    /// Precondition failures never reach the AI service.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::EmptySchema | Self::EmptyQuestion)
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            Self::AiService(e) => matches!(
                e.kind,
                AiFailureKind::Transport | AiFailureKind::Timeout | AiFailureKind::RateLimited
            ),
            Self::UnparseableResponse { .. } => true,
            Self::EmptySchema | Self::EmptyQuestion => false,
        }
    }

    /// Raw AI text kept for display when nothing could be extracted.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Self::UnparseableResponse { raw } => Some(raw),
            _ => None,
        }
    }
}
