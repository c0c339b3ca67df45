use async_trait::async_trait;

/// Text in, text out. Model and provider details stay behind this seam.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AiClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> Result<String, AiServiceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AiFailureKind {
    NotConfigured,
    Transport,
    Timeout,
    Auth,
    RateLimited,
    MalformedReply,
}

impl AiFailureKind {
    pub fn summary(self) -> &'static str {
        match self {
            Self::NotConfigured => "AI service is not configured",
            Self::Transport => "Could not reach the AI service",
            Self::Timeout => "AI service timed out",
            Self::Auth => "AI service rejected the API key",
            Self::RateLimited => "AI service rate limit reached",
            Self::MalformedReply => "AI service returned an unexpected payload",
        }
    }

    pub fn hint(self) -> &'static str {
        match self {
            Self::NotConfigured => "Set the API key environment variable named in config.toml",
            Self::Transport => "Check network connectivity",
            Self::Timeout => "Try again or raise [ai].timeout_secs",
            Self::Auth => "Check the API key",
            Self::RateLimited => "Wait a moment and try again",
            Self::MalformedReply => "Check the configured model name",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{}: {cause}", .kind.summary())]
pub struct AiServiceError {
    pub kind: AiFailureKind,
    pub cause: String,
}

impl AiServiceError {
    pub fn new(kind: AiFailureKind, cause: impl Into<String>) -> Self {
        Self {
            kind,
            cause: cause.into(),
        }
    }
}
