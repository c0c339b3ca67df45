use std::time::Duration;

use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::{Value, json};

use askql_app::ports::{AiClient, AiFailureKind, AiServiceError};

use crate::config::AiProvider;

const ANTHROPIC_VERSION: &str = "2023-06-01";
const MAX_OUTPUT_TOKENS: u32 = 4096;
const ERROR_BODY_PREVIEW: usize = 300;

/// One-shot text completion over HTTPS for the configured provider.
pub struct HttpAiClient {
    http: reqwest::Client,
    provider: AiProvider,
    model: String,
    api_key: Option<String>,
}

impl HttpAiClient {
    pub fn new(
        provider: AiProvider,
        model: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, AiServiceError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AiServiceError::new(AiFailureKind::Transport, e.to_string()))?;
        Ok(Self {
            http,
            provider,
            model: model.into(),
            api_key,
        })
    }

    fn request(&self, api_key: &str, prompt: &str) -> reqwest::RequestBuilder {
        let body = request_body(self.provider, &self.model, prompt);
        match self.provider {
            AiProvider::Gemini => self
                .http
                .post(format!(
                    "https://generativelanguage.googleapis.com/v1beta/models/{}:generateContent",
                    self.model
                ))
                .header("x-goog-api-key", api_key),
            AiProvider::Anthropic => self
                .http
                .post("https://api.anthropic.com/v1/messages")
                .header("x-api-key", api_key)
                .header("anthropic-version", ANTHROPIC_VERSION),
            AiProvider::OpenAI => self
                .http
                .post("https://api.openai.com/v1/chat/completions")
                .bearer_auth(api_key),
        }
        .json(&body)
    }
}

#[async_trait]
impl AiClient for HttpAiClient {
    async fn complete(&self, prompt: &str) -> Result<String, AiServiceError> {
        let Some(api_key) = self.api_key.as_deref() else {
            return Err(AiServiceError::new(
                AiFailureKind::NotConfigured,
                "no API key in the environment",
            ));
        };

        let resp = self
            .request(api_key, prompt)
            .send()
            .await
            .map_err(transport_error)?;
        let status = resp.status();
        let text = resp.text().await.map_err(transport_error)?;

        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), provider = ?self.provider, "AI request rejected");
            return Err(status_error(status, &text));
        }

        let payload: Value = serde_json::from_str(&text)
            .map_err(|e| AiServiceError::new(AiFailureKind::MalformedReply, e.to_string()))?;
        extract_text(self.provider, &payload).ok_or_else(|| {
            AiServiceError::new(
                AiFailureKind::MalformedReply,
                "response has no text content",
            )
        })
    }
}

fn request_body(provider: AiProvider, model: &str, prompt: &str) -> Value {
    match provider {
        AiProvider::Gemini => json!({
            "contents": [{"parts": [{"text": prompt}]}]
        }),
        AiProvider::Anthropic => json!({
            "model": model,
            "max_tokens": MAX_OUTPUT_TOKENS,
            "messages": [{"role": "user", "content": prompt}]
        }),
        AiProvider::OpenAI => json!({
            "model": model,
            "max_tokens": MAX_OUTPUT_TOKENS,
            "messages": [{"role": "user", "content": prompt}]
        }),
    }
}

fn extract_text(provider: AiProvider, payload: &Value) -> Option<String> {
    let pointer = match provider {
        AiProvider::Gemini => "/candidates/0/content/parts/0/text",
        AiProvider::Anthropic => "/content/0/text",
        AiProvider::OpenAI => "/choices/0/message/content",
    };
    payload
        .pointer(pointer)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn status_error(status: StatusCode, body: &str) -> AiServiceError {
    let kind = match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AiFailureKind::Auth,
        StatusCode::TOO_MANY_REQUESTS => AiFailureKind::RateLimited,
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => AiFailureKind::Timeout,
        _ => AiFailureKind::Transport,
    };
    let preview: String = body.chars().take(ERROR_BODY_PREVIEW).collect();
    AiServiceError::new(kind, format!("HTTP {status}: {preview}"))
}

fn transport_error(e: reqwest::Error) -> AiServiceError {
    let kind = if e.is_timeout() {
        AiFailureKind::Timeout
    } else {
        AiFailureKind::Transport
    };
    AiServiceError::new(kind, e.to_string())
}
