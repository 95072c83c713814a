//! HTTP client for the chat completion endpoint
//!
//! [`CompletionClient`] is the seam the translator depends on;
//! [`OpenAiClient`] is the reqwest-backed implementation used by the binary.

use crate::config::EndpointConfig;
use crate::credentials::ApiKey;
use crate::error::{AppError, AppResult};
use crate::openai::types::{ApiErrorEnvelope, ChatCompletionRequest, ChatCompletionResponse};
use async_trait::async_trait;
use std::time::Duration;

/// Longest upstream body excerpt carried into an error message
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Sends one chat completion request and returns the decoded response
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(
        &self,
        api_key: &ApiKey,
        request: &ChatCompletionRequest,
    ) -> AppResult<ChatCompletionResponse>;
}

/// OpenAI-compatible client over reqwest
#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    base_url: String,
}

impl OpenAiClient {
    /// Create a client for the configured endpoint
    pub fn new(endpoint: &EndpointConfig) -> AppResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(seconds) = endpoint.request_timeout_seconds() {
            builder = builder.timeout(Duration::from_secs(seconds));
        }

        let http = builder
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: endpoint.base_url().trim_end_matches('/').to_string(),
        })
    }

    /// Full URL of the chat completions route
    ///
    /// base_url already includes /v1, so only the route is appended.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    async fn complete(
        &self,
        api_key: &ApiKey,
        request: &ChatCompletionRequest,
    ) -> AppResult<ChatCompletionResponse> {
        let url = self.completions_url();

        tracing::debug!(
            url = %url,
            model = %request.model(),
            message_count = request.messages().len(),
            "Sending chat completion request"
        );

        let response = self
            .http
            .post(&url)
            .bearer_auth(api_key.expose())
            .json(request)
            .send()
            .await
            .map_err(|source| classify_transport_error(&url, source))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|source| classify_transport_error(&url, source))?;

        tracing::debug!(
            url = %url,
            status = %status,
            body_bytes = body.len(),
            "Chat completion response received"
        );

        if !status.is_success() {
            return Err(AppError::Upstream {
                status: status.as_u16(),
                message: upstream_error_message(&body),
            });
        }

        decode_success_body(&body)
    }
}

fn classify_transport_error(url: &str, source: reqwest::Error) -> AppError {
    if source.is_timeout() {
        AppError::Timeout {
            endpoint: url.to_string(),
            source,
        }
    } else {
        AppError::Transport {
            endpoint: url.to_string(),
            source,
        }
    }
}

/// Decode a 2xx body, recognising error envelopes some proxies send with 200
fn decode_success_body(body: &str) -> AppResult<ChatCompletionResponse> {
    match serde_json::from_str::<ChatCompletionResponse>(body) {
        Ok(response) => Ok(response),
        Err(decode_err) => match serde_json::from_str::<ApiErrorEnvelope>(body) {
            Ok(envelope) => Err(AppError::Upstream {
                status: 200,
                message: envelope.error.message,
            }),
            Err(_) => Err(AppError::MalformedResponse(decode_err.to_string())),
        },
    }
}

/// Prefer the endpoint's `error.message`; fall back to a bounded raw body
fn upstream_error_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) {
        return envelope.error.message;
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }

    // Char-based truncation keeps multi-byte text intact
    if trimmed.chars().count() > MAX_ERROR_BODY_CHARS {
        let excerpt: String = trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect();
        format!("{}...", excerpt)
    } else {
        trimmed.to_string()
    }
}
