//! Request translation
//!
//! Turns one stdin payload into one chat completion call and one output
//! object. Every failure is folded into [`BridgeResponse::Error`], so callers
//! always get exactly one of the two response shapes.

pub mod input;
pub mod window;

use crate::config::Config;
use crate::credentials::ApiKey;
use crate::error::{AppError, AppResult};
use crate::openai::{ChatCompletionRequest, CompletionClient};
use crate::request_id::RequestId;
use serde::Serialize;
use std::fmt;
use tracing::Instrument;

pub use input::{IncomingRequest, parse_object};
pub use window::build_messages;

/// Leading system turn of every outgoing message list
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a helpful assistant.";
/// Number of trailing context entries considered
pub const DEFAULT_CONTEXT_WINDOW: usize = 6;

/// Successful translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionResult {
    pub reply: String,
    pub model: String,
}

/// Failed translation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorResult {
    pub error: String,
}

/// The single object written to standard output
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum BridgeResponse {
    Completion(CompletionResult),
    Error(ErrorResult),
}

impl BridgeResponse {
    /// Render an error through its `Display` text
    pub fn from_error(err: &AppError) -> Self {
        Self::Error(ErrorResult {
            error: err.to_string(),
        })
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

impl From<AppResult<CompletionResult>> for BridgeResponse {
    fn from(result: AppResult<CompletionResult>) -> Self {
        match result {
            Ok(completion) => Self::Completion(completion),
            Err(err) => Self::from_error(&err),
        }
    }
}

/// Compact single-line JSON
impl fmt::Display for BridgeResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let line = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&line)
    }
}

/// Translates stdin payloads into chat completion calls
///
/// The credential is injected at construction; `None` means every request
/// short-circuits with the missing-credential error before any network call.
pub struct Translator<C> {
    client: C,
    api_key: Option<ApiKey>,
    model: String,
    temperature: f64,
    max_tokens: u32,
    system_prompt: String,
    context_window: usize,
}

impl<C: CompletionClient> Translator<C> {
    pub fn new(config: &Config, api_key: Option<ApiKey>, client: C) -> Self {
        Self {
            client,
            api_key,
            model: config.endpoint.model().to_string(),
            temperature: config.endpoint.temperature(),
            max_tokens: config.endpoint.max_tokens(),
            system_prompt: config.conversation.system_prompt.clone(),
            context_window: config.conversation.context_window,
        }
    }

    /// Translate raw input into the output object; never fails
    pub async fn respond(&self, raw: &[u8]) -> BridgeResponse {
        let request_id = RequestId::new();
        let span = tracing::info_span!("translate", request_id = %request_id);

        let result = self.translate(raw).instrument(span.clone()).await;
        if let Err(err) = &result {
            span.in_scope(|| {
                tracing::warn!(kind = err.kind(), error = %err, "Translation failed");
            });
        }
        BridgeResponse::from(result)
    }

    /// Translate raw input, surfacing the failure cause
    pub async fn translate(&self, raw: &[u8]) -> AppResult<CompletionResult> {
        let object = parse_object(raw)?;

        let api_key = self.api_key.as_ref().ok_or(AppError::MissingCredential)?;

        let incoming = IncomingRequest::from_object(object)?;

        let messages = build_messages(
            &self.system_prompt,
            &incoming.context,
            &incoming.message,
            self.context_window,
        );

        tracing::info!(
            message_chars = incoming.message.chars().count(),
            context_entries = incoming.context.len(),
            forwarded_turns = messages.len() - 2,
            "Forwarding conversation window"
        );

        let request = ChatCompletionRequest::new(
            self.model.clone(),
            messages,
            self.temperature,
            self.max_tokens,
        );

        let response = self.client.complete(api_key, &request).await?;

        if response.choices.is_empty() {
            return Err(AppError::EmptyCompletion("choices"));
        }
        let reply = response
            .first_content()
            .ok_or(AppError::EmptyCompletion("message content"))?
            .trim()
            .to_string();

        tracing::info!(
            served_model = %response.model,
            reply_chars = reply.chars().count(),
            "Completion received"
        );

        Ok(CompletionResult {
            reply,
            model: response.model,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::openai::{ChatCompletionResponse, ChatMessage, MessageRole};
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    /// Records requests and replies with a canned result
    #[derive(Clone)]
    struct RecordingClient {
        requests: Arc<Mutex<Vec<ChatCompletionRequest>>>,
        reply: fn() -> AppResult<ChatCompletionResponse>,
    }

    impl RecordingClient {
        fn new(reply: fn() -> AppResult<ChatCompletionResponse>) -> Self {
            Self {
                requests: Arc::new(Mutex::new(Vec::new())),
                reply,
            }
        }

        fn calls(&self) -> Vec<ChatCompletionRequest> {
            self.requests.lock().expect("lock").clone()
        }
    }

    #[async_trait]
    impl CompletionClient for RecordingClient {
        async fn complete(
            &self,
            _api_key: &ApiKey,
            request: &ChatCompletionRequest,
        ) -> AppResult<ChatCompletionResponse> {
            self.requests.lock().expect("lock").push(request.clone());
            (self.reply)()
        }
    }

    fn hello_response() -> AppResult<ChatCompletionResponse> {
        Ok(serde_json::from_value(json!({
            "model": "gpt-4.1-mini-2025-04-14",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "\n  Hello there!  \n"}}]
        }))
        .expect("fixture"))
    }

    fn translator(client: &RecordingClient, key: Option<&str>) -> Translator<RecordingClient> {
        Translator::new(&Config::default(), key.and_then(ApiKey::new), client.clone())
    }

    #[tokio::test]
    async fn test_missing_key_short_circuits_without_call() {
        let client = RecordingClient::new(hello_response);
        let response = translator(&client, None)
            .respond(br#"{"message": "hi"}"#)
            .await;

        assert_eq!(response.to_string(), r#"{"error":"OPENAI_API_KEY not set"}"#);
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_missing_key_wins_over_wrongly_typed_fields() {
        let client = RecordingClient::new(hello_response);
        let translator = translator(&client, None);

        for raw in [
            &br#"{"message": 5}"#[..],
            br#"{"message": "hi", "context": "abc"}"#,
        ] {
            let response = translator.respond(raw).await;
            assert_eq!(response.to_string(), r#"{"error":"OPENAI_API_KEY not set"}"#);
        }
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_wrongly_typed_fields_rejected_once_key_is_present() {
        let client = RecordingClient::new(hello_response);
        let err = translator(&client, Some("sk-test"))
            .translate(br#"{"message": 5}"#)
            .await
            .expect_err("message must be a string");
        assert!(matches!(err, AppError::InvalidInput(_)));
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_invalid_json_reported_before_credential_check() {
        let client = RecordingClient::new(hello_response);
        let response = translator(&client, None).respond(b"{oops").await;

        match response {
            BridgeResponse::Error(ErrorResult { error }) => {
                assert!(error.starts_with("Invalid request payload"), "got {}", error)
            }
            other => panic!("expected error, got {other:?}"),
        }
        assert!(client.calls().is_empty());
    }

    #[tokio::test]
    async fn test_success_trims_reply_and_echoes_served_model() {
        let client = RecordingClient::new(hello_response);
        let response = translator(&client, Some("sk-test"))
            .respond(br#"{"message": "hi", "context": []}"#)
            .await;

        assert_eq!(
            response,
            BridgeResponse::Completion(CompletionResult {
                reply: "Hello there!".to_string(),
                model: "gpt-4.1-mini-2025-04-14".to_string(),
            })
        );

        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].model(), "gpt-4.1-mini");
        assert_eq!(calls[0].temperature(), 0.7);
        assert_eq!(calls[0].max_tokens(), 500);
        assert_eq!(
            calls[0].messages(),
            &[
                ChatMessage::new(MessageRole::System, DEFAULT_SYSTEM_PROMPT),
                ChatMessage::new(MessageRole::User, "hi"),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_input_sends_empty_user_turn() {
        let client = RecordingClient::new(hello_response);
        let response = translator(&client, Some("sk-test")).respond(b"").await;

        assert!(!response.is_error());
        let calls = client.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].messages().len(), 2);
        assert_eq!(calls[0].messages()[1].content(), "");
    }

    #[tokio::test]
    async fn test_client_error_becomes_error_result() {
        let client = RecordingClient::new(|| {
            Err(AppError::Upstream {
                status: 401,
                message: "Incorrect API key provided".to_string(),
            })
        });
        let response = translator(&client, Some("sk-bad"))
            .respond(br#"{"message": "hi"}"#)
            .await;

        assert_eq!(
            response.to_string(),
            r#"{"error":"Endpoint returned HTTP 401: Incorrect API key provided"}"#
        );
        assert_eq!(client.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_choices_and_content_are_errors() {
        let no_choices = RecordingClient::new(|| {
            Ok(serde_json::from_value(json!({"model": "m", "choices": []})).expect("fixture"))
        });
        let err = translator(&no_choices, Some("k"))
            .translate(b"{}")
            .await
            .expect_err("no choices");
        assert_eq!(err.to_string(), "Completion response missing choices");

        let null_content = RecordingClient::new(|| {
            Ok(serde_json::from_value(json!({
                "model": "m",
                "choices": [{"message": {"content": null}}]
            }))
            .expect("fixture"))
        });
        let err = translator(&null_content, Some("k"))
            .translate(b"{}")
            .await
            .expect_err("null content");
        assert_eq!(err.to_string(), "Completion response missing message content");
    }

    #[test]
    fn test_response_shapes_are_exclusive() {
        let ok = BridgeResponse::Completion(CompletionResult {
            reply: "r".to_string(),
            model: "m".to_string(),
        });
        let ok_value: serde_json::Value =
            serde_json::from_str(&ok.to_string()).expect("valid json");
        assert_eq!(ok_value, json!({"reply": "r", "model": "m"}));

        let err = BridgeResponse::from_error(&AppError::MissingCredential);
        let err_value: serde_json::Value =
            serde_json::from_str(&err.to_string()).expect("valid json");
        assert_eq!(err_value, json!({"error": "OPENAI_API_KEY not set"}));
    }

    #[test]
    fn test_display_is_single_line() {
        let response = BridgeResponse::Completion(CompletionResult {
            reply: "line one\nline two".to_string(),
            model: "m".to_string(),
        });
        assert!(!response.to_string().contains('\n'));
    }
}
