//! OpenAI Chat Completions wire types and client

pub mod client;
pub mod types;

pub use client::{CompletionClient, OpenAiClient};
pub use types::{ChatCompletionRequest, ChatCompletionResponse, ChatMessage, MessageRole};
