//! chat-bridge - one-shot bridge to a hosted chat completion API
//!
//! Reads a `{"message", "context"}` payload, forwards a bounded conversation
//! window to an OpenAI-compatible endpoint, and produces exactly one
//! `{"reply", "model"}` or `{"error"}` object.

pub mod app;
pub mod cli;
pub mod config;
pub mod credentials;
pub mod env_file;
pub mod error;
pub mod openai;
pub mod request_id;
pub mod telemetry;
pub mod translator;
