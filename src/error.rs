//! Error types for chat-bridge
//!
//! Every variant renders to the single `{"error": ...}` output line through its
//! `Display` text, so messages are written for the calling front-end.

use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum AppError {
    #[error("OPENAI_API_KEY not set")]
    MissingCredential,

    #[error("Invalid request payload: {0}")]
    InvalidInput(String),

    #[error("Failed to read standard input: {0}")]
    Stdin(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to read config file {path}: {source}")]
    ConfigFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file {path}: {source}")]
    ConfigParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid configuration in {path}: {reason}")]
    ConfigValidationFailed { path: String, reason: String },

    #[error("Failed to read env file {path}: {source}")]
    EnvFileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid env file {path} at line {line}: {reason}")]
    EnvFileParse {
        path: String,
        line: usize,
        reason: String,
    },

    #[error("Request to {endpoint} timed out: {source}")]
    Timeout {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {endpoint} failed: {source}")]
    Transport {
        endpoint: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Endpoint returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },

    #[error("Malformed completion response: {0}")]
    MalformedResponse(String),

    #[error("Completion response missing {0}")]
    EmptyCompletion(&'static str),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Short label for log fields
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingCredential => "missing_credential",
            Self::InvalidInput(_) | Self::Stdin(_) => "invalid_input",
            Self::Config(_)
            | Self::ConfigFileRead { .. }
            | Self::ConfigParseFailed { .. }
            | Self::ConfigValidationFailed { .. }
            | Self::EnvFileRead { .. }
            | Self::EnvFileParse { .. } => "config",
            Self::Timeout { .. } | Self::Transport { .. } => "transport",
            Self::Upstream { .. } => "upstream",
            Self::MalformedResponse(_) | Self::EmptyCompletion(_) => "malformed_response",
            Self::Internal(_) => "internal",
        }
    }
}

/// Convenience type alias for Results
pub type AppResult<T> = Result<T, AppError>;
