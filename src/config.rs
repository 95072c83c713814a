//! Configuration management for chat-bridge
//!
//! Parses an optional TOML configuration file and provides typed access to
//! settings. Every section is optional; an absent file means the built-in
//! defaults (OpenAI endpoint, `gpt-4.1-mini`, temperature 0.7, 500 tokens,
//! a six-turn context window).

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::str::FromStr;

/// Config file looked up in the working directory when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "chat-bridge.toml";

/// Maximum accepted `request_timeout_seconds`
const MAX_TIMEOUT_SECONDS: u64 = 300;
/// Maximum accepted `context_window`
const MAX_CONTEXT_WINDOW: usize = 100;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub endpoint: EndpointConfig,
    #[serde(default)]
    pub conversation: ConversationConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Remote chat-completion endpoint settings
///
/// Fields are private so a validated config cannot be mutated afterwards.
/// Instances come from deserialization (or `Default`) and are checked by
/// [`Config::validate`].
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EndpointConfig {
    #[serde(default = "default_base_url")]
    base_url: String,
    #[serde(default = "default_model")]
    model: String,
    #[serde(default = "default_temperature")]
    temperature: f64,
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
    /// Whole-request timeout; `None` leaves the HTTP client's own behaviour
    #[serde(default, skip_serializing_if = "Option::is_none")]
    request_timeout_seconds: Option<u64>,
}

impl EndpointConfig {
    /// Get the API base URL (including the `/v1` segment)
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Get the requested model identifier
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the sampling temperature
    pub fn temperature(&self) -> f64 {
        self.temperature
    }

    /// Get the maximum number of output tokens
    pub fn max_tokens(&self) -> u32 {
        self.max_tokens
    }

    /// Get the request timeout, if one is configured
    pub fn request_timeout_seconds(&self) -> Option<u64> {
        self.request_timeout_seconds
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            request_timeout_seconds: None,
        }
    }
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4.1-mini".to_string()
}

fn default_temperature() -> f64 {
    0.7
}

fn default_max_tokens() -> u32 {
    500
}

/// Conversation shaping settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConversationConfig {
    /// Leading system turn of every outgoing message list
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,
    /// Number of trailing context entries considered
    #[serde(default = "default_context_window")]
    pub context_window: usize,
}

impl Default for ConversationConfig {
    fn default() -> Self {
        Self {
            system_prompt: default_system_prompt(),
            context_window: default_context_window(),
        }
    }
}

fn default_system_prompt() -> String {
    crate::translator::DEFAULT_SYSTEM_PROMPT.to_string()
}

fn default_context_window() -> usize {
    crate::translator::DEFAULT_CONTEXT_WINDOW
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// Stdout is reserved for the response line; stderr only carries errors by default
pub fn default_log_level() -> String {
    "error".to_string()
}

impl Config {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        // Phase 1: Read file (preserves io::Error context)
        let content = std::fs::read_to_string(path.as_ref()).map_err(|source| {
            AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            }
        })?;

        // Phase 2: Parse TOML (preserves toml::de::Error context)
        let config: Self = toml::from_str(&content).map_err(|source| {
            AppError::ConfigParseFailed {
                path: path_display.clone(),
                source,
            }
        })?;

        // Phase 3: Validate parsed config (provides contextual reason)
        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: match e {
                    AppError::Config(reason) => reason,
                    other => other.to_string(),
                },
            })?;

        Ok(config)
    }

    /// Resolve the configuration for one invocation
    ///
    /// An explicit path must exist. Without one, [`DEFAULT_CONFIG_PATH`] is
    /// used when present and the built-in defaults otherwise.
    pub fn load(explicit: Option<&Path>) -> AppResult<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_PATH);
                if default_path.is_file() {
                    Self::from_file(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    /// Validate configuration after parsing
    ///
    /// Called by `from_file()` and `from_str()`; call it explicitly when a
    /// config is assembled some other way.
    pub fn validate(&self) -> AppResult<()> {
        let endpoint = &self.endpoint;

        if !(endpoint.base_url.starts_with("http://") || endpoint.base_url.starts_with("https://"))
        {
            return Err(AppError::Config(format!(
                "endpoint.base_url must start with http:// or https://, got '{}'",
                endpoint.base_url
            )));
        }

        if endpoint.model.trim().is_empty() {
            return Err(AppError::Config(
                "endpoint.model cannot be empty".to_string(),
            ));
        }

        if !endpoint.temperature.is_finite() || !(0.0..=2.0).contains(&endpoint.temperature) {
            return Err(AppError::Config(format!(
                "endpoint.temperature must be a finite number between 0.0 and 2.0, got {}",
                endpoint.temperature
            )));
        }

        if endpoint.max_tokens == 0 {
            return Err(AppError::Config(
                "endpoint.max_tokens must be greater than 0".to_string(),
            ));
        }

        if let Some(timeout) = endpoint.request_timeout_seconds
            && (timeout == 0 || timeout > MAX_TIMEOUT_SECONDS)
        {
            return Err(AppError::Config(format!(
                "endpoint.request_timeout_seconds must be between 1 and {}, got {}",
                MAX_TIMEOUT_SECONDS, timeout
            )));
        }

        if self.conversation.context_window > MAX_CONTEXT_WINDOW {
            return Err(AppError::Config(format!(
                "conversation.context_window cannot exceed {}, got {}",
                MAX_CONTEXT_WINDOW, self.conversation.context_window
            )));
        }

        Ok(())
    }
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}
