//! API credential resolution
//!
//! The translator never reads the environment itself; it receives an
//! `Option<ApiKey>` resolved here.

use crate::env_file::EnvFile;
use std::fmt;

/// Environment variable holding the API key
pub const API_KEY_VAR: &str = "OPENAI_API_KEY";

/// Bearer credential for the completion endpoint
///
/// `Debug` is redacted so the key cannot leak through log fields.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Wrap a key, returning `None` for an empty value
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        if value.is_empty() {
            None
        } else {
            Some(Self(value))
        }
    }

    /// Raw key for the `Authorization` header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// Pick the API key from the process value or, failing that, the env file
///
/// Empty values count as unset in both places.
pub fn resolve_api_key(process_value: Option<String>, env_file: &EnvFile) -> Option<ApiKey> {
    process_value
        .and_then(ApiKey::new)
        .or_else(|| env_file.get(API_KEY_VAR).and_then(ApiKey::new))
}

/// Read [`API_KEY_VAR`] from the process environment
pub fn process_api_key() -> Option<String> {
    std::env::var(API_KEY_VAR).ok()
}
