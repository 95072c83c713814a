//! Invocation wiring
//!
//! Resolves configuration, the env file and the credential for one run, and
//! assembles the translator around the HTTP client.

use crate::cli::Cli;
use crate::config::Config;
use crate::credentials::resolve_api_key;
use crate::env_file::EnvFile;
use crate::error::AppResult;
use crate::openai::OpenAiClient;
use crate::translator::{BridgeResponse, Translator};

/// Everything loaded from disk for one invocation
#[derive(Debug, Clone, Default)]
pub struct Runtime {
    pub config: Config,
    pub env_file: EnvFile,
}

impl Runtime {
    /// Load the env file named on the command line next to a loaded config
    ///
    /// Called after telemetry is up so lines skipped in the default env file
    /// are logged.
    pub fn with_config(cli: &Cli, config: Config) -> AppResult<Self> {
        let env_file = EnvFile::load(cli.env_file.as_deref())?;
        Ok(Self { config, env_file })
    }

    /// Build the translator; `process_api_key` is the raw environment value
    pub fn translator(
        &self,
        process_api_key: Option<String>,
    ) -> AppResult<Translator<OpenAiClient>> {
        let api_key = resolve_api_key(process_api_key, &self.env_file);
        tracing::debug!(credential_present = api_key.is_some(), "Resolved credential");

        let client = OpenAiClient::new(&self.config.endpoint)?;
        Ok(Translator::new(&self.config, api_key, client))
    }
}

/// Run one translation against the real endpoint
pub async fn translate_once(
    runtime: &Runtime,
    process_api_key: Option<String>,
    input: &[u8],
) -> BridgeResponse {
    match runtime.translator(process_api_key) {
        Ok(translator) => translator.respond(input).await,
        Err(err) => {
            tracing::warn!(kind = err.kind(), error = %err, "Failed to build translator");
            BridgeResponse::from_error(&err)
        }
    }
}
