//! Command-line interface for chat-bridge
//!
//! Provides argument parsing and subcommand handling for the chat-bridge binary.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// One-shot bridge from a JSON chat payload on stdin to a hosted chat completion API
#[derive(Parser, Debug)]
#[command(name = "chat-bridge")]
#[command(version)]
#[command(about = "One-shot bridge from a JSON chat payload on stdin to a chat completion API")]
#[command(
    long_about = "Reads {\"message\": ..., \"context\": [...]} from standard input, forwards \
    a bounded conversation window to the chat completion endpoint, and writes exactly one \
    JSON line ({\"reply\", \"model\"} or {\"error\"}) to standard output."
)]
pub struct Cli {
    /// Path to configuration file (defaults to ./chat-bridge.toml when present)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to an environment file holding OPENAI_API_KEY (defaults to ./.env when present)
    #[arg(short, long, global = true)]
    pub env_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# chat-bridge Configuration
# ==========================
#
# Every key is optional. Missing keys fall back to the values shown here.

# ─────────────────────────────────────────────────────────────────────────────
# ENDPOINT
# ─────────────────────────────────────────────────────────────────────────────

[endpoint]
# API base URL (must include the /v1 segment for OpenAI-compatible APIs)
base_url = "https://api.openai.com/v1"

# Model requested for every completion
model = "gpt-4.1-mini"

# Sampling temperature (0.0-2.0)
temperature = 0.7

# Maximum tokens generated for the reply
max_tokens = 500

# Whole-request timeout in seconds (1-300). Unset means no explicit timeout.
# request_timeout_seconds = 60

# ─────────────────────────────────────────────────────────────────────────────
# CONVERSATION
# ─────────────────────────────────────────────────────────────────────────────

[conversation]
# Leading system turn sent before the conversation context
system_prompt = "You are a helpful assistant."

# How many trailing context entries are considered (0-100).
# Malformed entries inside the window are dropped.
context_window = 6

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level for stderr: "trace", "debug", "info", "warn", "error", "off"
# RUST_LOG overrides this when set.
log_level = "error"
"#
}
