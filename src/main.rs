//! chat-bridge binary
//!
//! Without a subcommand, translates stdin into exactly one JSON line on stdout
//! and exits 0 whatever happened; failures travel in the `error` field.

use chat_bridge::{
    app::{self, Runtime},
    cli::{Cli, Command, generate_config_template},
    config::{Config, default_log_level},
    credentials,
    error::AppError,
    telemetry,
    translator::BridgeResponse,
};
use clap::Parser;
use std::io::Write;
use tokio::io::AsyncReadExt;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match &cli.command {
        Some(Command::Config { output }) => {
            let template = generate_config_template();
            match output {
                Some(path) => {
                    std::fs::write(path, template)?;
                    eprintln!("Wrote configuration template to {}", path.display());
                }
                None => print!("{}", template),
            }
        }
        None => {
            let response = run_translation(&cli).await;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", response)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

async fn run_translation(cli: &Cli) -> BridgeResponse {
    let config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            telemetry::init(&default_log_level());
            tracing::warn!(kind = err.kind(), error = %err, "Failed to load configuration");
            return BridgeResponse::from_error(&err);
        }
    };

    telemetry::init(&config.observability.log_level);

    let runtime = match Runtime::with_config(cli, config) {
        Ok(runtime) => runtime,
        Err(err) => {
            tracing::warn!(kind = err.kind(), error = %err, "Failed to load env file");
            return BridgeResponse::from_error(&err);
        }
    };

    let mut input = Vec::new();
    if let Err(e) = tokio::io::stdin().read_to_end(&mut input).await {
        let err = AppError::Stdin(e);
        tracing::warn!(error = %err, "Failed to read input");
        return BridgeResponse::from_error(&err);
    }

    app::translate_once(&runtime, credentials::process_api_key(), &input).await
}
