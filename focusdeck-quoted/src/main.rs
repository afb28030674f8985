//! Focusdeck quote service -- motivational quotes over HTTP.
//!
//! An axum server that fronts an OpenAI-compatible chat-completions
//! upstream and serves `POST /api/quote` returning `{"quote": "..."}` or
//! `{"error": "..."}`.
//!
//! # Usage
//!
//! ```bash
//! # Run on default address 0.0.0.0:4500
//! MODEL_API_KEY=... cargo run --bin focusdeck-quoted
//!
//! # Run on custom address
//! MODEL_API_KEY=... cargo run --bin focusdeck-quoted -- --bind 127.0.0.1:8080
//! ```

use std::sync::Arc;

use clap::Parser;
use focusdeck_quoted::config::{QuotedCliArgs, QuotedConfig};
use focusdeck_quoted::service::{self, ServiceState};

#[tokio::main]
async fn main() {
    let cli = QuotedCliArgs::parse();

    // Load config from CLI args + config file + env vars + defaults.
    let config = match QuotedConfig::load(&cli) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Error loading configuration: {e}");
            std::process::exit(1);
        }
    };

    // Initialize tracing with the resolved log level.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    if config.api_key.is_none() {
        tracing::warn!("no MODEL_API_KEY set; upstream calls will likely be rejected");
    }
    tracing::info!(addr = %config.bind_addr, model = %config.model, "starting quote service");

    let state = match ServiceState::from_config(&config) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            tracing::error!(error = %e, "failed to build service state");
            std::process::exit(1);
        }
    };

    match service::start_server(&config.bind_addr, state).await {
        Ok((bound_addr, handle)) => {
            tracing::info!(addr = %bound_addr, "quote service listening");
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "quote service task failed");
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "failed to start quote service");
            std::process::exit(1);
        }
    }
}
