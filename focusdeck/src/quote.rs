//! Quote service bridge for wiring the TUI to the external quote
//! collaborator.
//!
//! This module bridges the synchronous TUI event loop (crossterm
//! poll-based) with the async HTTP client. It spawns a background tokio
//! task and communicates with the main thread via [`QuoteCommand`] /
//! [`QuoteEvent`] channels.
//!
//! # Architecture
//!
//! ```text
//! TUI (main thread)  ←── QuoteEvent ───  tokio background task
//!                     ─── QuoteCommand →
//! ```
//!
//! The collaborator contract is small: a request with no payload is
//! answered either by a complete quote string (JSON envelope) or by an
//! incrementally-delivered sequence of text fragments terminated by stream
//! closure. Failures of any kind surface as the [`QuoteEvent::Failed`]
//! sentinel and never touch timer or task state.

use std::time::Duration;

use futures_util::StreamExt;
use tokio::sync::mpsc;

use focusdeck_model::quote::{QUOTE_ERROR_MESSAGE, QuoteResponse};

/// Commands sent from the TUI main loop to the quote background task.
#[derive(Debug)]
pub enum QuoteCommand {
    /// Request a fresh quote.
    Refresh,
    /// Gracefully shut down the background task.
    Shutdown,
}

/// Events sent from the quote background task to the TUI main loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteEvent {
    /// A complete quote arrived in one response.
    Quote(String),
    /// One fragment of an incrementally-delivered quote.
    Fragment(String),
    /// The fragment stream closed; the quote is complete.
    Done,
    /// The request failed; the payload replaces the quote text.
    Failed(String),
}

/// Errors that can occur while setting up the quote bridge.
#[derive(Debug, thiserror::Error)]
pub enum QuoteError {
    /// The HTTP client could not be constructed.
    #[error("failed to build http client: {0}")]
    ClientBuild(#[from] reqwest::Error),
}

/// Configuration for the quote bridge.
#[derive(Debug, Clone)]
pub struct QuoteConfig {
    /// Endpoint answering `POST` quote requests.
    pub endpoint: String,
    /// Per-request timeout.
    pub request_timeout: Duration,
    /// Channel capacity for command/event mpsc channels.
    pub channel_capacity: usize,
}

/// Default per-request timeout.
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Default channel capacity for commands and events.
const DEFAULT_CHANNEL_CAPACITY: usize = 16;

impl QuoteConfig {
    /// Creates a `QuoteConfig` with default timeout and capacities.
    #[must_use]
    pub const fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }
}

/// Spawns the quote background task and returns channel handles.
///
/// The task idles until a [`QuoteCommand::Refresh`] arrives, performs one
/// `POST` per request, and forwards the outcome as [`QuoteEvent`]s. It
/// exits on [`QuoteCommand::Shutdown`] or when either channel closes.
///
/// # Errors
///
/// Returns [`QuoteError`] if the HTTP client cannot be built. The caller
/// should fall back to a static quote on error.
pub fn spawn_quote(
    config: QuoteConfig,
) -> Result<(mpsc::Sender<QuoteCommand>, mpsc::Receiver<QuoteEvent>), QuoteError> {
    let client = reqwest::Client::builder()
        .timeout(config.request_timeout)
        .build()?;

    let (cmd_tx, mut cmd_rx) = mpsc::channel::<QuoteCommand>(config.channel_capacity);
    let (evt_tx, evt_rx) = mpsc::channel::<QuoteEvent>(config.channel_capacity);

    tokio::spawn(async move {
        while let Some(cmd) = cmd_rx.recv().await {
            match cmd {
                QuoteCommand::Refresh => {
                    if fetch_one(&client, &config.endpoint, &evt_tx).await.is_err() {
                        // Event receiver went away; the TUI is shutting down.
                        break;
                    }
                }
                QuoteCommand::Shutdown => break,
            }
        }
        tracing::debug!("quote task exiting");
    });

    Ok((cmd_tx, evt_rx))
}

/// Performs one quote request and forwards the outcome.
///
/// Returns `Err` only when the event channel is closed.
async fn fetch_one(
    client: &reqwest::Client,
    endpoint: &str,
    evt_tx: &mpsc::Sender<QuoteEvent>,
) -> Result<(), mpsc::error::SendError<QuoteEvent>> {
    let response = match client.post(endpoint).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!(error = %e, "quote request failed");
            return evt_tx.send(QuoteEvent::Failed(QUOTE_ERROR_MESSAGE.to_string())).await;
        }
    };

    let status = response.status();
    if is_json(&response) {
        // Complete-string variant: one envelope, quote or error.
        let event = match response.json::<QuoteResponse>().await {
            Ok(envelope) => match envelope.into_quote() {
                Ok(quote) => QuoteEvent::Quote(quote),
                Err(error) => QuoteEvent::Failed(error),
            },
            Err(e) => {
                tracing::warn!(error = %e, %status, "unparsable quote envelope");
                QuoteEvent::Failed(QUOTE_ERROR_MESSAGE.to_string())
            }
        };
        return evt_tx.send(event).await;
    }

    // Incremental variant: forward raw fragments until the stream closes.
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        match chunk {
            Ok(bytes) => {
                let fragment = String::from_utf8_lossy(&bytes).into_owned();
                evt_tx.send(QuoteEvent::Fragment(fragment)).await?;
            }
            Err(e) => {
                tracing::warn!(error = %e, "quote stream broke mid-response");
                return evt_tx.send(QuoteEvent::Failed(QUOTE_ERROR_MESSAGE.to_string())).await;
            }
        }
    }
    evt_tx.send(QuoteEvent::Done).await
}

/// Whether the response declared a JSON body.
fn is_json(response: &reqwest::Response) -> bool {
    response
        .headers()
        .get(reqwest::header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"))
}
