//! Quote service core: shared state, upstream client, and the HTTP route.
//!
//! The service accepts `POST /api/quote` with no payload, asks an
//! OpenAI-compatible chat-completions upstream for one motivational quote,
//! and answers with the [`QuoteResponse`] envelope. Failures never leak
//! upstream details: the client receives the fixed error sentinel and the
//! specifics go to the log. A per-day counter caps how many generations
//! are served.

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use focusdeck_model::quote::QuoteResponse;

use crate::config::QuotedConfig;

/// Prompt sent to the upstream for every request.
const QUOTE_PROMPT: &str =
    "Generate a concise motivational quote (\u{2264}300 chars). Format: 'quote'. Return only one quote. ";

/// Errors from the upstream completion call.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The HTTP request itself failed.
    #[error("upstream request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The upstream answered with a non-success status.
    #[error("upstream returned status {0}")]
    BadStatus(StatusCode),

    /// The completion carried no usable text.
    #[error("upstream returned no completion text")]
    Empty,
}

// ---------------------------------------------------------------------------
// OpenAI-compatible chat-completions wire types (request subset)
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletion {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

// ---------------------------------------------------------------------------
// Daily quota
// ---------------------------------------------------------------------------

/// Rolling per-day request counter.
#[derive(Debug)]
pub struct DailyQuota {
    day: NaiveDate,
    used: u32,
    cap: u32,
}

impl DailyQuota {
    /// Creates a quota starting fresh on `day`.
    #[must_use]
    pub const fn new(day: NaiveDate, cap: u32) -> Self {
        Self { day, used: 0, cap }
    }

    /// Consumes one request if the cap allows it. The counter resets when
    /// `today` rolls past the stored day.
    pub fn try_consume(&mut self, today: NaiveDate) -> bool {
        if today != self.day {
            self.day = today;
            self.used = 0;
        }
        if self.used >= self.cap {
            return false;
        }
        self.used += 1;
        true
    }

    /// Requests consumed on the current day.
    #[must_use]
    pub const fn used(&self) -> u32 {
        self.used
    }
}

// ---------------------------------------------------------------------------
// Service state and routes
// ---------------------------------------------------------------------------

/// Shared service state: upstream client, upstream parameters, quota.
pub struct ServiceState {
    client: reqwest::Client,
    upstream_url: String,
    model: String,
    api_key: Option<String>,
    quota: Mutex<DailyQuota>,
}

impl ServiceState {
    /// Builds the state from a resolved configuration.
    ///
    /// # Errors
    ///
    /// Returns [`UpstreamError::Http`] if the HTTP client cannot be built.
    pub fn from_config(config: &QuotedConfig) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;
        Ok(Self {
            client,
            upstream_url: config.upstream_url.clone(),
            model: config.model.clone(),
            api_key: config.api_key.clone(),
            quota: Mutex::new(DailyQuota::new(Utc::now().date_naive(), config.daily_cap)),
        })
    }

    /// Asks the upstream for one quote and returns the trimmed text.
    async fn generate(&self) -> Result<String, UpstreamError> {
        let body = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: "You are a helpful assistant.".to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: QUOTE_PROMPT.to_string(),
                },
            ],
            temperature: 0.99,
        };

        let mut request = self.client.post(&self.upstream_url).json(&body);
        if let Some(key) = &self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(UpstreamError::BadStatus(response.status()));
        }

        let completion: ChatCompletion = response.json().await?;
        completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty())
            .ok_or(UpstreamError::Empty)
    }
}

/// `POST /api/quote` — no request payload.
async fn generate_quote(
    State(state): State<Arc<ServiceState>>,
) -> (StatusCode, Json<QuoteResponse>) {
    let allowed = state.quota.lock().await.try_consume(Utc::now().date_naive());
    if !allowed {
        tracing::warn!("daily quote cap reached");
        return (StatusCode::TOO_MANY_REQUESTS, Json(QuoteResponse::failed()));
    }

    match state.generate().await {
        Ok(quote) => {
            tracing::info!(len = quote.len(), "generated quote");
            (StatusCode::OK, Json(QuoteResponse::ok(quote)))
        }
        Err(e) => {
            tracing::error!(error = %e, "quote generation failed");
            (StatusCode::INTERNAL_SERVER_ERROR, Json(QuoteResponse::failed()))
        }
    }
}

/// Builds the service router.
#[must_use]
pub fn router(state: Arc<ServiceState>) -> Router {
    Router::new()
        .route("/api/quote", post(generate_quote))
        .with_state(state)
}

/// Binds `addr` and serves the quote routes on a background task.
///
/// Returns the bound address (useful with port 0) and the server task
/// handle.
///
/// # Errors
///
/// Returns an error if the address cannot be bound.
pub async fn start_server(
    addr: &str,
    state: Arc<ServiceState>,
) -> io::Result<(SocketAddr, JoinHandle<()>)> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let bound_addr = listener.local_addr()?;
    let handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            tracing::error!(error = %e, "quote server stopped");
        }
    });
    Ok((bound_addr, handle))
}
