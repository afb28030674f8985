//! Wire types for the motivational quote service.
//!
//! The quote endpoint takes no request payload and answers with a JSON
//! envelope carrying either the generated quote or an error message, never
//! both. Streaming responses bypass this envelope entirely and deliver raw
//! text fragments until the stream closes.

use serde::{Deserialize, Serialize};

/// Fixed error text returned when quote generation fails.
///
/// The client substitutes this sentinel for the quote body, so the exact
/// string is part of the interface.
pub const QUOTE_ERROR_MESSAGE: &str = "Error generating quote";

/// Response envelope for `POST /api/quote`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QuoteResponse {
    /// The generated quote, present on success.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<String>,
    /// Error message, present on failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QuoteResponse {
    /// Builds a success envelope.
    #[must_use]
    pub const fn ok(quote: String) -> Self {
        Self {
            quote: Some(quote),
            error: None,
        }
    }

    /// Builds a failure envelope carrying the fixed error sentinel.
    #[must_use]
    pub fn failed() -> Self {
        Self {
            quote: None,
            error: Some(QUOTE_ERROR_MESSAGE.to_string()),
        }
    }

    /// Extracts the quote text, treating a missing quote as a failure.
    #[must_use]
    pub fn into_quote(self) -> Result<String, String> {
        match (self.quote, self.error) {
            (Some(quote), _) => Ok(quote),
            (None, Some(error)) => Err(error),
            (None, None) => Err(QUOTE_ERROR_MESSAGE.to_string()),
        }
    }
}
