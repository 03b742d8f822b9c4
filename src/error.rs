//! Error types for room transformations.

use std::time::Duration;

use crate::renovation::ValidationError;

/// Longest upstream error message passed through to users.
const MAX_ERROR_MESSAGE_LEN: usize = 300;

/// Errors that can occur while transforming a room photo.
#[derive(Debug, thiserror::Error)]
pub enum RoomVizError {
    /// Required configuration (the API credential) is missing.
    #[error("{0}")]
    Config(String),

    /// The upload or the selected options were rejected.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// API key rejected by the provider.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Rate limit exceeded. Reported, never retried.
    #[error("rate limited{}", retry_hint(.retry_after))]
    RateLimited { retry_after: Option<Duration> },

    /// Content was blocked by safety filters.
    #[error("content blocked: {0}")]
    ContentBlocked(String),

    /// Invalid request parameters.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The model answered without any inline image data.
    #[error("Model did not return an image.")]
    NoImage,

    /// The response did not have the expected shape.
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),

    /// Network or HTTP error.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to decode base64 data.
    #[error("failed to decode: {0}")]
    Decode(String),

    /// I/O error (e.g., reading an input file).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse classification used for status codes and reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorKind {
    /// Missing credential; never retried, surfaced verbatim.
    Configuration,
    /// Bad file type, oversized or missing file, unknown option.
    Validation,
    /// The external model call failed or returned nothing usable.
    Upstream,
}

impl RoomVizError {
    /// Returns the taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Config(_) => ErrorKind::Configuration,
            Self::Validation(_) => ErrorKind::Validation,
            _ => ErrorKind::Upstream,
        }
    }
}

/// Result type alias for room transformation operations.
pub type Result<T> = std::result::Result<T, RoomVizError>;

/// Extracts a readable message from a provider error body.
///
/// Google-style bodies look like `{"error": {"message": "..."}}`; anything
/// else is passed through trimmed. Long bodies are truncated.
pub(crate) fn sanitize_error_message(text: &str) -> String {
    let extracted = serde_json::from_str::<serde_json::Value>(text)
        .ok()
        .and_then(|v| {
            v.pointer("/error/message")
                .and_then(|m| m.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| text.trim().to_string());

    if extracted.is_empty() {
        return "no error details provided".into();
    }

    if extracted.chars().count() > MAX_ERROR_MESSAGE_LEN {
        let truncated: String = extracted.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
        return format!("{truncated}...");
    }
    extracted
}

fn retry_hint(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(wait) => format!(", retry after {} seconds", wait.as_secs()),
        None => String::new(),
    }
}

/// Parses the `Retry-After` header as whole seconds.
pub(crate) fn parse_retry_after(headers: &reqwest::header::HeaderMap) -> Option<u64> {
    headers
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse().ok())
}
