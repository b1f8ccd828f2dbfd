//! Error types for the client library.

use serde::Deserialize;
use thiserror::Error;

/// Structured error payload returned by the GigaChat endpoints.
///
/// Both the token endpoint and the API endpoints report failures as a JSON
/// object whose `error` field carries the interesting message
/// (e.g. `{"error": "invalid_client"}`).
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// The error message text.
    pub error: String,
}

/// Errors that can occur when interacting with the GigaChat API.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ClientError {
    /// Token acquisition failed.
    ///
    /// Bad credentials, a network failure on the token call, or a non-2xx
    /// response from the token endpoint. Carries the upstream payload's
    /// error message when one was present, the transport message otherwise.
    #[error("{0}")]
    Auth(String),

    /// Network or HTTP request failure on a business call.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The remote service returned a structured error payload.
    #[error("{0}")]
    Upstream(String),

    /// Response JSON could not be decoded into the expected shape.
    #[error("decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// The response decoded but was missing required data.
    #[error("invalid response: {0}")]
    InvalidResponse(String),

    /// Client configuration issue, caught before any request is made.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Failure that carried no recognizable payload or transport detail.
    #[error("unknown error")]
    Unknown,
}

impl ClientError {
    /// Collapses a caught failure into the single error contract callers see.
    ///
    /// Upstream payload messages are preferred; a bare transport failure
    /// keeps its transport message; anything else degrades to [`Self::Unknown`].
    /// Every business operation routes its failures through here, so the
    /// variant a caller matches on does not depend on which operation failed.
    #[must_use]
    pub fn normalize(self) -> Self {
        match self {
            err @ (Self::Auth(_) | Self::Upstream(_) | Self::Configuration(_)) => err,
            Self::Network(err) => Self::Upstream(err.to_string()),
            Self::Decode(_) | Self::InvalidResponse(_) | Self::Unknown => Self::Unknown,
        }
    }

    /// Check if this is a token-acquisition error.
    #[must_use]
    pub const fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}

/// Extracts the caller-facing message from a non-2xx response body.
///
/// Prefers the structured payload's `error` field; falls back to the raw
/// body text, then to a status-line message for empty bodies.
pub(crate) fn upstream_message(status: reqwest::StatusCode, body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(payload) => payload.error,
        Err(_) if body.is_empty() => format!("upstream returned {status}"),
        Err(_) => body.to_string(),
    }
}
