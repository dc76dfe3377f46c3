//! Koleo client error types.

/// Errors from the Koleo HTTP client.
#[derive(Debug, thiserror::Error)]
pub enum KoleoError {
    /// HTTP request failed (network error, timeout, etc.)
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned a non-2xx status, or a syntactically empty body
    /// (reported as status 404: an empty 2xx is treated as "not found")
    #[error("Koleo API error {status}: {body}")]
    Api { status: u16, body: String },

    /// Failed to decode a response into the expected shape
    #[error("JSON decode error: {message}")]
    Json { message: String },
}

impl KoleoError {
    /// Build the canonical "empty response" error.
    pub(crate) fn empty_response() -> Self {
        KoleoError::Api {
            status: 404,
            body: "empty response".to_string(),
        }
    }

    /// The HTTP status, when this error carries one.
    pub fn status(&self) -> Option<u16> {
        match self {
            KoleoError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}
