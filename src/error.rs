use thiserror::Error;

/// Shown when a request fails below the HTTP layer and there is no
/// backend message to surface.
pub const GENERIC_FAILURE: &str = "Search request failed. Please try again.";

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("HTTP {status} {reason} – {}", body_or_default(.body))]
    Http {
        status: u16,
        reason: String,
        body: String,
    },

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("invalid backend url: {0}")]
    InvalidUrl(String),
}

fn body_or_default(body: &str) -> &str {
    if body.is_empty() { "Request failed" } else { body }
}

impl BackendError {
    /// Text for the user-facing error banner.
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Http { .. } => self.to_string(),
            _ => GENERIC_FAILURE.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            BackendError::Http { status, .. } => Some(*status),
            BackendError::Network(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidNumber { key: &'static str, value: String },

    #[error("invalid value for {key}: {reason}")]
    OutOfRange { key: &'static str, reason: String },
}
