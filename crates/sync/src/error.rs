//! Error types for the sync crate.

use thiserror::Error;

/// Result type alias for sync operations.
pub type Result<T> = std::result::Result<T, SyncError>;

/// Errors that can occur while talking to the remote store.
#[derive(Debug, Error)]
pub enum SyncError {
    /// HTTP transport error (connection refused, timeout, DNS, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Non-success HTTP response from the remote store.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// 401 from the server: the bearer credential is no longer valid.
    /// A missing credential never gets this far - the engine short-circuits
    /// with a `NoCredential` outcome before any network call.
    #[error("Session expired, please sign in again")]
    Unauthorized,

    /// Login/registration rejected by the server.
    #[error("Authentication failed ({code}): {}", messages.join("; "))]
    Auth { code: String, messages: Vec<String> },
}

impl SyncError {
    /// Create an API error from status and message.
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            status,
            message: message.into(),
        }
    }

    /// Whether another attempt may succeed: transport failures, 429, and
    /// 5xx. 401 and the remaining 4xx are final.
    pub fn is_retryable(&self) -> bool {
        match self {
            SyncError::Http(_) => true,
            SyncError::Api { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}

impl From<SyncError> for moneta_core::Error {
    fn from(err: SyncError) -> Self {
        moneta_core::Error::Sync(err.to_string())
    }
}
