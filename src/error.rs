//! Unified SDK error types.

use thiserror::Error;

/// Top-level tracker error.
///
/// Only the persistence write path can surface here — acquisition is total
/// (the fallback chain always yields a record) and read-path corruption is
/// absorbed as an empty history.
#[derive(Error, Debug)]
pub enum TrackerError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// HTTP-layer errors.
///
/// Used inside provider adapters only; normalized to [`Unavailable`] at the
/// adapter boundary and never observed by the fallback chain.
#[derive(Error, Debug)]
pub enum HttpError {
    #[error("request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("timeout")]
    Timeout,
}

/// Why a provider adapter could not produce a rate record.
///
/// This is the adapter's entire failure surface — a hard contract: nothing
/// else escapes `fetch()`. The fallback chain absorbs every variant.
#[derive(Error, Debug)]
pub enum Unavailable {
    /// Required API key absent — the adapter skips without a network call.
    #[error("credential not configured")]
    CredentialMissing,

    /// Transport failure: connect error, timeout, or non-success status.
    #[error("transport failure: {0}")]
    Transport(String),

    /// Response parsed but failed schema validation (success flag false,
    /// expected fields missing).
    #[error("invalid response schema: {0}")]
    Schema(String),
}

impl From<HttpError> for Unavailable {
    fn from(e: HttpError) -> Self {
        match e {
            // A body that fails to decode is a malformed response, not a
            // transport problem.
            HttpError::Reqwest(re) if re.is_decode() => Unavailable::Schema(re.to_string()),
            HttpError::Reqwest(re) if re.is_timeout() => {
                Unavailable::Transport("timeout".to_string())
            }
            other => Unavailable::Transport(other.to_string()),
        }
    }
}

/// Persistence errors (write path).
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialize error: {0}")]
    Serialize(#[source] serde_json::Error),
}
