//! Errors raised by the text-generation backends.

use thiserror::Error;

/// Errors that can occur when calling the text-generation service.
#[derive(Error, Debug)]
pub enum RemoteCallError {
    /// Network, TLS, timeout or body decoding failure.
    #[error("network error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("service returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The service answered 2xx but the payload had no generated text.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Credentials were missing or unparseable.
    #[error("credentials error: {0}")]
    Credentials(String),

    /// Any other provider-side failure.
    #[error("{0}")]
    Provider(String),
}

impl RemoteCallError {
    /// Returns true if retrying the same request could plausibly succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            RemoteCallError::Http(e) => e.is_timeout() || e.is_connect(),
            RemoteCallError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
