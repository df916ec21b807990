//! Error types for `JsonConnection`.
//!
//! # Design
//! `Cancelled` gets a dedicated variant so callers can tell "I stopped it"
//! apart from "it broke." Non-2xx responses land in `Http` with the raw
//! status code and body for debugging. An empty response body is not an
//! error at all; see `codec::decode`.

use thiserror::Error;

/// Errors returned by `JsonConnection::get` and `JsonConnection::post`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The resolved address, prefix and action did not form a valid URI.
    #[error("invalid URI {0}")]
    InvalidUri(String),

    /// DNS, connection or TLS failure before a response arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The caller cancelled the request.
    #[error("request cancelled")]
    Cancelled,

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The HTTP client or a request (e.g. an invalid header value) could not
    /// be constructed.
    #[error("build failed: {0}")]
    Build(String),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_builder() {
            ApiError::Build(err.to_string())
        } else if let Some(status) = err.status() {
            ApiError::Http {
                status: status.as_u16(),
                body: err.to_string(),
            }
        } else {
            ApiError::Transport(err.to_string())
        }
    }
}
