//! JSON encoding of request payloads and decoding of response bodies.
//!
//! # Design
//! `decode` treats a missing, blank or `null` body as "no content" and
//! returns `T::default()`. Malformed JSON is still an error. Callers must accept a
//! default value as a valid outcome.

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::error::ApiError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Most bytes of a non-2xx body kept in `ApiError::Http`.
pub const ERROR_BODY_LIMIT: usize = 4 * 1024;

/// Serialize any value to JSON text.
pub fn encode<B: Serialize + ?Sized>(value: &B) -> Result<String, ApiError> {
    serde_json::to_string(value).map_err(|e| ApiError::Serialization(e.to_string()))
}

/// Deserialize a JSON body into `T`.
///
/// `None`, empty, whitespace-only and `null` bodies yield `T::default()`. A
/// leading UTF-8 byte order mark is skipped.
pub fn decode<T: DeserializeOwned + Default>(body: Option<&[u8]>) -> Result<T, ApiError> {
    let bytes = body.unwrap_or_default();
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes).trim_ascii();
    if bytes.is_empty() || bytes == b"null" {
        tracing::trace!("empty response body, using default value");
        return Ok(T::default());
    }
    serde_json::from_slice(bytes).map_err(|e| ApiError::Deserialization(e.to_string()))
}

/// Read a response body chunk by chunk, stopping with `Cancelled` as soon as
/// `cancel` fires.
pub async fn read_body(
    response: reqwest::Response,
    cancel: &CancellationToken,
) -> Result<Vec<u8>, ApiError> {
    read_body_limited(response, cancel, usize::MAX).await
}

/// Like `read_body`, but stops reading once `limit` bytes have arrived and
/// drops anything past it.
pub async fn read_body_limited(
    mut response: reqwest::Response,
    cancel: &CancellationToken,
    limit: usize,
) -> Result<Vec<u8>, ApiError> {
    let mut body = Vec::new();
    while body.len() < limit {
        let chunk = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ApiError::Cancelled),
            chunk = response.chunk() => chunk?,
        };
        match chunk {
            Some(bytes) => {
                let take = bytes.len().min(limit - body.len());
                body.extend_from_slice(&bytes[..take]);
            }
            None => return Ok(body),
        }
    }
    Ok(body)
}
