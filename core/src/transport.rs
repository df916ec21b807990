//! Creation of the long-lived HTTP client behind a connection.
//!
//! # Design
//! A connection asks its `TransportFactory` for exactly one
//! `reqwest::Client` at construction and reuses it for every call.
//! `reqwest::Client` is reference-counted internally and safe to share
//! between concurrent requests.
//!
//! Certificate validation is strict unless the caller explicitly opts into
//! `CertificatePolicy::AcceptInvalid`. Accepting invalid certificates
//! disables protection against man-in-the-middle attacks; only use it for
//! development servers with self-signed certificates.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};

use crate::error::ApiError;

/// How server certificates are validated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CertificatePolicy {
    /// Validate against the platform/webpki roots.
    #[default]
    Strict,
    /// Accept any certificate, including expired and self-signed ones.
    AcceptInvalid,
}

/// Builds the client a connection dispatches through.
pub trait TransportFactory: Send + Sync {
    fn create(&self) -> Result<reqwest::Client, ApiError>;
}

/// Client with `Accept: application/json` on every request and the chosen
/// certificate policy.
#[derive(Debug, Clone, Default)]
pub struct DefaultTransportFactory {
    certificates: CertificatePolicy,
}

impl DefaultTransportFactory {
    pub fn new(certificates: CertificatePolicy) -> Self {
        Self { certificates }
    }

    pub fn certificates(&self) -> CertificatePolicy {
        self.certificates
    }
}

impl TransportFactory for DefaultTransportFactory {
    fn create(&self) -> Result<reqwest::Client, ApiError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));

        let accept_invalid = self.certificates == CertificatePolicy::AcceptInvalid;
        if accept_invalid {
            tracing::warn!("TLS certificate validation is disabled for this connection");
        }

        reqwest::Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(accept_invalid)
            .build()
            .map_err(|e| ApiError::Build(e.to_string()))
    }
}
