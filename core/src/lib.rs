//! Asynchronous generic JSON client.
//!
//! # Overview
//! Resolves an action name against a configured address, builds the request
//! with optional per-call headers, sends a JSON body (for POST), and decodes
//! the JSON response into any `T: DeserializeOwned + Default`.
//!
//! # Design
//! - `JsonConnection` owns exactly one `reqwest::Client`, created once by a
//!   `TransportFactory` and shared by every call (and every clone).
//! - URI resolution (`UriResolver`), request construction (`RequestFactory`)
//!   and transport creation (`TransportFactory`) are injectable hooks with
//!   defaults; see `JsonConnection::builder`.
//! - Each call takes its own `CancellationToken`; there is no internal
//!   timeout or retry.
//! - An empty response body decodes to `T::default()` rather than an error.
//! - TLS certificates are validated unless `CertificatePolicy::AcceptInvalid`
//!   is chosen explicitly.

pub mod client;
pub mod codec;
pub mod config;
pub mod error;
pub mod headers;
pub mod http;
pub mod resolver;
pub mod transport;

pub use client::{JsonConnection, JsonConnectionBuilder};
pub use config::ConnectionConfig;
pub use error::ApiError;
pub use headers::{add_parameter, Headers};
pub use http::{DefaultRequestFactory, HttpMethod, HttpRequest, RequestFactory, RequestIdFactory};
pub use resolver::{resolve_uri, DefaultUriResolver, UriResolver};
pub use tokio_util::sync::CancellationToken;
pub use transport::{CertificatePolicy, DefaultTransportFactory, TransportFactory};
