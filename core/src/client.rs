//! Generic JSON client over a single long-lived HTTP transport.
//!
//! # Design
//! `JsonConnection` holds the connection settings, one `reqwest::Client` and
//! three hooks: a `UriResolver`, a `RequestFactory` and the
//! `TransportFactory` used once at construction. Every `get`/`post` call is
//! one independent pass: resolve, build, [encode], send, await headers,
//! stream the body, decode. The per-call `CancellationToken` is raced against
//! every await point.

use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio_util::sync::CancellationToken;

use crate::codec;
use crate::config::ConnectionConfig;
use crate::error::ApiError;
use crate::headers::Headers;
use crate::http::{DefaultRequestFactory, HttpMethod, HttpRequest, RequestFactory};
use crate::resolver::{DefaultUriResolver, UriResolver};
use crate::transport::{DefaultTransportFactory, TransportFactory};

/// Asynchronous JSON client for one remote address.
///
/// Cloning is cheap and clones share the underlying transport.
#[derive(Clone)]
pub struct JsonConnection {
    config: ConnectionConfig,
    http: reqwest::Client,
    resolver: Arc<dyn UriResolver>,
    requests: Arc<dyn RequestFactory>,
}

impl std::fmt::Debug for JsonConnection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonConnection")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl JsonConnection {
    /// Connection to `address` with the default hooks.
    pub fn new(address: &str) -> Result<Self, ApiError> {
        Self::builder(ConnectionConfig::new(address)).build()
    }

    /// Connection to `address` with `prefix` inserted before every action.
    pub fn with_prefix(address: &str, prefix: &str) -> Result<Self, ApiError> {
        Self::builder(ConnectionConfig::with_prefix(address, prefix)).build()
    }

    pub fn builder(config: ConnectionConfig) -> JsonConnectionBuilder {
        JsonConnectionBuilder::new(config)
    }

    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    pub fn set_address(&mut self, address: &str) {
        self.config.address = address.to_string();
    }

    pub fn set_prefix(&mut self, prefix: Option<&str>) {
        self.config.prefix = prefix.map(str::to_string);
    }

    pub fn set_secure(&mut self, is_secure: bool) {
        self.config.is_secure = is_secure;
    }

    /// The URI a call to `action` would be sent to.
    pub fn resolve(&self, action: &str) -> String {
        self.resolver.resolve(&self.config, action)
    }

    /// GET `action` and decode the JSON response into `T`.
    ///
    /// An empty response body yields `T::default()`.
    pub async fn get<T>(
        &self,
        action: &str,
        cancel: &CancellationToken,
        headers: Option<&Headers>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        let uri = self.resolve(action);
        let request = self.requests.build(HttpMethod::Get, &uri, headers);
        self.execute(request, cancel).await
    }

    /// POST `value` as JSON to `action` and decode the JSON response into `T`.
    ///
    /// An empty response body yields `T::default()`.
    pub async fn post<T, B>(
        &self,
        action: &str,
        value: &B,
        cancel: &CancellationToken,
        headers: Option<&Headers>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
        B: Serialize + ?Sized,
    {
        let uri = self.resolve(action);
        let body = codec::encode(value)?;
        let request = self
            .requests
            .build(HttpMethod::Post, &uri, headers)
            .with_json_body(body);
        self.execute(request, cancel).await
    }

    async fn execute<T>(&self, request: HttpRequest, cancel: &CancellationToken) -> Result<T, ApiError>
    where
        T: DeserializeOwned + Default,
    {
        if cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }

        let method = request.method;
        let uri = request.uri.clone();
        let request = self.to_reqwest(request)?;

        tracing::debug!(?method, %uri, "sending request");
        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(ApiError::Cancelled),
            response = self.http.execute(request) => response?,
        };

        tracing::debug!(?method, %uri, status = response.status().as_u16(), "response headers received");
        let response = check_status(response, cancel).await?;
        let body = codec::read_body(response, cancel).await?;
        codec::decode(Some(body.as_slice()))
    }

    fn to_reqwest(&self, request: HttpRequest) -> Result<reqwest::Request, ApiError> {
        let url = reqwest::Url::parse(&request.uri)
            .map_err(|e| ApiError::InvalidUri(format!("{}: {e}", request.uri)))?;
        let mut builder = self.http.request(request.method.into(), url);
        for (key, value) in &request.headers {
            builder = builder.header(key.as_str(), value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }
        Ok(builder.build()?)
    }
}

/// Map non-success status codes to `ApiError::Http`, keeping at most
/// `ERROR_BODY_LIMIT` bytes of the body text for debugging.
async fn check_status(
    response: reqwest::Response,
    cancel: &CancellationToken,
) -> Result<reqwest::Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    tracing::warn!(status = status.as_u16(), url = %response.url(), "request failed");
    let body = codec::read_body_limited(response, cancel, codec::ERROR_BODY_LIMIT).await?;
    Err(ApiError::Http {
        status: status.as_u16(),
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

/// Configures a `JsonConnection` before its transport is created.
pub struct JsonConnectionBuilder {
    config: ConnectionConfig,
    transport: Box<dyn TransportFactory>,
    resolver: Arc<dyn UriResolver>,
    requests: Arc<dyn RequestFactory>,
}

impl JsonConnectionBuilder {
    fn new(config: ConnectionConfig) -> Self {
        Self {
            config,
            transport: Box::new(DefaultTransportFactory::default()),
            resolver: Arc::new(DefaultUriResolver),
            requests: Arc::new(DefaultRequestFactory),
        }
    }

    pub fn transport(mut self, factory: impl TransportFactory + 'static) -> Self {
        self.transport = Box::new(factory);
        self
    }

    pub fn resolver(mut self, resolver: impl UriResolver + 'static) -> Self {
        self.resolver = Arc::new(resolver);
        self
    }

    pub fn request_factory(mut self, factory: impl RequestFactory + 'static) -> Self {
        self.requests = Arc::new(factory);
        self
    }

    pub fn build(self) -> Result<JsonConnection, ApiError> {
        Ok(JsonConnection {
            http: self.transport.create()?,
            config: self.config,
            resolver: self.resolver,
            requests: self.requests,
        })
    }
}
