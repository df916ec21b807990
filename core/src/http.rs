//! HTTP request types and the request-construction hook.
//!
//! # Design
//! Requests are described as plain data. A `RequestFactory` produces an
//! `HttpRequest` from the method, resolved URI and per-call headers; the
//! connection then converts it into a `reqwest::Request` and sends it. This
//! keeps construction deterministic and testable without a network.

use uuid::Uuid;

use crate::headers::Headers;

pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// HTTP method for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// An HTTP request described as plain data.
///
/// Built fresh for every call and never reused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub uri: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Attach a JSON payload and its content type, replacing any content type
    /// the caller supplied.
    pub fn with_json_body(mut self, body: String) -> Self {
        self.headers
            .retain(|(k, _)| !k.eq_ignore_ascii_case("content-type"));
        self.headers
            .push(("content-type".to_string(), JSON_CONTENT_TYPE.to_string()));
        self.body = Some(body);
        self
    }
}

/// Creates the request for a call.
///
/// Implement this to add authentication headers, tracing IDs and the like
/// without touching dispatch.
pub trait RequestFactory: Send + Sync {
    fn build(&self, method: HttpMethod, uri: &str, headers: Option<&Headers>) -> HttpRequest;
}

/// Copies every per-call header onto the request.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultRequestFactory;

impl RequestFactory for DefaultRequestFactory {
    fn build(&self, method: HttpMethod, uri: &str, headers: Option<&Headers>) -> HttpRequest {
        HttpRequest {
            method,
            uri: uri.to_string(),
            headers: headers
                .map(|h| h.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect())
                .unwrap_or_default(),
            body: None,
        }
    }
}

/// Wraps another factory and tags every request with a fresh
/// `x-request-id`, unless the caller already supplied one.
#[derive(Debug, Clone, Default)]
pub struct RequestIdFactory<F = DefaultRequestFactory> {
    inner: F,
}

impl<F: RequestFactory> RequestIdFactory<F> {
    pub fn new(inner: F) -> Self {
        Self { inner }
    }
}

impl<F: RequestFactory> RequestFactory for RequestIdFactory<F> {
    fn build(&self, method: HttpMethod, uri: &str, headers: Option<&Headers>) -> HttpRequest {
        let mut request = self.inner.build(method, uri, headers);
        let present = request
            .headers
            .iter()
            .any(|(k, _)| k.eq_ignore_ascii_case(REQUEST_ID_HEADER));
        if !present {
            request
                .headers
                .push((REQUEST_ID_HEADER.to_string(), Uuid::new_v4().to_string()));
        }
        request
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const URI: &str = "http://localhost:3000/api/Values";

    #[test]
    fn default_factory_without_headers() {
        let req = DefaultRequestFactory.build(HttpMethod::Get, URI, None);
        assert_eq!(req.method, HttpMethod::Get);
        assert_eq!(req.uri, URI);
        assert!(req.headers.is_empty());
        assert!(req.body.is_none());
    }

    #[test]
    fn default_factory_with_empty_headers() {
        let headers = Headers::new();
        let req = DefaultRequestFactory.build(HttpMethod::Post, URI, Some(&headers));
        assert!(req.headers.is_empty());
    }

    #[test]
    fn default_factory_copies_headers_in_order() {
        let headers = Headers::new().with_pair("b", "2").with_pair("a", "1");
        let req = DefaultRequestFactory.build(HttpMethod::Get, URI, Some(&headers));
        assert_eq!(
            req.headers,
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2".to_string()),
            ]
        );
    }

    #[test]
    fn with_json_body_sets_content_type() {
        let req = DefaultRequestFactory
            .build(HttpMethod::Post, URI, None)
            .with_json_body(r#""hello""#.to_string());
        assert_eq!(req.body.as_deref(), Some(r#""hello""#));
        assert_eq!(
            req.headers,
            vec![("content-type".to_string(), JSON_CONTENT_TYPE.to_string())]
        );
    }

    #[test]
    fn with_json_body_replaces_caller_content_type() {
        let headers = Headers::new()
            .with_pair("Content-Type", "application/json")
            .with_pair("x-tenant", "acme");
        let req = DefaultRequestFactory
            .build(HttpMethod::Post, URI, Some(&headers))
            .with_json_body("1".to_string());
        assert_eq!(
            req.headers,
            vec![
                ("x-tenant".to_string(), "acme".to_string()),
                ("content-type".to_string(), JSON_CONTENT_TYPE.to_string()),
            ]
        );
    }

    #[test]
    fn request_id_factory_adds_uuid() {
        let req = RequestIdFactory::new(DefaultRequestFactory).build(HttpMethod::Get, URI, None);
        let (_, id) = req
            .headers
            .iter()
            .find(|(k, _)| k == REQUEST_ID_HEADER)
            .expect("request id header");
        assert!(Uuid::parse_str(id).is_ok());
    }

    #[test]
    fn request_id_factory_keeps_caller_id() {
        let headers = Headers::new().with_pair("X-Request-Id", "abc");
        let req = RequestIdFactory::new(DefaultRequestFactory).build(HttpMethod::Get, URI, Some(&headers));
        assert_eq!(req.headers, vec![("X-Request-Id".to_string(), "abc".to_string())]);
    }
}
