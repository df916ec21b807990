//! Turns an action name into a full request URI.

use crate::config::ConnectionConfig;

/// Computes the URI for an action.
///
/// Swap in a custom resolver through `JsonConnection::builder` to route
/// actions differently (versioned paths, per-action hosts, ...).
pub trait UriResolver: Send + Sync {
    fn resolve(&self, config: &ConnectionConfig, action: &str) -> String;
}

/// Resolver implementing the default scheme/prefix/separator rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultUriResolver;

impl UriResolver for DefaultUriResolver {
    fn resolve(&self, config: &ConnectionConfig, action: &str) -> String {
        resolve_uri(config, action)
    }
}

/// Build `{scheme}{address}[/{prefix}]/{action}`.
///
/// An address that already starts with `http` is used as is. Nothing is
/// validated here; a malformed result fails when the request is dispatched.
pub fn resolve_uri(config: &ConnectionConfig, action: &str) -> String {
    let mut uri = base_url(&config.address, config.is_secure);
    if let Some(prefix) = config.prefix.as_deref().filter(|p| !p.is_empty()) {
        uri.push('/');
        uri.push_str(prefix);
    }
    if !action.starts_with('/') {
        uri.push('/');
    }
    uri.push_str(action);
    uri
}

fn base_url(address: &str, is_secure: bool) -> String {
    if address.starts_with("http") {
        address.to_string()
    } else if is_secure {
        format!("https://{address}")
    } else {
        format!("http://{address}")
    }
}
