//! Connection settings shared by every request made through a connection.

use serde::Deserialize;

const ADDRESS_VAR: &str = "JSON_CONNECTION_ADDRESS";
const PREFIX_VAR: &str = "JSON_CONNECTION_PREFIX";
const SECURE_VAR: &str = "JSON_CONNECTION_SECURE";

/// Where requests go.
///
/// `address` may be a bare host (`example.com:8080`) or a full URL. When it
/// has no scheme, `is_secure` selects between `https://` and `http://`.
/// `prefix` is a path segment inserted between the host and every action.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ConnectionConfig {
    pub address: String,
    #[serde(default)]
    pub prefix: Option<String>,
    #[serde(default)]
    pub is_secure: bool,
}

impl ConnectionConfig {
    pub fn new(address: &str) -> Self {
        Self {
            address: address.to_string(),
            prefix: None,
            is_secure: false,
        }
    }

    pub fn with_prefix(address: &str, prefix: &str) -> Self {
        Self {
            prefix: Some(prefix.to_string()),
            ..Self::new(address)
        }
    }

    pub fn secure(mut self, is_secure: bool) -> Self {
        self.is_secure = is_secure;
        self
    }

    /// Read settings from `JSON_CONNECTION_ADDRESS`, `JSON_CONNECTION_PREFIX`
    /// and `JSON_CONNECTION_SECURE`. Missing variables fall back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let is_secure = lookup(SECURE_VAR)
            .map(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);
        Self {
            address: lookup(ADDRESS_VAR).unwrap_or_default(),
            prefix: lookup(PREFIX_VAR).filter(|p| !p.is_empty()),
            is_secure,
        }
    }
}
