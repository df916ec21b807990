//! Per-call header mapping and query-string helpers.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Display;

/// Extra headers attached to a single request.
///
/// Keys are unique; inserting an existing key replaces its value. Iteration
/// is in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers(BTreeMap<String, String>);

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert: `Headers::new().with_pair("x-trace", "1")`.
    pub fn with_pair(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl From<HashMap<String, String>> for Headers {
    fn from(map: HashMap<String, String>) -> Self {
        Self(map.into_iter().collect())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Headers {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Append `name=value` to an action's query string.
///
/// The first parameter is joined with `?`, later ones with `&`. Values are
/// written with their `Display` form and are not percent-encoded.
pub fn add_parameter(action: &str, name: &str, value: impl Display) -> String {
    let separator = if action.contains('?') { '&' } else { '?' };
    format!("{action}{separator}{name}={value}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_pair_chains() {
        let headers = Headers::new().with_pair("a", "1").with_pair("b", "2");
        assert_eq!(headers.len(), 2);
        assert_eq!(headers.get("a"), Some("1"));
        assert_eq!(headers.get("b"), Some("2"));
    }

    #[test]
    fn duplicate_key_replaces_value() {
        let mut headers = Headers::new().with_pair("a", "1");
        let previous = headers.insert("a", "2");
        assert_eq!(previous.as_deref(), Some("1"));
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("a"), Some("2"));
    }

    #[test]
    fn from_hash_map() {
        let mut map = HashMap::new();
        map.insert("x-api-key".to_string(), "secret".to_string());
        let headers = Headers::from(map);
        assert_eq!(headers.get("x-api-key"), Some("secret"));
    }

    #[test]
    fn add_parameter_uses_question_mark_first() {
        let action = add_parameter("Values", "page", 2);
        assert_eq!(action, "Values?page=2");
        let action = add_parameter(&action, "active", true);
        assert_eq!(action, "Values?page=2&active=true");
        let action = add_parameter(&action, "name", "bob");
        assert_eq!(action, "Values?page=2&active=true&name=bob");
    }
}
