//! Normalized request view consumed by the engine.
//!
//! Framework adapters live outside this crate. Whatever the server
//! stack, the adapter flattens its request type into this record and
//! nothing else crosses the boundary. Serde support is for adapters
//! that ship requests across process or queue boundaries.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// One inbound request, reduced to what identifier processing reads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestView {
    /// Raw `Host` header value; may still carry scheme, port, or
    /// IPv6 brackets.
    pub host: String,
    /// Decoded query parameters.
    #[serde(default)]
    pub query_params: HashMap<String, String>,
    /// Decoded request cookies.
    #[serde(default)]
    pub cookies: HashMap<String, String>,
    /// Raw `Referer` header value, if one was sent.
    #[serde(default)]
    pub referer: Option<String>,
}

impl RequestView {
    /// Start a view for `host`; chain the other setters as needed.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            ..Self::default()
        }
    }

    /// Add one decoded query parameter.
    pub fn query_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query_params.insert(name.into(), value.into());
        self
    }

    /// Add one decoded request cookie.
    pub fn cookie(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.cookies.insert(name.into(), value.into());
        self
    }

    /// Set the referer value.
    pub fn referer(mut self, referer: impl Into<String>) -> Self {
        self.referer = Some(referer.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builds_incrementally() {
        let view = RequestView::new("shop.example.com")
            .query_param("fbclid", "abc")
            .cookie("_fbp", "fb.1.123.456")
            .referer("https://example.com/landing");
        assert_eq!(view.host, "shop.example.com");
        assert_eq!(view.query_params.get("fbclid").map(String::as_str), Some("abc"));
        assert_eq!(view.cookies.get("_fbp").map(String::as_str), Some("fb.1.123.456"));
        assert_eq!(view.referer.as_deref(), Some("https://example.com/landing"));
    }

    #[test]
    fn test_optional_fields_default_empty() {
        let view = RequestView::new("example.com");
        assert!(view.query_params.is_empty());
        assert!(view.cookies.is_empty());
        assert!(view.referer.is_none());
    }
}
