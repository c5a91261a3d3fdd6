// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Header tables and the incoming header map

use std::collections::BTreeMap;

use reqwest::header::HeaderMap;
use serde::{Deserialize, Serialize};

use super::names;

/// Headers a script is not allowed to set.
///
/// `user-agent` is banned by the platform but deliberately allowed here.
pub const FORBIDDEN_REQUEST_HEADERS: &[&str] = &[
    "accept-charset",
    "accept-encoding",
    "access-control-request-headers",
    "access-control-request-method",
    "connection",
    "content-length",
    "content-transfer-encoding",
    "cookie",
    "cookie2",
    "date",
    "expect",
    "host",
    "keep-alive",
    "origin",
    "referer",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
    "via",
];

/// Request methods `open()` refuses outright
pub const FORBIDDEN_REQUEST_METHODS: &[&str] = &["TRACE", "TRACK", "CONNECT"];

/// Statuses that trigger a redirect hop
pub const REDIRECT_STATUSES: &[u16] = &[301, 302, 303, 307];

/// Check a header name against the forbidden list (case-insensitive)
pub fn is_forbidden_header(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    FORBIDDEN_REQUEST_HEADERS.contains(&lower.as_str())
}

/// Check a method against the forbidden list (case-insensitive)
pub fn is_forbidden_method(method: &str) -> bool {
    let upper = method.to_ascii_uppercase();
    FORBIDDEN_REQUEST_METHODS.contains(&upper.as_str())
}

/// Check whether a status code starts a redirect hop
pub fn is_redirect_status(status: u16) -> bool {
    REDIRECT_STATUSES.contains(&status)
}

/// A response header value: one value, or every value of a repeated header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HeaderField {
    Single(String),
    Multiple(Vec<String>),
}

impl HeaderField {
    /// All values in arrival order
    pub fn values(&self) -> Vec<&str> {
        match self {
            HeaderField::Single(v) => vec![v.as_str()],
            HeaderField::Multiple(vs) => vs.iter().map(String::as_str).collect(),
        }
    }

    /// Values joined the way `getResponseHeader` exposes them
    pub fn joined(&self) -> String {
        match self {
            HeaderField::Single(v) => v.clone(),
            HeaderField::Multiple(vs) => vs.join(", "),
        }
    }

    fn push(&mut self, value: String) {
        match self {
            HeaderField::Single(first) => {
                *self = HeaderField::Multiple(vec![std::mem::take(first), value]);
            }
            HeaderField::Multiple(vs) => vs.push(value),
        }
    }
}

impl From<&str> for HeaderField {
    fn from(value: &str) -> Self {
        HeaderField::Single(value.to_string())
    }
}

impl From<String> for HeaderField {
    fn from(value: String) -> Self {
        HeaderField::Single(value)
    }
}

/// Response headers keyed by lower-cased name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IncomingHeaders {
    fields: BTreeMap<String, HeaderField>,
}

impl IncomingHeaders {
    /// Create an empty header map
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a reqwest header map.
    ///
    /// Repeated headers become [`HeaderField::Multiple`]; `set-cookie` is
    /// always a sequence, even with a single value.
    pub fn from_header_map(map: &HeaderMap) -> Self {
        let mut headers = Self::new();
        for (name, value) in map.iter() {
            let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
            headers.append(name.as_str(), value);
        }
        if let Some(field) = headers.fields.get_mut(names::SET_COOKIE) {
            if let HeaderField::Single(v) = field {
                *field = HeaderField::Multiple(vec![std::mem::take(v)]);
            }
        }
        headers
    }

    /// Set a header, replacing any previous value
    pub fn insert(&mut self, name: &str, value: impl Into<HeaderField>) {
        self.fields.insert(name.to_ascii_lowercase(), value.into());
    }

    /// Add a value, turning the field into a sequence when it repeats
    pub fn append(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        match self.fields.get_mut(&name.to_ascii_lowercase()) {
            Some(field) => field.push(value),
            None => {
                self.fields
                    .insert(name.to_ascii_lowercase(), HeaderField::Single(value));
            }
        }
    }

    /// Look up a header (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&HeaderField> {
        self.fields.get(&name.to_ascii_lowercase())
    }

    /// First value of a header
    pub fn first(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(|f| f.values().into_iter().next())
    }

    /// Parsed `content-length`, if present and numeric
    pub fn content_length(&self) -> Option<u64> {
        self.first(names::CONTENT_LENGTH)
            .and_then(|v| v.trim().parse().ok())
    }

    /// Iterate over `(name, field)` pairs in name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &HeaderField)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of distinct header names
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Check if no headers are present
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Remove all headers
    pub fn clear(&mut self) {
        self.fields.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn test_forbidden_tables() {
        assert!(is_forbidden_header("Content-Length"));
        assert!(is_forbidden_header("COOKIE"));
        assert!(!is_forbidden_header("user-agent"));
        assert!(!is_forbidden_header("x-custom"));

        assert!(is_forbidden_method("trace"));
        assert!(is_forbidden_method("Connect"));
        assert!(!is_forbidden_method("DELETE"));
    }

    #[test]
    fn test_redirect_statuses() {
        for status in [301, 302, 303, 307] {
            assert!(is_redirect_status(status));
        }
        assert!(!is_redirect_status(308));
        assert!(!is_redirect_status(200));
    }

    #[test]
    fn test_repeated_headers_become_sequences() {
        let mut map = HeaderMap::new();
        map.append("x-multi", HeaderValue::from_static("a"));
        map.append("x-multi", HeaderValue::from_static("b"));
        map.append("set-cookie", HeaderValue::from_static("id=1"));
        map.append("content-length", HeaderValue::from_static("42"));

        let headers = IncomingHeaders::from_header_map(&map);
        assert_eq!(headers.get("X-Multi").unwrap().joined(), "a, b");
        assert_eq!(
            headers.get("set-cookie"),
            Some(&HeaderField::Multiple(vec!["id=1".to_string()]))
        );
        assert_eq!(headers.content_length(), Some(42));
    }

    #[test]
    fn test_wire_shape() {
        let mut headers = IncomingHeaders::new();
        headers.insert("Content-Type", "text/plain");
        headers.append("set-cookie", "a=1");
        headers.append("set-cookie", "b=2");

        let json = serde_json::to_value(&headers).unwrap();
        assert_eq!(json["content-type"], "text/plain");
        assert_eq!(json["set-cookie"][1], "b=2");

        let back: IncomingHeaders = serde_json::from_value(json).unwrap();
        assert_eq!(back, headers);
    }
}
