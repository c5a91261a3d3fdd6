// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Cookie store collaborator
//!
//! The request engine never interprets cookies itself. It reads the cookie
//! string for a URL and hands every `Set-Cookie` value back to the store.
//! [`MemoryCookieJar`] is the default store: it keys cookies by host and keeps
//! only `name=value`; expiry, path and domain matching are left to richer
//! stores plugged in through [`CookieStore`].

use std::sync::Arc;

use dashmap::DashMap;
use url::Url;

/// Cookie storage shared by every request of a page
pub trait CookieStore: Send + Sync {
    /// Cookie string to attach to a request for `url` (empty when none)
    fn cookie_string(&self, url: &Url) -> String;

    /// Ingest one raw `Set-Cookie` header value received from `url`
    fn add_cookie_string(&self, url: &Url, set_cookie: &str);
}

/// Thread-safe in-memory cookie storage
#[derive(Debug, Clone, Default)]
pub struct MemoryCookieJar {
    /// `name=value` pairs stored by host, in insertion order
    cookies: Arc<DashMap<String, Vec<(String, String)>>>,
}

impl MemoryCookieJar {
    /// Create a new empty cookie jar
    pub fn new() -> Self {
        Self::default()
    }

    /// Value of a cookie stored for `host`
    pub fn get(&self, host: &str, name: &str) -> Option<String> {
        self.cookies.get(host).and_then(|pairs| {
            pairs
                .iter()
                .find(|(n, _)| n == name)
                .map(|(_, v)| v.clone())
        })
    }

    /// Get total cookie count
    pub fn len(&self) -> usize {
        self.cookies.iter().map(|e| e.value().len()).sum()
    }

    /// Check if jar is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Clear all cookies
    pub fn clear(&self) {
        self.cookies.clear();
    }
}

impl CookieStore for MemoryCookieJar {
    fn cookie_string(&self, url: &Url) -> String {
        let host = url.host_str().unwrap_or("");
        self.cookies
            .get(host)
            .map(|pairs| {
                pairs
                    .iter()
                    .map(|(n, v)| format!("{}={}", n, v))
                    .collect::<Vec<_>>()
                    .join("; ")
            })
            .unwrap_or_default()
    }

    fn add_cookie_string(&self, url: &Url, set_cookie: &str) {
        let first = set_cookie.split(';').next().unwrap_or("").trim();
        let Some((name, value)) = first.split_once('=') else {
            return;
        };
        let (name, value) = (name.trim().to_string(), value.trim().to_string());
        if name.is_empty() {
            return;
        }

        let host = url.host_str().unwrap_or("").to_string();
        let mut pairs = self.cookies.entry(host).or_default();
        match pairs.iter().position(|(n, _)| *n == name) {
            Some(index) => pairs[index].1 = value,
            None => pairs.push((name, value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cookie_roundtrip_per_host() {
        let jar = MemoryCookieJar::new();
        let url = Url::parse("https://example.com/login").unwrap();

        jar.add_cookie_string(&url, "session=abc123; Path=/; HttpOnly");
        jar.add_cookie_string(&url, "theme=dark");
        assert_eq!(jar.len(), 2);
        assert_eq!(jar.cookie_string(&url), "session=abc123; theme=dark");

        let other = Url::parse("https://other.example/").unwrap();
        assert_eq!(jar.cookie_string(&other), "");
    }

    #[test]
    fn test_cookie_overwrite() {
        let jar = MemoryCookieJar::new();
        let url = Url::parse("http://localhost:8080/").unwrap();

        jar.add_cookie_string(&url, "id=1");
        jar.add_cookie_string(&url, "id=2; Max-Age=60");
        assert_eq!(jar.len(), 1);
        assert_eq!(jar.get("localhost", "id").as_deref(), Some("2"));
    }

    #[test]
    fn test_invalid_set_cookie_ignored() {
        let jar = MemoryCookieJar::new();
        let url = Url::parse("http://localhost/").unwrap();

        jar.add_cookie_string(&url, "garbage");
        jar.add_cookie_string(&url, "=value");
        assert!(jar.is_empty());
    }
}
