// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Adapter between responses and the page's cookie store

use std::sync::Arc;

use tracing::trace;
use url::Url;

use crate::http::{names, CookieStore, HeaderField, IncomingHeaders};

/// Reads and writes cookies on behalf of a request
#[derive(Clone)]
pub struct CookieBridge {
    store: Arc<dyn CookieStore>,
}

impl CookieBridge {
    pub fn new(store: Arc<dyn CookieStore>) -> Self {
        Self { store }
    }

    /// Cookie header value for a request made from `url`
    pub fn read_cookie_header(&self, url: &Url) -> String {
        self.store.cookie_string(url)
    }

    /// Forward one header value or sequence to the store
    pub fn ingest(&self, url: &Url, value: &HeaderField) {
        for cookie in value.values() {
            trace!(url = %url, "storing cookie");
            self.store.add_cookie_string(url, cookie);
        }
    }

    /// Ingest both `Set-Cookie` spellings from a response
    pub fn ingest_response(&self, url: &Url, headers: &IncomingHeaders) {
        for name in [names::SET_COOKIE, names::SET_COOKIE2] {
            if let Some(value) = headers.get(name) {
                self.ingest(url, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::MemoryCookieJar;

    #[test]
    fn test_ingest_both_spellings() {
        let jar = MemoryCookieJar::new();
        let bridge = CookieBridge::new(Arc::new(jar.clone()));
        let url = Url::parse("http://example.com/login").unwrap();

        let mut headers = IncomingHeaders::new();
        headers.append("set-cookie", "session=abc; Path=/");
        headers.append("set-cookie", "theme=dark");
        headers.insert("set-cookie2", "legacy=1");
        bridge.ingest_response(&url, &headers);

        assert_eq!(jar.get("example.com", "session"), Some("abc".to_string()));
        assert_eq!(jar.get("example.com", "legacy"), Some("1".to_string()));

        let header = bridge.read_cookie_header(&url);
        assert!(header.contains("session=abc"));
        assert!(header.contains("theme=dark"));
    }
}
