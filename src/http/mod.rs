// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for the XMLHttpRequest engine
//!
//! URL classification, header tables, the cookie store collaborator and the
//! transports that actually move bytes.

mod cookie;
mod headers;
pub mod transport;
mod url;

pub use cookie::{CookieStore, MemoryCookieJar};
pub use headers::{
    is_forbidden_header, is_forbidden_method, is_redirect_status, HeaderField, IncomingHeaders,
    FORBIDDEN_REQUEST_HEADERS, FORBIDDEN_REQUEST_METHODS, REDIRECT_STATUSES,
};
pub use url::{mime_type_from_extension, RequestUrl};

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Common HTTP headers
pub mod names {
    pub const ACCEPT: &str = "accept";
    pub const AUTHORIZATION: &str = "authorization";
    pub const CONTENT_LENGTH: &str = "content-length";
    pub const CONTENT_TYPE: &str = "content-type";
    pub const COOKIE: &str = "cookie";
    pub const HOST: &str = "host";
    pub const LOCATION: &str = "location";
    pub const REFERER: &str = "referer";
    pub const SET_COOKIE: &str = "set-cookie";
    pub const SET_COOKIE2: &str = "set-cookie2";
    pub const USER_AGENT: &str = "user-agent";
}
