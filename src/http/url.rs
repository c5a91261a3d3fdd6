// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request URL resolution and classification

use std::path::PathBuf;

use url::Url;

use crate::error::{Error, Result};

/// A request URL resolved against the page location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestUrl {
    /// Absolute URL
    pub url: Url,
    /// Host name (IPv6 hosts keep their brackets)
    pub host: String,
    /// Explicit port, or 80/443 by scheme
    pub port: u16,
    /// Path including the query string
    pub path: String,
    /// Served over TLS
    pub is_secure: bool,
    /// Points at the local filesystem
    pub is_local: bool,
}

impl RequestUrl {
    /// Resolve `input` against `base` and classify the result
    pub fn resolve(input: &str, base: &Url) -> Result<Self> {
        let url = base
            .join(input)
            .map_err(|e| Error::syntax(format!("Failed to parse URL from '{}': {}", input, e)))?;
        Ok(Self::classify(url))
    }

    /// Classify an absolute URL
    pub fn classify(url: Url) -> Self {
        let is_secure = url.scheme() == "https";
        let is_local = url.scheme() == "file";
        let host = url.host_str().unwrap_or("").to_string();
        let port = url.port().unwrap_or(if is_secure { 443 } else { 80 });
        let path = match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        };

        Self {
            url,
            host,
            port,
            path,
            is_secure,
            is_local,
        }
    }

    /// Value for the `host` request header; the port is kept only when
    /// it is not the default for the scheme
    pub fn host_header(&self) -> String {
        let default_port = if self.is_secure { 443 } else { 80 };
        if self.port == default_port {
            self.host.clone()
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    /// Origin of the URL (`scheme://host[:port]`)
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    /// Filesystem path for a `file:` URL
    pub fn file_path(&self) -> Result<PathBuf> {
        self.url
            .to_file_path()
            .map_err(|_| Error::network(format!("Not a local file URL: {}", self.url)))
    }

    /// MIME type guessed from the path extension
    pub fn mime_type(&self) -> &'static str {
        let last = self.url.path().rsplit('/').next().unwrap_or("");
        let ext = last.rsplit_once('.').map(|(_, ext)| ext).unwrap_or("");
        mime_type_from_extension(ext)
    }
}

/// MIME type for a file extension; `text/plain` when unknown
pub fn mime_type_from_extension(ext: &str) -> &'static str {
    match ext.to_ascii_lowercase().as_str() {
        "html" | "htm" => "text/html",
        "xhtml" => "application/xhtml+xml",
        "xml" => "text/xml",
        "css" => "text/css",
        "js" | "mjs" | "cjs" => "text/javascript",
        "json" | "map" => "application/json",
        "txt" => "text/plain",
        "csv" => "text/csv",
        "svg" => "image/svg+xml",
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "ico" => "image/x-icon",
        "woff" => "font/woff",
        "woff2" => "font/woff2",
        "pdf" => "application/pdf",
        "wasm" => "application/wasm",
        "mp3" => "audio/mpeg",
        "mp4" => "video/mp4",
        _ => "text/plain",
    }
}
