// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Transport strategies
//!
//! Every strategy consumes the same [`RequestDescriptor`]. The request state
//! machine only talks to the traits in this module, so a host with real
//! blocking sockets can replace [`SubprocessTransport`] without touching the
//! state machine or the decoder.

mod client;
mod local;
mod subprocess;

use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use futures::stream::BoxStream;
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use url::Url;

use super::headers::IncomingHeaders;
use super::names;
use super::url::RequestUrl;
use crate::error::{Error, Result};

pub use client::ReqwestTransport;
pub use local::LocalFileSystem;
pub use subprocess::{
    execute_job, parse_worker_output, run_sync_worker, SubprocessTransport, SyncWorkerJob,
    SyncWorkerOutput, WireResponse, SYNC_WORKER_COMMAND, SYNC_WORKER_ENV,
};

/// Streaming response body
pub type BodyStream = BoxStream<'static, Result<Bytes>>;

/// Shared request shape for every transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestDescriptor {
    pub host: String,
    pub port: u16,
    /// Path including the query string
    pub path: String,
    pub method: String,
    /// Outgoing headers keyed by lower-cased name
    pub headers: BTreeMap<String, String>,
    pub is_secure: bool,
    #[serde(default, with = "base64_body")]
    pub body: Option<Bytes>,
}

impl RequestDescriptor {
    /// Descriptor for `target` with the given method and headers
    pub fn new(
        target: &RequestUrl,
        method: impl Into<String>,
        headers: BTreeMap<String, String>,
        body: Option<Bytes>,
    ) -> Self {
        Self {
            host: target.host.clone(),
            port: target.port,
            path: target.path.clone(),
            method: method.into(),
            headers,
            is_secure: target.is_secure,
            body,
        }
    }

    /// Absolute URL the descriptor points at
    pub fn url(&self) -> Result<Url> {
        let scheme = if self.is_secure { "https" } else { "http" };
        let url = Url::parse(&format!("{}://{}:{}{}", scheme, self.host, self.port, self.path))?;
        Ok(url)
    }

    /// Descriptor for the next redirect hop.
    ///
    /// A 303 switches to GET and drops the body; 301/302/307 keep both.
    pub fn redirect(&self, target: &RequestUrl, status: u16) -> Self {
        let mut next = self.clone();
        next.host = target.host.clone();
        next.port = target.port;
        next.path = target.path.clone();
        next.is_secure = target.is_secure;
        next.headers
            .insert(names::REFERER.to_string(), target.origin());
        next.headers
            .insert(names::HOST.to_string(), target.host_header());

        if status == 303 {
            next.method = "GET".to_string();
            next.body = None;
            next.headers.remove(names::CONTENT_LENGTH);
            next.headers.remove(names::CONTENT_TYPE);
        }
        next
    }
}

/// Response handed back by an [`HttpTransport`] once headers arrive
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: IncomingHeaders,
    pub body: BodyStream,
}

impl fmt::Debug for TransportResponse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransportResponse")
            .field("status", &self.status)
            .field("status_text", &self.status_text)
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl TransportResponse {
    /// Drain the body into a complete reply
    pub async fn into_reply(self) -> Result<SyncReply> {
        let mut buffer = BytesMut::new();
        let mut body = self.body;
        while let Some(chunk) = body.next().await {
            buffer.extend_from_slice(&chunk?);
        }

        Ok(SyncReply {
            status: self.status,
            status_text: self.status_text,
            headers: self.headers,
            body: buffer.freeze(),
        })
    }
}

/// Fully buffered response produced by a [`BlockingTransport`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncReply {
    pub status: u16,
    pub status_text: String,
    pub headers: IncomingHeaders,
    pub body: Bytes,
}

/// Asynchronous streaming sender
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue the request and resolve once the response headers are in
    async fn send(&self, request: &RequestDescriptor) -> Result<TransportResponse>;
}

/// Sender that blocks the calling thread until the whole response is read
pub trait BlockingTransport: Send + Sync {
    fn fetch(&self, request: &RequestDescriptor) -> Result<SyncReply>;
}

/// Local filesystem reads for `file:` URLs
#[async_trait]
pub trait FileSystem: Send + Sync {
    async fn read(&self, path: &Path) -> Result<Bytes>;

    fn read_sync(&self, path: &Path) -> Result<Bytes>;
}

mod base64_body {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine;
    use bytes::Bytes;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(body: &Option<Bytes>, serializer: S) -> Result<S::Ok, S::Error> {
        match body {
            Some(bytes) => serializer.serialize_some(&STANDARD.encode(bytes)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Bytes>, D::Error> {
        let encoded: Option<String> = Option::deserialize(deserializer)?;
        encoded
            .map(|e| {
                STANDARD
                    .decode(e)
                    .map(Bytes::from)
                    .map_err(serde::de::Error::custom)
            })
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> RequestDescriptor {
        let target = RequestUrl::classify(Url::parse("http://localhost:8080/submit?x=1").unwrap());
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), "text/plain;charset=UTF-8".to_string());
        headers.insert("content-length".to_string(), "5".to_string());
        RequestDescriptor::new(&target, "POST", headers, Some(Bytes::from_static(b"hello")))
    }

    #[test]
    fn test_descriptor_url() {
        let desc = descriptor();
        assert_eq!(desc.url().unwrap().as_str(), "http://localhost:8080/submit?x=1");
    }

    #[test]
    fn test_redirect_303_switches_to_get() {
        let target = RequestUrl::classify(Url::parse("https://example.com/done").unwrap());
        let next = descriptor().redirect(&target, 303);

        assert_eq!(next.method, "GET");
        assert!(next.body.is_none());
        assert!(!next.headers.contains_key("content-length"));
        assert_eq!(next.headers["host"], "example.com");
        assert_eq!(next.headers["referer"], "https://example.com");
        assert!(next.is_secure);
        assert_eq!(next.port, 443);
    }

    #[test]
    fn test_redirect_307_keeps_method_and_body() {
        let target = RequestUrl::classify(Url::parse("http://localhost:9090/again").unwrap());
        let next = descriptor().redirect(&target, 307);

        assert_eq!(next.method, "POST");
        assert_eq!(next.body.as_deref(), Some(&b"hello"[..]));
        assert_eq!(next.headers["host"], "localhost:9090");
        assert_eq!(next.path, "/again");
    }

    #[test]
    fn test_descriptor_wire_body_is_base64() {
        let json = serde_json::to_value(descriptor()).unwrap();
        assert_eq!(json["body"], "aGVsbG8=");
        assert_eq!(json["isSecure"], false);

        let back: RequestDescriptor = serde_json::from_value(json).unwrap();
        assert_eq!(back, descriptor());
    }

    #[tokio::test]
    async fn test_into_reply_concatenates_chunks() {
        let chunks = vec![Ok(Bytes::from_static(b"ab")), Ok(Bytes::from_static(b"cd"))];
        let response = TransportResponse {
            status: 200,
            status_text: "OK".to_string(),
            headers: IncomingHeaders::new(),
            body: futures::stream::iter(chunks).boxed(),
        };

        let reply = response.into_reply().await.unwrap();
        assert_eq!(reply.body, Bytes::from_static(b"abcd"));
        assert_eq!(reply.status, 200);
    }
}
