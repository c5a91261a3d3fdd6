// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request state record

use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::task::AbortHandle;
use url::Url;

use crate::browser::TaskId;
use crate::dom::Document;
use crate::error::{Error, Result};
use crate::file::Blob;
use crate::http::IncomingHeaders;

/// Lifecycle stage of one request attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ReadyState {
    Unsent = 0,
    Opened = 1,
    HeadersReceived = 2,
    Loading = 3,
    Done = 4,
}

impl ReadyState {
    /// Numeric value exposed to scripts
    pub fn as_u8(self) -> u8 {
        self as u8
    }
}

impl Default for ReadyState {
    fn default() -> Self {
        ReadyState::Unsent
    }
}

/// Declared interpretation of the response body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseType {
    /// The empty string type
    #[serde(rename = "")]
    Default,
    Text,
    ArrayBuffer,
    Blob,
    Document,
    Json,
}

impl Default for ResponseType {
    fn default() -> Self {
        ResponseType::Default
    }
}

impl ResponseType {
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseType::Default => "",
            ResponseType::Text => "text",
            ResponseType::ArrayBuffer => "arraybuffer",
            ResponseType::Blob => "blob",
            ResponseType::Document => "document",
            ResponseType::Json => "json",
        }
    }

    /// `""` or `text`
    pub fn is_text(self) -> bool {
        matches!(self, ResponseType::Default | ResponseType::Text)
    }
}

impl fmt::Display for ResponseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResponseType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "" => Ok(ResponseType::Default),
            "text" => Ok(ResponseType::Text),
            "arraybuffer" => Ok(ResponseType::ArrayBuffer),
            "blob" => Ok(ResponseType::Blob),
            "document" => Ok(ResponseType::Document),
            "json" => Ok(ResponseType::Json),
            other => Err(Error::syntax(format!("Unknown response type '{}'", other))),
        }
    }
}

/// Decoded response value
#[derive(Debug, Clone, PartialEq)]
pub enum XhrResponse {
    Text(String),
    ArrayBuffer(Bytes),
    Blob(Blob),
    Document(Document),
    Json(serde_json::Value),
}

impl XhrResponse {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            XhrResponse::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            XhrResponse::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            XhrResponse::ArrayBuffer(bytes) => Some(bytes),
            _ => None,
        }
    }

    pub fn as_blob(&self) -> Option<&Blob> {
        match self {
            XhrResponse::Blob(blob) => Some(blob),
            _ => None,
        }
    }

    pub fn as_document(&self) -> Option<&Document> {
        match self {
            XhrResponse::Document(doc) => Some(doc),
            _ => None,
        }
    }
}

/// Settings captured by `open()`
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OpenSettings {
    /// Upper-cased method
    pub method: String,
    /// URL as given, resolved at send time
    pub url: String,
    pub is_async: bool,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Mutable record behind one request instance
#[derive(Debug, Default)]
pub(crate) struct RequestState {
    pub ready_state: ReadyState,
    pub settings: Option<OpenSettings>,
    /// Lower-cased name to value
    pub request_headers: std::collections::BTreeMap<String, String>,
    pub incoming_headers: IncomingHeaders,
    pub status: Option<u16>,
    pub status_text: Option<String>,
    pub response_type: ResponseType,
    pub response: Option<XhrResponse>,
    pub response_text: Option<String>,
    pub response_xml: Option<Document>,
    pub response_url: Option<Url>,
    pub send_flag: bool,
    pub error_flag: bool,
    pub aborted_flag: bool,
    /// Upload target still owes its terminal events
    pub upload_pending: bool,
    pub pending_task: Option<TaskId>,
    /// In-flight async transport
    pub transport: Option<AbortHandle>,
    /// Bumped on every abort; stale transport callbacks compare against it
    pub attempt: u64,
}

impl RequestState {
    pub fn is_async(&self) -> bool {
        self.settings.as_ref().map(|s| s.is_async).unwrap_or(true)
    }

    /// Drop every response-shaped field
    pub fn clear_response(&mut self) {
        self.status = None;
        self.status_text = None;
        self.incoming_headers.clear();
        self.response = None;
        self.response_text = None;
        self.response_xml = None;
        self.response_url = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_state_order() {
        assert!(ReadyState::Unsent < ReadyState::Opened);
        assert!(ReadyState::Loading < ReadyState::Done);
        assert_eq!(ReadyState::HeadersReceived.as_u8(), 2);
    }

    #[test]
    fn test_response_type_parse() {
        assert_eq!("".parse::<ResponseType>().unwrap(), ResponseType::Default);
        assert_eq!("arraybuffer".parse::<ResponseType>().unwrap(), ResponseType::ArrayBuffer);
        assert!("stream".parse::<ResponseType>().is_err());
        assert!(ResponseType::Text.is_text());
        assert!(!ResponseType::Json.is_text());
        assert_eq!(ResponseType::Blob.to_string(), "blob");
    }

    #[test]
    fn test_clear_response() {
        let mut state = RequestState {
            status: Some(200),
            response_text: Some("x".to_string()),
            ..Default::default()
        };
        state.incoming_headers.insert("a", "b");
        state.clear_response();
        assert!(state.status.is_none());
        assert!(state.response_text.is_none());
        assert!(state.incoming_headers.is_empty());
    }
}
