// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # Kalamari XHR - XMLHttpRequest engine for headless browsers
//!
//! A browser-compatible request object for hosts that are not browsers.
//! Requests follow the web platform's readyState lifecycle, header and
//! method restrictions, redirect rules and response-type decoding.
//!
//! ## Features
//!
//! - Async requests on Tokio with streaming progress events
//! - Synchronous requests that block the caller through a worker process
//! - Redirects (301/302/303/307) with a bounded hop count
//! - Cookie read/write through a pluggable cookie store
//! - `text`, `arraybuffer`, `blob`, `document` and `json` response types
//! - Opt-in `file:` requests
//!
//! ## Example
//!
//! ```rust,no_run
//! use kalamari_xhr::{BrowserSettings, Page, ResponseType};
//! use url::Url;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let page = Page::new(Url::parse("https://example.com/")?, BrowserSettings::default())?;
//!
//!     let xhr = page.new_request();
//!     xhr.open("GET", "/api/items")?;
//!     xhr.set_response_type(ResponseType::Json)?;
//!     xhr.send(None)?;
//!
//!     page.when_complete().await;
//!     println!("{:?} {:?}", xhr.status(), xhr.response());
//!
//!     Ok(())
//! }
//! ```

pub mod browser;
pub mod dom;
pub mod error;
pub mod file;
pub mod http;
pub mod xhr;

// Re-exports for convenience

// Page and settings
pub use browser::{AsyncTaskManager, AsyncTaskRegistry, BrowserSettings, Page, PageBuilder};

// Requests
pub use xhr::{
    ErrorEvent, EventTarget, ProgressEvent, ReadyState, ResponseType, XhrEvent, XhrResponse,
    XmlHttpRequest,
};

// DOM
pub use dom::{Document, Element, Node};

// Files
pub use file::Blob;

// Errors
pub use error::{Error, Result};

// HTTP
pub use http::{CookieStore, MemoryCookieJar};

/// Kalamari XHR version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
