// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Asynchronous streaming transport on top of reqwest

use async_trait::async_trait;
use futures::StreamExt;
use hyper::ext::ReasonPhrase;
use reqwest::redirect::Policy;
use reqwest::{Client, Method, StatusCode};
use tracing::debug;

use super::{HttpTransport, RequestDescriptor, TransportResponse};
use crate::browser::BrowserSettings;
use crate::error::{Error, Result};
use crate::http::headers::IncomingHeaders;
use crate::http::names;

/// reqwest-backed [`HttpTransport`].
///
/// Redirects and cookies are disabled on the client: the request state
/// machine follows redirects hop by hop and routes cookies through the page's
/// cookie store.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    /// Create a transport from browser settings
    pub fn new(settings: &BrowserSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .user_agent(&settings.user_agent)
            .timeout(settings.timeout)
            .redirect(Policy::none())
            .danger_accept_invalid_certs(settings.ignore_https_errors);

        if let Some(ref proxy_url) = settings.proxy {
            builder = builder.proxy(
                reqwest::Proxy::all(proxy_url)
                    .map_err(|e| Error::Config(format!("Invalid proxy URL: {}", e)))?,
            );
        }

        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Wrap an existing reqwest client
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: &RequestDescriptor) -> Result<TransportResponse> {
        let url = request.url()?;
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| Error::syntax(format!("Invalid method '{}': {}", request.method, e)))?;

        debug!(method = %method, url = %url, "sending request");

        let mut builder = self.client.request(method, url);

        // The client derives host and content-length from the URL and body
        for (name, value) in &request.headers {
            if name == names::HOST || name == names::CONTENT_LENGTH {
                continue;
            }
            builder = builder.header(name.as_str(), value.as_str());
        }

        if let Some(ref body) = request.body {
            builder = builder.body(body.clone());
        }

        let response = builder.send().await?;
        let status = response.status();
        let status_text = status_text(status, response.extensions().get::<ReasonPhrase>());
        let headers = IncomingHeaders::from_header_map(response.headers());

        debug!(status = status.as_u16(), "response headers received");

        let body = response
            .bytes_stream()
            .map(|chunk| chunk.map_err(Error::from))
            .boxed();

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text,
            headers,
            body,
        })
    }
}

/// Reason phrase as sent by the server. hyper only records it when it differs
/// from the canonical one.
fn status_text(status: StatusCode, reason: Option<&ReasonPhrase>) -> String {
    match reason {
        Some(reason) => String::from_utf8_lossy(reason.as_bytes()).into_owned(),
        None => status.canonical_reason().unwrap_or("").to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_status_text_prefers_server_phrase() {
        let custom = ReasonPhrase::from_static(b"Everything Fine");
        assert_eq!(status_text(StatusCode::OK, Some(&custom)), "Everything Fine");
        assert_eq!(status_text(StatusCode::NOT_FOUND, None), "Not Found");
        assert_eq!(status_text(StatusCode::from_u16(599).unwrap(), None), "");
    }

    #[test]
    fn test_transport_creation() {
        let settings = BrowserSettings::new().timeout(Duration::from_secs(5));
        assert!(ReqwestTransport::new(&settings).is_ok());
    }
}
