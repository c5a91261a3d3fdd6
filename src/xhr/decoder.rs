// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Response body decoding by declared response type

use bytes::Bytes;
use encoding_rs::{Encoding, UTF_8};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

use super::state::{ResponseType, XhrResponse};
use crate::dom::{Document, DocumentParser};
use crate::file::Blob;

lazy_static! {
    static ref CHARSET: Regex = Regex::new(r"(?i)charset=([^;]*)").unwrap();
}

/// The `response`, `responseText` and `responseXML` triple
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedResponse {
    pub response: Option<XhrResponse>,
    pub response_text: Option<String>,
    pub response_xml: Option<Document>,
}

/// Charset named by a content type, if any
pub fn charset_from_content_type(content_type: &str) -> Option<&str> {
    CHARSET
        .captures(content_type)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().trim_matches('"'))
        .filter(|c| !c.is_empty())
}

/// Decode bytes as text. Unknown charsets fall back to UTF-8 and invalid
/// sequences become replacement characters.
pub fn decode_text(bytes: &[u8], content_type: Option<&str>) -> String {
    let encoding = content_type
        .and_then(charset_from_content_type)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8);
    let (text, _, _) = encoding.decode(bytes);
    text.into_owned()
}

/// Turns a completed body into the response triple
pub struct ResponseDecoder<'a> {
    parser: &'a dyn DocumentParser,
}

impl<'a> ResponseDecoder<'a> {
    pub fn new(parser: &'a dyn DocumentParser) -> Self {
        Self { parser }
    }

    /// Decode `body`.
    ///
    /// The charset comes from the response `content-type`, else from the
    /// request's own `content-type`. Malformed JSON or markup yields an empty
    /// triple rather than an error.
    pub fn decode(
        &self,
        body: Bytes,
        response_type: ResponseType,
        response_content_type: Option<&str>,
        request_content_type: Option<&str>,
    ) -> DecodedResponse {
        let effective = response_content_type.or(request_content_type);

        match response_type {
            ResponseType::Default | ResponseType::Text => {
                let text = decode_text(&body, effective);
                DecodedResponse {
                    response: Some(XhrResponse::Text(text.clone())),
                    response_text: Some(text),
                    response_xml: None,
                }
            }
            ResponseType::ArrayBuffer => DecodedResponse {
                response: Some(XhrResponse::ArrayBuffer(body)),
                ..Default::default()
            },
            ResponseType::Blob => DecodedResponse {
                response: Some(XhrResponse::Blob(Blob::from_bytes(
                    body,
                    response_content_type.unwrap_or(""),
                ))),
                ..Default::default()
            },
            ResponseType::Document => {
                let text = decode_text(&body, effective);
                let mime = effective
                    .and_then(|ct| ct.split(';').next())
                    .map(str::trim)
                    .filter(|m| !m.is_empty())
                    .unwrap_or("text/xml");
                match self.parser.parse(&text, mime) {
                    Some(doc) => DecodedResponse {
                        response: Some(XhrResponse::Document(doc.clone())),
                        response_text: None,
                        response_xml: Some(doc),
                    },
                    None => {
                        debug!("response body is not a document");
                        DecodedResponse::default()
                    }
                }
            }
            ResponseType::Json => {
                let text = decode_text(&body, effective);
                match serde_json::from_str(&text) {
                    Ok(value) => DecodedResponse {
                        response: Some(XhrResponse::Json(value)),
                        ..Default::default()
                    },
                    Err(e) => {
                        debug!(error = %e, "response body is not valid JSON");
                        DecodedResponse::default()
                    }
                }
            }
        }
    }
}
