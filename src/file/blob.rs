// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Immutable byte container with a MIME type

use std::fmt;

use bytes::{Bytes, BytesMut};
use futures::stream::{self, BoxStream, StreamExt};

/// One piece of blob content
#[derive(Debug, Clone)]
pub enum BlobPart {
    Bytes(Bytes),
    Text(String),
    Blob(Blob),
}

impl From<Bytes> for BlobPart {
    fn from(bytes: Bytes) -> Self {
        BlobPart::Bytes(bytes)
    }
}

impl From<Vec<u8>> for BlobPart {
    fn from(bytes: Vec<u8>) -> Self {
        BlobPart::Bytes(Bytes::from(bytes))
    }
}

impl From<&str> for BlobPart {
    fn from(text: &str) -> Self {
        BlobPart::Text(text.to_string())
    }
}

impl From<String> for BlobPart {
    fn from(text: String) -> Self {
        BlobPart::Text(text)
    }
}

impl From<Blob> for BlobPart {
    fn from(blob: Blob) -> Self {
        BlobPart::Blob(blob)
    }
}

/// Blob.
///
/// The content type is lower-cased; a type containing anything outside
/// printable ASCII is dropped and the blob gets an empty type.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct Blob {
    data: Bytes,
    content_type: String,
}

impl Blob {
    /// Concatenate `parts` into a new blob
    pub fn new<I, P>(parts: I, content_type: &str) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<BlobPart>,
    {
        let mut buffer = BytesMut::new();
        for part in parts {
            match part.into() {
                BlobPart::Bytes(bytes) => buffer.extend_from_slice(&bytes),
                BlobPart::Text(text) => buffer.extend_from_slice(text.as_bytes()),
                BlobPart::Blob(blob) => buffer.extend_from_slice(&blob.data),
            }
        }

        Self {
            data: buffer.freeze(),
            content_type: normalize_type(content_type),
        }
    }

    /// Blob over existing bytes without copying
    pub fn from_bytes(data: Bytes, content_type: &str) -> Self {
        Self {
            data,
            content_type: normalize_type(content_type),
        }
    }

    /// Size in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// MIME type
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Sub-range of the blob. Negative offsets count back from the end and
    /// both bounds are clamped to the blob size.
    pub fn slice(&self, start: i64, end: Option<i64>, content_type: &str) -> Blob {
        let size = self.data.len() as i64;
        let clamp = |offset: i64| {
            if offset < 0 {
                (size + offset).max(0)
            } else {
                offset.min(size)
            }
        };

        let from = clamp(start);
        let to = end.map(clamp).unwrap_or(size);
        let span = (to - from).max(0);

        Blob {
            data: self.data.slice(from as usize..(from + span) as usize),
            content_type: normalize_type(content_type),
        }
    }

    /// Raw bytes
    pub fn array_buffer(&self) -> Bytes {
        self.data.clone()
    }

    /// Contents as UTF-8 text (lossy)
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.data).into_owned()
    }

    /// Contents as a single-chunk stream
    pub fn stream(&self) -> BoxStream<'static, Bytes> {
        stream::once(futures::future::ready(self.data.clone())).boxed()
    }
}

impl fmt::Debug for Blob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Blob")
            .field("size", &self.data.len())
            .field("type", &self.content_type)
            .finish()
    }
}

fn normalize_type(content_type: &str) -> String {
    if content_type.chars().all(|c| ('\u{20}'..='\u{7e}').contains(&c)) {
        content_type.to_ascii_lowercase()
    } else {
        String::new()
    }
}
