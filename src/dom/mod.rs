// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Minimal document model for `responseXML`

mod document;
mod parser;

pub use document::{Document, Element, Node};
pub use parser::{DocumentParser, HtmlDocumentParser, MAX_DOCUMENT_DEPTH};
