// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Document parser used for the `document` response type

use html5ever::parse_document;
use html5ever::tendril::TendrilSink;
use html5ever::tree_builder::TreeBuilderOpts;
use html5ever::ParseOpts;
use markup5ever_rcdom::{Handle, NodeData as RcNodeData, RcDom};
use tracing::debug;

use super::document::{Document, Element, Node};

/// Deepest element nesting converted into a [`Document`]. The owned tree is
/// walked recursively, so deeper input is rejected.
pub const MAX_DOCUMENT_DEPTH: usize = 512;

/// Nesting exceeded [`MAX_DOCUMENT_DEPTH`]
struct TooDeep;

/// Turns decoded response text into a document
pub trait DocumentParser: Send + Sync {
    /// `None` when the text is not a markup document
    fn parse(&self, source: &str, mime_type: &str) -> Option<Document>;
}

/// html5ever-backed parser.
///
/// html5ever recovers from any input, so text that does not start with
/// markup (JSON, plain text, empty bodies) is rejected up front, as is markup
/// nested deeper than [`MAX_DOCUMENT_DEPTH`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlDocumentParser;

impl HtmlDocumentParser {
    pub fn new() -> Self {
        Self
    }
}

impl DocumentParser for HtmlDocumentParser {
    fn parse(&self, source: &str, mime_type: &str) -> Option<Document> {
        let trimmed = source.trim_start_matches('\u{feff}').trim_start();
        if !trimmed.starts_with('<') {
            return None;
        }

        let opts = ParseOpts {
            tree_builder: TreeBuilderOpts {
                drop_doctype: true,
                ..Default::default()
            },
            ..Default::default()
        };

        let dom = parse_document(RcDom::default(), opts)
            .from_utf8()
            .read_from(&mut trimmed.as_bytes())
            .ok()?;

        match convert_children(&dom.document, 0) {
            Ok(children) => Some(Document::new(mime_type, children)),
            Err(TooDeep) => {
                debug!(limit = MAX_DOCUMENT_DEPTH, "document nesting too deep");
                None
            }
        }
    }
}

fn convert_children(handle: &Handle, depth: usize) -> Result<Vec<Node>, TooDeep> {
    if depth > MAX_DOCUMENT_DEPTH {
        return Err(TooDeep);
    }

    let mut nodes = Vec::new();
    for child in handle.children.borrow().iter() {
        if let Some(node) = convert_node(child, depth)? {
            nodes.push(node);
        }
    }
    Ok(nodes)
}

fn convert_node(handle: &Handle, depth: usize) -> Result<Option<Node>, TooDeep> {
    let node = match handle.data {
        RcNodeData::Text { ref contents } => Node::Text(contents.borrow().to_string()),
        RcNodeData::Comment { ref contents } => Node::Comment(contents.to_string()),
        RcNodeData::Element {
            ref name,
            ref attrs,
            ..
        } => {
            let mut element = Element::new(name.local.to_string());
            element.attributes = attrs
                .borrow()
                .iter()
                .map(|attr| (attr.name.local.to_string(), attr.value.to_string()))
                .collect();
            element.children = convert_children(handle, depth + 1)?;
            Node::Element(element)
        }
        RcNodeData::Document
        | RcNodeData::Doctype { .. }
        | RcNodeData::ProcessingInstruction { .. } => return Ok(None),
    };
    Ok(Some(node))
}
