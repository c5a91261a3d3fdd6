// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Parsed response document
//!
//! An owned, thread-safe tree. Requests hand documents across Tokio tasks, so
//! the html5ever `Rc` tree is converted into plain owned nodes.

use std::sync::Arc;

/// A node in the document tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
}

impl Node {
    /// Element view of this node
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            Node::Element(e) => Some(e),
            _ => None,
        }
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            Node::Text(t) => out.push_str(t),
            Node::Element(e) => {
                for child in &e.children {
                    child.collect_text(out);
                }
            }
            Node::Comment(_) => {}
        }
    }
}

/// Element node
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// Local tag name
    pub name: String,
    /// Attributes in source order
    pub attributes: Vec<(String, String)>,
    pub children: Vec<Node>,
}

impl Element {
    /// Create an element without attributes or children
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Get an attribute value
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Concatenated text of all descendants
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            child.collect_text(&mut out);
        }
        out
    }

    /// Child elements, skipping text and comments
    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_element)
    }

    fn collect_by_tag<'a>(&'a self, tag: &str, out: &mut Vec<&'a Element>) {
        if self.name.eq_ignore_ascii_case(tag) {
            out.push(self);
        }
        for child in self.child_elements() {
            child.collect_by_tag(tag, out);
        }
    }
}

/// Parsed document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    content_type: String,
    children: Arc<Vec<Node>>,
}

impl Document {
    /// Create a document from top-level nodes
    pub fn new(content_type: impl Into<String>, children: Vec<Node>) -> Self {
        Self {
            content_type: content_type.into(),
            children: Arc::new(children),
        }
    }

    /// MIME type the document was parsed as
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    /// Top-level nodes
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Root element
    pub fn document_element(&self) -> Option<&Element> {
        self.children.iter().find_map(Node::as_element)
    }

    /// All elements with the given tag name, in document order
    pub fn elements_by_tag_name(&self, tag: &str) -> Vec<&Element> {
        let mut out = Vec::new();
        if let Some(root) = self.document_element() {
            root.collect_by_tag(tag, &mut out);
        }
        out
    }

    /// Text of the whole document
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        for node in self.children.iter() {
            node.collect_text(&mut out);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Document {
        let mut item = Element::new("item");
        item.attributes.push(("id".to_string(), "1".to_string()));
        item.children.push(Node::Text("first".to_string()));

        let mut root = Element::new("root");
        root.children.push(Node::Element(item));
        root.children.push(Node::Comment("note".to_string()));
        root.children.push(Node::Text(" tail".to_string()));

        Document::new("text/xml", vec![Node::Element(root)])
    }

    #[test]
    fn test_document_queries() {
        let doc = sample();
        assert_eq!(doc.document_element().unwrap().name, "root");

        let items = doc.elements_by_tag_name("ITEM");
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].attribute("id"), Some("1"));
        assert_eq!(doc.text_content(), "first tail");
    }
}
