//! Document model
//!
//! A document is an owned tree of [`Node`]s rooted at a `doc` node. Nodes are
//! plain values: cloning a subtree copies it, and removing a child from its
//! parent's `content` deletes it. The JSON shape (`{type, attrs?, content?,
//! marks?, text?}`) is the serde representation of these structs.
//!
//! Builders always route attributes through the schema normalizer, so a node
//! built here carries the same attributes it would have after an HTML parse.

pub mod position;
pub mod selection;

pub use position::ResolvedPos;
pub use selection::TextSelection;

use crate::schema::{self, MarkType, NodeType};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Attribute name to JSON value.
pub type Attrs = BTreeMap<String, Value>;

/// An inline formatting span.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mark {
    #[serde(rename = "type")]
    pub mark_type: MarkType,
    #[serde(default, skip_serializing_if = "Attrs::is_empty")]
    pub attrs: Attrs,
}

impl Mark {
    pub fn new(mark_type: MarkType) -> Self {
        Mark {
            mark_type,
            attrs: schema::normalize_mark_attrs(mark_type, &Attrs::new()),
        }
    }

    pub fn with_attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self.attrs = schema::normalize_mark_attrs(self.mark_type, &self.attrs);
        self
    }

    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).and_then(Value::as_str)
    }

    pub fn normalize(&mut self) {
        self.attrs = schema::normalize_mark_attrs(self.mark_type, &self.attrs);
    }
}

/// A node of the document tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Attrs::is_empty")]
    pub attrs: Attrs,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub content: Vec<Node>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub marks: Vec<Mark>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl Node {
    /// A node with default attributes and no content.
    pub fn new(node_type: NodeType) -> Self {
        Node {
            node_type,
            attrs: schema::default_attrs(node_type),
            content: Vec::new(),
            marks: Vec::new(),
            text: None,
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Node {
            text: Some(text.into()),
            ..Node::new(NodeType::Text)
        }
    }

    pub fn doc(content: Vec<Node>) -> Self {
        Node::new(NodeType::Doc).with_content(content)
    }

    /// A paragraph holding one unmarked text node (or nothing for `""`).
    pub fn paragraph(text: &str) -> Self {
        let content = if text.is_empty() {
            Vec::new()
        } else {
            vec![Node::text(text)]
        };
        Node::new(NodeType::Paragraph).with_content(content)
    }

    pub fn with_content(mut self, content: Vec<Node>) -> Self {
        self.content = content;
        self
    }

    /// Set one attribute, then renormalize.
    pub fn with_attr(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.attrs.insert(name.to_string(), value.into());
        self.attrs = schema::normalize_attrs(self.node_type, &self.attrs);
        self
    }

    /// Replace the attributes with normalized `raw`.
    pub fn with_attrs(mut self, raw: &Attrs) -> Self {
        self.attrs = schema::normalize_attrs(self.node_type, raw);
        self
    }

    /// Set the marks, sorted by nesting rank.
    pub fn with_marks(mut self, mut marks: Vec<Mark>) -> Self {
        marks.sort_by_key(|m| m.mark_type);
        marks.dedup_by_key(|m| m.mark_type);
        self.marks = marks;
        self
    }

    pub fn is_text(&self) -> bool {
        self.node_type == NodeType::Text
    }

    /// The text of a text node, `""` for anything else.
    pub fn text_str(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }

    pub fn attr(&self, name: &str) -> Option<&Value> {
        self.attrs.get(name).filter(|v| !v.is_null())
    }

    pub fn attr_str(&self, name: &str) -> Option<&str> {
        self.attr(name).and_then(Value::as_str)
    }

    pub fn attr_i64(&self, name: &str) -> Option<i64> {
        self.attr(name).and_then(Value::as_i64)
    }

    pub fn attr_bool(&self, name: &str) -> bool {
        self.attr(name).and_then(Value::as_bool).unwrap_or(false)
    }

    pub fn has_mark(&self, mark_type: MarkType) -> bool {
        self.marks.iter().any(|m| m.mark_type == mark_type)
    }

    /// Size in document positions.
    pub fn node_size(&self) -> usize {
        if self.is_text() {
            self.text_str().chars().count()
        } else if self.node_type.is_leaf() {
            1
        } else {
            self.content_size() + 2
        }
    }

    pub fn content_size(&self) -> usize {
        self.content.iter().map(Node::node_size).sum()
    }

    /// Concatenated text of every descendant text node.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        if self.is_text() {
            out.push_str(self.text_str());
        }
        for child in &self.content {
            child.collect_text(out);
        }
    }

    /// Normalize attributes and mark order across the whole subtree.
    pub fn normalize(&mut self) {
        self.attrs = schema::normalize_attrs(self.node_type, &self.attrs);
        for mark in &mut self.marks {
            mark.normalize();
        }
        self.marks.sort_by_key(|m| m.mark_type);
        for child in &mut self.content {
            child.normalize();
        }
    }

    /// The node at a path of child indices.
    pub fn descendant(&self, path: &[usize]) -> Option<&Node> {
        path.iter()
            .try_fold(self, |node, &index| node.content.get(index))
    }

    pub fn descendant_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        let mut node = self;
        for &index in path {
            node = node.content.get_mut(index)?;
        }
        Some(node)
    }
}
