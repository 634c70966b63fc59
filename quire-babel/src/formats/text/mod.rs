//! Plain-text extraction
//!
//! Flattens a tree to text for search indexing and previews. Every block node
//! (anything not inline) that does not start at position 0 is preceded by the
//! block separator, so nested blocks contribute one separator each. Atoms with
//! a text attribute (math) contribute that text; other atoms contribute nothing.

use crate::error::FormatError;
use crate::format::{unknown_option, Direction, Format};
use crate::model::Node;
use crate::schema::NodeType;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextOptions {
    pub block_separator: String,
}

impl Default for TextOptions {
    fn default() -> Self {
        Self {
            block_separator: "\n\n".to_string(),
        }
    }
}

/// Extract text with the default `"\n\n"` block separator
pub fn serialize_to_text(doc: &Node) -> String {
    serialize_to_text_with_options(doc, &TextOptions::default())
}

pub fn serialize_to_text_with_options(doc: &Node, options: &TextOptions) -> String {
    let mut out = String::new();
    collect(doc, 0, options, &mut out);
    out
}

/// Walk `node`'s children; `start` is the position of its content.
fn collect(node: &Node, start: usize, options: &TextOptions, out: &mut String) {
    let mut pos = start;
    for child in &node.content {
        if !child.node_type.is_inline() && pos > 0 {
            out.push_str(&options.block_separator);
        }
        match child.node_type {
            NodeType::Text => out.push_str(child.text_str()),
            NodeType::HardBreak => out.push('\n'),
            NodeType::MathInline | NodeType::MathBlock => {
                out.push_str(child.attr_str("text").unwrap_or(""))
            }
            _ if child.node_type.is_leaf() => {}
            _ => collect(child, pos + 1, options, out),
        }
        pos += child.node_size();
    }
}

/// Format implementation for plain text (export only)
#[derive(Default)]
pub struct TextFormat {
    options: TextOptions,
}

impl TextFormat {
    pub fn new(options: TextOptions) -> Self {
        Self { options }
    }
}

impl Format for TextFormat {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Plain text with blocks separated by blank lines"
    }

    fn file_extensions(&self) -> &[&str] {
        &["txt"]
    }

    fn direction(&self) -> Direction {
        Direction::Export
    }

    fn serialize(&self, doc: &Node) -> Result<String, FormatError> {
        Ok(serialize_to_text_with_options(doc, &self.options))
    }

    fn serialize_with_options(
        &self,
        doc: &Node,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let mut text_options = self.options.clone();
        for (key, value) in options {
            match key.as_str() {
                "block-separator" => text_options.block_separator = unescape(value),
                _ => return Err(unknown_option("text", key)),
            }
        }
        Ok(serialize_to_text_with_options(doc, &text_options))
    }
}

/// Allow `\n` and `\t` escapes in separators passed on the command line.
fn unescape(value: &str) -> String {
    value.replace("\\n", "\n").replace("\\t", "\t")
}
