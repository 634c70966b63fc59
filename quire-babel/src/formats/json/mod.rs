//! JSON format implementation
//!
//! The editor's own document JSON: `{"type": "doc", "content": [...]}` with
//! `attrs`, `marks` and `text` on the nodes that carry them. This is the
//! lossless format; everything else is a projection of it.
//!
//! Parsing normalizes attributes (unknown attributes are dropped, missing ones
//! take their defaults, invalid values fall back) and then validates the tree
//! against the schema. Content is never repaired here: a tree that does not
//! fit the schema is an error.

use crate::error::FormatError;
use crate::format::{parse_bool_option, unknown_option, Direction, Format};
use crate::model::Node;
use crate::schema;
use std::collections::HashMap;

/// Parse document JSON into a normalized, validated tree.
pub fn parse_from_json(source: &str) -> Result<Node, FormatError> {
    let mut doc: Node = serde_json::from_str(source)
        .map_err(|e| FormatError::ParseError(format!("Invalid document JSON: {e}")))?;
    doc.normalize();
    schema::validate(&doc)?;
    Ok(doc)
}

pub fn serialize_to_json(doc: &Node, pretty: bool) -> Result<String, FormatError> {
    let result = if pretty {
        serde_json::to_string_pretty(doc)
    } else {
        serde_json::to_string(doc)
    };
    result.map_err(|e| FormatError::SerializationError(format!("JSON serialization failed: {e}")))
}

/// Format implementation for document JSON
pub struct JsonFormat {
    pretty: bool,
}

impl Default for JsonFormat {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl JsonFormat {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }
}

impl Format for JsonFormat {
    fn name(&self) -> &str {
        "json"
    }

    fn description(&self) -> &str {
        "Editor document JSON (lossless)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["json"]
    }

    fn direction(&self) -> Direction {
        Direction::Both
    }

    fn parse(&self, source: &str) -> Result<Node, FormatError> {
        parse_from_json(source)
    }

    fn serialize(&self, doc: &Node) -> Result<String, FormatError> {
        serialize_to_json(doc, self.pretty)
    }

    fn serialize_with_options(
        &self,
        doc: &Node,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let mut pretty = self.pretty;
        for (key, value) in options {
            match key.as_str() {
                "pretty" => pretty = parse_bool_option(key, value)?,
                _ => return Err(unknown_option("json", key)),
            }
        }
        serialize_to_json(doc, pretty)
    }
}
