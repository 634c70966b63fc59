//! The interchange format seam
//!
//! Every way a document enters or leaves the node tree goes through [`Format`]: HTML and
//! Markdown both ways, the document JSON both ways, plain text and the tree view out only.
//! Per-call options arrive as the `--extra-*` string map from the command line and are parsed
//! by the helpers at the bottom of this file, so every format reports bad keys and bad values
//! the same way.

use crate::error::FormatError;
use crate::model::Node;
use std::collections::HashMap;
use std::fmt;

/// Which way a format can carry a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Source text in, tree out.
    Import,
    /// Tree in, source text out.
    Export,
    Both,
}

impl Direction {
    pub fn can_parse(self) -> bool {
        matches!(self, Direction::Import | Direction::Both)
    }

    pub fn can_serialize(self) -> bool {
        matches!(self, Direction::Export | Direction::Both)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Direction::Import => "in",
            Direction::Export => "out",
            Direction::Both => "in/out",
        })
    }
}

/// A document interchange format.
///
/// `parse` must return a tree that passes `schema::validate`; formats get there by routing
/// through the HTML parser's fitting or the JSON normalizer. Formats that only export keep the
/// default `parse`, which refuses.
pub trait Format: Send + Sync {
    /// Name used by `--from`/`--to`.
    fn name(&self) -> &str;

    fn description(&self) -> &str {
        ""
    }

    /// Extensions without the dot, matched case-insensitively.
    fn file_extensions(&self) -> &[&str] {
        &[]
    }

    fn direction(&self) -> Direction;

    fn parse(&self, _source: &str) -> Result<Node, FormatError> {
        Err(FormatError::NotSupported(format!(
            "Format '{}' does not support parsing",
            self.name()
        )))
    }

    fn serialize(&self, doc: &Node) -> Result<String, FormatError>;

    /// Serialize with `--extra-*` overrides layered over the format's configured options.
    ///
    /// Formats without options keep this default, which rejects any key.
    fn serialize_with_options(
        &self,
        doc: &Node,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        match options.keys().next() {
            None => self.serialize(doc),
            Some(key) => Err(unknown_option(self.name(), key)),
        }
    }
}

/// Error for an option key a format does not understand.
pub(crate) fn unknown_option(format: &str, key: &str) -> FormatError {
    FormatError::NotSupported(format!("Format '{format}' has no option '{key}'"))
}

/// Parse a boolean option value.
pub(crate) fn parse_bool_option(key: &str, value: &str) -> Result<bool, FormatError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        _ => Err(FormatError::SerializationError(format!(
            "Option '{key}' expects a boolean, got '{value}'"
        ))),
    }
}
