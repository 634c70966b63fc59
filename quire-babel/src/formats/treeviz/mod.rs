//! Treeviz formatter for node trees
//!
//! Treeviz is a visual representation of the tree, one node per line, with
//! box-drawing connectors for nesting:
//!
//! <prefix><connector> <icon> <label>
//!
//! Example:
//!
//! ⧉ doc (2 blocks, size 24)
//! ├─ § heading {level=2} "Setup"
//! └─ ℹ callout {type=warning}
//!   └─ ¶ paragraph "Back up first"
//!
//! Textblocks show their text (truncated to 30 characters) instead of their
//! inline children. Only attributes that differ from their defaults are shown.
//!
//! # Parameters
//!
//! - `ast-full`: also list inline children (text with marks, hard breaks,
//!   inline atoms) and every attribute, default or not.
//! - `show-pos`: prefix each line with the document position before the node.

use super::icons::get_icon;
use crate::error::FormatError;
use crate::format::{parse_bool_option, unknown_option, Direction, Format};
use crate::model::{Attrs, Node};
use crate::schema::{self, NodeType};
use serde_json::Value;
use std::collections::HashMap;

const LABEL_WIDTH: usize = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreevizOptions {
    pub include_all: bool,
    pub show_pos: bool,
}

impl TreevizOptions {
    /// Apply `--extra-*` style overrides.
    pub fn apply_overrides(&mut self, params: &HashMap<String, String>) -> Result<(), FormatError> {
        for (key, value) in params {
            match key.as_str() {
                "ast-full" => self.include_all = parse_bool_option(key, value)?,
                "show-pos" => self.show_pos = parse_bool_option(key, value)?,
                _ => return Err(unknown_option("treeviz", key)),
            }
        }
        Ok(())
    }
}

fn truncate(text: &str) -> String {
    if text.chars().count() <= LABEL_WIDTH {
        return text.to_string();
    }
    let mut out: String = text.chars().take(LABEL_WIDTH - 1).collect();
    out.push('…');
    out
}

fn format_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn format_attrs(node: &Node, include_all: bool) -> String {
    let defaults: Attrs = schema::default_attrs(node.node_type);
    let shown: Vec<String> = node
        .attrs
        .iter()
        .filter(|(name, value)| include_all || defaults.get(name.as_str()) != Some(value))
        .map(|(name, value)| format!("{name}={}", format_value(value)))
        .collect();
    if shown.is_empty() {
        String::new()
    } else {
        format!(" {{{}}}", shown.join(", "))
    }
}

fn label(node: &Node, include_all: bool) -> String {
    if node.is_text() {
        let marks: Vec<&str> = node.marks.iter().map(|m| m.mark_type.name()).collect();
        let marks = if marks.is_empty() {
            String::new()
        } else {
            format!(" [{}]", marks.join(", "))
        };
        return format!("\"{}\"{marks}", truncate(node.text_str()));
    }

    let mut out = format!("{}{}", node.node_type.name(), format_attrs(node, include_all));
    match node.node_type {
        NodeType::BulletList | NodeType::OrderedList | NodeType::TaskList => {
            out.push_str(&format!(" ({} items)", node.content.len()));
        }
        _ if node.node_type.is_textblock() || node.node_type == NodeType::CodeBlock => {
            let text = node.text_content().replace('\n', "↵");
            if !text.is_empty() {
                out.push_str(&format!(" \"{}\"", truncate(&text)));
            }
        }
        _ => {}
    }
    out
}

/// Children drawn under `node`; inline content is only drawn in full mode.
fn visible_children(node: &Node, include_all: bool) -> Vec<(usize, &Node)> {
    let mut pos = if node.node_type == NodeType::Doc { 0 } else { 1 };
    let mut out = Vec::new();
    for child in &node.content {
        if include_all || !child.node_type.is_inline() {
            out.push((pos, child));
        }
        pos += child.node_size();
    }
    out
}

fn format_node(
    node: &Node,
    pos: usize,
    prefix: &str,
    is_last: bool,
    options: TreevizOptions,
    output: &mut String,
) {
    let connector = if is_last { "└─" } else { "├─" };
    if options.show_pos {
        output.push_str(&format!("{pos:03} "));
    }
    output.push_str(&format!(
        "{prefix}{connector} {} {}\n",
        get_icon(node.node_type),
        label(node, options.include_all)
    ));

    let child_prefix = format!("{prefix}{}", if is_last { "  " } else { "│ " });
    let children = visible_children(node, options.include_all);
    let count = children.len();
    for (i, (offset, child)) in children.into_iter().enumerate() {
        format_node(
            child,
            pos + offset,
            &child_prefix,
            i == count - 1,
            options,
            output,
        );
    }
}

pub fn to_treeviz_str(doc: &Node) -> String {
    to_treeviz_str_with_options(doc, TreevizOptions::default())
}

pub fn to_treeviz_str_with_options(doc: &Node, options: TreevizOptions) -> String {
    let mut output = format!(
        "{} {} ({} blocks, size {})\n",
        get_icon(doc.node_type),
        doc.node_type.name(),
        doc.content.len(),
        doc.content_size()
    );
    let children = visible_children(doc, options.include_all);
    let count = children.len();
    for (i, (pos, child)) in children.into_iter().enumerate() {
        format_node(child, pos, "", i == count - 1, options, &mut output);
    }
    output
}

/// Format implementation for treeviz format
#[derive(Default)]
pub struct TreevizFormat {
    options: TreevizOptions,
}

impl TreevizFormat {
    pub fn new(options: TreevizOptions) -> Self {
        Self { options }
    }
}

impl Format for TreevizFormat {
    fn name(&self) -> &str {
        "treeviz"
    }

    fn description(&self) -> &str {
        "Visual tree representation with indentation and Unicode icons"
    }

    fn file_extensions(&self) -> &[&str] {
        &["tree", "treeviz"]
    }

    fn direction(&self) -> Direction {
        Direction::Export
    }

    fn serialize(&self, doc: &Node) -> Result<String, FormatError> {
        Ok(to_treeviz_str_with_options(doc, self.options))
    }

    fn serialize_with_options(
        &self,
        doc: &Node,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let mut treeviz_options = self.options;
        treeviz_options.apply_overrides(options)?;
        Ok(to_treeviz_str_with_options(doc, treeviz_options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Mark;
    use crate::schema::MarkType;

    fn sample() -> Node {
        Node::doc(vec![
            Node::new(NodeType::Heading)
                .with_attr("level", 2)
                .with_content(vec![Node::text("Setup")]),
            Node::new(NodeType::Callout)
                .with_attr("type", "warning")
                .with_content(vec![Node::paragraph("Back up first")]),
        ])
    }

    #[test]
    fn test_default_view() {
        let out = to_treeviz_str(&sample());
        assert_eq!(
            out,
            "⧉ doc (2 blocks, size 24)\n\
             ├─ § heading {level=2} \"Setup\"\n\
             └─ ℹ callout {type=warning}\n  \
               └─ ¶ paragraph \"Back up first\"\n"
        );
    }

    #[test]
    fn test_full_view_lists_inline_nodes() {
        let doc = Node::doc(vec![Node::new(NodeType::Paragraph).with_content(vec![
            Node::text("bold").with_marks(vec![Mark::new(MarkType::Bold)]),
        ])]);
        let options = HashMap::from([("ast-full".to_string(), "true".to_string())]);
        let out = TreevizFormat::default().serialize_with_options(&doc, &options).unwrap();
        assert!(out.contains("◦ \"bold\" [bold]"));
    }

    #[test]
    fn test_positions() {
        let options = TreevizOptions {
            include_all: false,
            show_pos: true,
        };
        let out = to_treeviz_str_with_options(&sample(), options);
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[1].starts_with("000 "));
        assert!(lines[2].starts_with("007 "));
        assert!(lines[3].starts_with("008 "));
    }

    #[test]
    fn test_truncation() {
        let long = "x".repeat(40);
        let label = truncate(&long);
        assert_eq!(label.chars().count(), LABEL_WIDTH);
        assert!(label.ends_with('…'));
    }

    #[test]
    fn test_unknown_parameter() {
        let options = HashMap::from([("colour".to_string(), "true".to_string())]);
        assert!(TreevizFormat::default().serialize_with_options(&sample(), &options).is_err());
    }
}
