//! Content constraints, validation and fitting
//!
//! A constraint is checked against a node's direct children. [`fit`] goes the
//! other way: given arbitrary children (typically whatever an HTML parse
//! produced), it restructures them so the constraint holds, wrapping stray
//! inline runs in paragraphs, stray list items in lists, loose blocks in the
//! container's default child, and creating required children that are missing.

use super::NodeType;
use crate::model::Node;
use std::fmt;
use thiserror::Error;

/// Allowed children of a node type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentConstraint {
    /// No children
    Leaf,
    /// `inline*`
    Inline,
    /// `text*` without marks
    Text,
    /// `block+`
    Blocks,
    /// `(a | b)+`, the first type is the default filler
    OneOrMore(&'static [NodeType]),
    /// `paragraph block*`
    ParagraphThenBlocks,
    /// An exact sequence of children
    Sequence(&'static [NodeType]),
}

impl fmt::Display for ContentConstraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ContentConstraint::Leaf => f.write_str("no content"),
            ContentConstraint::Inline => f.write_str("inline*"),
            ContentConstraint::Text => f.write_str("text*"),
            ContentConstraint::Blocks => f.write_str("block+"),
            ContentConstraint::OneOrMore([single]) => write!(f, "{single}+"),
            ContentConstraint::OneOrMore(types) => {
                let names: Vec<_> = types.iter().map(|t| t.name()).collect();
                write!(f, "({})+", names.join(" | "))
            }
            ContentConstraint::ParagraphThenBlocks => f.write_str("paragraph block*"),
            ContentConstraint::Sequence(types) => {
                let names: Vec<_> = types.iter().map(|t| t.name()).collect();
                f.write_str(&names.join(" "))
            }
        }
    }
}

impl ContentConstraint {
    /// Check `children` against the constraint, describing the first problem.
    pub fn check(&self, children: &[Node]) -> Result<(), String> {
        match self {
            ContentConstraint::Leaf => match children.first() {
                Some(child) => Err(format!("unexpected {} in a leaf", child.node_type)),
                None => Ok(()),
            },
            ContentConstraint::Inline => all_match(children, |t| t.is_inline(), "inline"),
            ContentConstraint::Text => {
                if let Some(child) = children.iter().find(|c| !c.is_text()) {
                    return Err(format!("{} is not text", child.node_type));
                }
                if children.iter().any(|c| !c.marks.is_empty()) {
                    return Err("marks are not allowed here".to_string());
                }
                Ok(())
            }
            ContentConstraint::Blocks => {
                non_empty(children)?;
                all_match(children, |t| t.is_block(), "a block")
            }
            ContentConstraint::OneOrMore(types) => {
                non_empty(children)?;
                all_match(children, |t| types.contains(&t), "allowed here")
            }
            ContentConstraint::ParagraphThenBlocks => {
                non_empty(children)?;
                if children[0].node_type != NodeType::Paragraph {
                    return Err(format!(
                        "first child must be a paragraph, found {}",
                        children[0].node_type
                    ));
                }
                all_match(&children[1..], |t| t.is_block(), "a block")
            }
            ContentConstraint::Sequence(types) => {
                let found: Vec<NodeType> = children.iter().map(|c| c.node_type).collect();
                if found.as_slice() == *types {
                    Ok(())
                } else {
                    let names: Vec<_> = found.iter().map(|t| t.name()).collect();
                    Err(format!("found [{}]", names.join(", ")))
                }
            }
        }
    }
}

fn non_empty(children: &[Node]) -> Result<(), String> {
    if children.is_empty() {
        Err("content is empty".to_string())
    } else {
        Ok(())
    }
}

fn all_match(children: &[Node], ok: impl Fn(NodeType) -> bool, what: &str) -> Result<(), String> {
    match children.iter().find(|c| !ok(c.node_type)) {
        Some(child) => Err(format!("{} is not {what}", child.node_type)),
        None => Ok(()),
    }
}

/// Schema violations found by [`validate`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SchemaError {
    #[error("document root must be doc, found {0}")]
    InvalidRoot(NodeType),
    #[error("{node_type} at {path} expects {expected}: {reason}")]
    InvalidContent {
        node_type: NodeType,
        path: String,
        expected: ContentConstraint,
        reason: String,
    },
    #[error("text node at {path} is empty")]
    EmptyText { path: String },
    #[error("{node_type} at {path} cannot carry marks")]
    UnexpectedMarks { node_type: NodeType, path: String },
}

/// Check every content constraint in the tree.
pub fn validate(doc: &Node) -> Result<(), SchemaError> {
    if doc.node_type != NodeType::Doc {
        return Err(SchemaError::InvalidRoot(doc.node_type));
    }
    validate_node(doc, &mut Vec::new())
}

/// Check one subtree, reporting paths relative to `node`.
pub fn validate_subtree(node: &Node) -> Result<(), SchemaError> {
    validate_node(node, &mut Vec::new())
}

fn validate_node(node: &Node, path: &mut Vec<usize>) -> Result<(), SchemaError> {
    if node.is_text() {
        if node.text_str().is_empty() {
            return Err(SchemaError::EmptyText {
                path: format_path(path),
            });
        }
        return Ok(());
    }
    if !node.marks.is_empty() && !node.node_type.is_inline() {
        return Err(SchemaError::UnexpectedMarks {
            node_type: node.node_type,
            path: format_path(path),
        });
    }

    let expected = node.node_type.spec().content;
    expected
        .check(&node.content)
        .map_err(|reason| SchemaError::InvalidContent {
            node_type: node.node_type,
            path: format_path(path),
            expected,
            reason,
        })?;

    for (index, child) in node.content.iter().enumerate() {
        path.push(index);
        validate_node(child, path)?;
        path.pop();
    }
    Ok(())
}

fn format_path(path: &[usize]) -> String {
    let mut out = String::from("doc");
    for index in path {
        out.push('/');
        out.push_str(&index.to_string());
    }
    out
}

/// A node of `node_type` with the minimal valid content.
pub fn create_and_fill(node_type: NodeType) -> Node {
    let content = match node_type.spec().content {
        ContentConstraint::Leaf | ContentConstraint::Inline | ContentConstraint::Text => {
            Vec::new()
        }
        ContentConstraint::Blocks | ContentConstraint::ParagraphThenBlocks => {
            vec![Node::new(NodeType::Paragraph)]
        }
        ContentConstraint::OneOrMore(types) => {
            types.first().map(|t| create_and_fill(*t)).into_iter().collect()
        }
        ContentConstraint::Sequence(types) => types.iter().map(|t| create_and_fill(*t)).collect(),
    };
    Node::new(node_type).with_content(content)
}

/// Restructure `children` so they satisfy the content constraint of `node_type`.
pub fn fit(node_type: NodeType, children: Vec<Node>) -> Vec<Node> {
    Fitter { trim: false }.fit(node_type, children)
}

/// Like [`fit`], for content produced from collapsed HTML whitespace: inline
/// runs are additionally trimmed at textblock edges and around hard breaks.
pub fn fit_parsed(node_type: NodeType, children: Vec<Node>) -> Vec<Node> {
    Fitter { trim: true }.fit(node_type, children)
}

struct Fitter {
    trim: bool,
}

impl Fitter {
    fn fit(&self, node_type: NodeType, children: Vec<Node>) -> Vec<Node> {
        match node_type.spec().content {
            ContentConstraint::Leaf => Vec::new(),
            ContentConstraint::Inline => self.inline(children),
            ContentConstraint::Text => raw_text(children),
            ContentConstraint::Blocks => {
                let blocks = self.blocks(children);
                if blocks.is_empty() {
                    vec![Node::new(NodeType::Paragraph)]
                } else {
                    blocks
                }
            }
            ContentConstraint::ParagraphThenBlocks => {
                let mut blocks = self.blocks(children);
                if blocks.first().map(|b| b.node_type) != Some(NodeType::Paragraph) {
                    blocks.insert(0, Node::new(NodeType::Paragraph));
                }
                blocks
            }
            ContentConstraint::OneOrMore(types) => self.one_or_more(types, children),
            ContentConstraint::Sequence(types) => self.sequence(types, children),
        }
    }

    fn inline(&self, children: Vec<Node>) -> Vec<Node> {
        let mut flat = Vec::new();
        flatten_inline(children, &mut flat);
        let merged = merge_text(flat);
        if self.trim {
            trim_inline(merged)
        } else {
            merged
        }
    }

    /// Wrap inline runs in paragraphs and stray structural nodes in their parent.
    fn blocks(&self, children: Vec<Node>) -> Vec<Node> {
        let mut out = Vec::new();
        let mut inline_run = Vec::new();
        let mut strays: Option<(NodeType, Vec<Node>)> = None;

        for child in children {
            if child.node_type.is_inline() {
                self.flush_strays(&mut strays, &mut out);
                inline_run.push(child);
                continue;
            }
            self.flush_inline(&mut inline_run, &mut out);

            if child.node_type.is_block() {
                self.flush_strays(&mut strays, &mut out);
                out.push(child);
            } else if let Some(wrapper) = stray_wrapper(child.node_type) {
                match &mut strays {
                    Some((current, run)) if *current == wrapper => run.push(child),
                    _ => {
                        self.flush_strays(&mut strays, &mut out);
                        strays = Some((wrapper, vec![child]));
                    }
                }
            } else {
                self.flush_strays(&mut strays, &mut out);
                out.extend(self.blocks(child.content));
            }
        }
        self.flush_inline(&mut inline_run, &mut out);
        self.flush_strays(&mut strays, &mut out);
        out
    }

    fn flush_inline(&self, run: &mut Vec<Node>, out: &mut Vec<Node>) {
        if run.is_empty() {
            return;
        }
        let content = self.inline(std::mem::take(run));
        let blank = content
            .iter()
            .all(|n| n.is_text() && n.text_str().trim().is_empty());
        if !blank {
            out.push(Node::new(NodeType::Paragraph).with_content(content));
        }
    }

    fn flush_strays(&self, strays: &mut Option<(NodeType, Vec<Node>)>, out: &mut Vec<Node>) {
        if let Some((wrapper, run)) = strays.take() {
            out.push(Node::new(wrapper).with_content(self.fit(wrapper, run)));
        }
    }

    fn one_or_more(&self, types: &'static [NodeType], children: Vec<Node>) -> Vec<Node> {
        let Some(&filler) = types.first() else {
            return Vec::new();
        };
        let mut out = Vec::new();
        let mut loose = Vec::new();
        for child in drop_blank_text(children) {
            if types.contains(&child.node_type) {
                self.flush_loose(filler, &mut loose, &mut out);
                out.push(child);
            } else {
                loose.push(child);
            }
        }
        self.flush_loose(filler, &mut loose, &mut out);
        if out.is_empty() {
            out.push(create_and_fill(filler));
        }
        out
    }

    fn flush_loose(&self, filler: NodeType, loose: &mut Vec<Node>, out: &mut Vec<Node>) {
        if loose.is_empty() {
            return;
        }
        let content = self.fit(filler, std::mem::take(loose));
        out.push(Node::new(filler).with_content(content));
    }

    /// Slot each expected child; anything else is appended to the last slot.
    fn sequence(&self, types: &'static [NodeType], children: Vec<Node>) -> Vec<Node> {
        let mut slots: Vec<Option<Node>> = vec![None; types.len()];
        let mut leftovers = Vec::new();
        for child in drop_blank_text(children) {
            match types.iter().position(|t| *t == child.node_type) {
                Some(index) if slots[index].is_none() => slots[index] = Some(child),
                _ => leftovers.push(child),
            }
        }

        if !leftovers.is_empty() {
            if let (Some(slot), Some(&last)) = (slots.last_mut(), types.last()) {
                let mut node = slot.take().unwrap_or_else(|| Node::new(last));
                node.content.extend(leftovers);
                *slot = Some(node);
            }
        }

        slots
            .into_iter()
            .zip(types)
            .map(|(slot, t)| match slot {
                Some(mut node) => {
                    let content = std::mem::take(&mut node.content);
                    node.content = self.fit(node.node_type, content);
                    node
                }
                None => create_and_fill(*t),
            })
            .collect()
    }
}

/// The container a structural node belongs in when found out of place.
fn stray_wrapper(node_type: NodeType) -> Option<NodeType> {
    match node_type {
        NodeType::ListItem => Some(NodeType::BulletList),
        NodeType::TaskItem => Some(NodeType::TaskList),
        NodeType::TableRow | NodeType::TableCell | NodeType::TableHeader => Some(NodeType::Table),
        NodeType::DetailsSummary | NodeType::DetailsContent => Some(NodeType::Details),
        _ => None,
    }
}

fn drop_blank_text(children: Vec<Node>) -> impl Iterator<Item = Node> {
    children
        .into_iter()
        .filter(|c| !(c.is_text() && c.text_str().trim().is_empty()))
}

fn flatten_inline(children: Vec<Node>, out: &mut Vec<Node>) {
    for child in children {
        if child.node_type.is_inline() {
            out.push(child);
        } else {
            flatten_inline(child.content, out);
        }
    }
}

/// Concatenate every descendant's text, hard breaks as newlines.
fn raw_text(children: Vec<Node>) -> Vec<Node> {
    fn collect(nodes: &[Node], out: &mut String) {
        for node in nodes {
            match node.node_type {
                NodeType::Text => out.push_str(node.text_str()),
                NodeType::HardBreak => out.push('\n'),
                _ => collect(&node.content, out),
            }
        }
    }
    let mut text = String::new();
    collect(&children, &mut text);
    if text.is_empty() {
        Vec::new()
    } else {
        vec![Node::text(text)]
    }
}

/// Join adjacent text nodes that carry the same marks.
pub fn merge_text(nodes: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if node.is_text() && node.text_str().is_empty() {
            continue;
        }
        if let Some(last) = out.last_mut() {
            if last.is_text() && node.is_text() && last.marks == node.marks {
                let joined = format!("{}{}", last.text_str(), node.text_str());
                last.text = Some(joined);
                continue;
            }
        }
        out.push(node);
    }
    out
}

/// Drop collapsed spaces at the edges of a textblock and around hard breaks.
fn trim_inline(nodes: Vec<Node>) -> Vec<Node> {
    let mut out: Vec<Node> = Vec::with_capacity(nodes.len());
    let mut after_space = true;
    for mut node in nodes {
        match node.node_type {
            NodeType::Text => {
                let text = node.text_str();
                let text = if after_space {
                    text.trim_start_matches(' ')
                } else {
                    text
                };
                if text.is_empty() {
                    continue;
                }
                after_space = text.ends_with(' ');
                node.text = Some(text.to_string());
                out.push(node);
            }
            NodeType::HardBreak => {
                trim_last_text(&mut out);
                after_space = true;
                out.push(node);
            }
            _ => {
                after_space = false;
                out.push(node);
            }
        }
    }
    trim_last_text(&mut out);
    out
}

fn trim_last_text(out: &mut Vec<Node>) {
    if let Some(last) = out.last_mut().filter(|n| n.is_text()) {
        let trimmed = last.text_str().trim_end_matches(' ').to_string();
        if trimmed.is_empty() {
            out.pop();
        } else {
            last.text = Some(trimmed);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Mark;
    use crate::schema::MarkType;

    fn paragraph(text: &str) -> Node {
        Node::new(NodeType::Paragraph).with_content(vec![Node::text(text)])
    }

    #[test]
    fn test_check_tabs_only_accepts_tabs() {
        let tabs = NodeType::Tabs.spec().content;
        assert!(tabs.check(&[create_and_fill(NodeType::Tab)]).is_ok());
        assert!(tabs.check(&[paragraph("x")]).is_err());
        assert!(tabs.check(&[]).is_err());
    }

    #[test]
    fn test_code_block_rejects_marks() {
        let marked = Node::text("x").with_marks(vec![Mark::new(MarkType::Bold)]);
        assert!(ContentConstraint::Text.check(&[marked]).is_err());
        assert!(ContentConstraint::Text.check(&[Node::text("x")]).is_ok());
    }

    #[test]
    fn test_validate_reports_path() {
        let doc = Node::new(NodeType::Doc).with_content(vec![
            paragraph("ok"),
            Node::new(NodeType::Tabs).with_content(vec![paragraph("bad")]),
        ]);
        let err = validate(&doc).unwrap_err();
        match err {
            SchemaError::InvalidContent {
                node_type, path, ..
            } => {
                assert_eq!(node_type, NodeType::Tabs);
                assert_eq!(path, "doc/1");
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn test_create_and_fill_details() {
        let details = create_and_fill(NodeType::Details);
        assert!(validate_subtree(&details).is_ok());
        assert_eq!(details.content.len(), 2);
    }

    #[test]
    fn test_fit_wraps_blocks_in_default_tab() {
        let content = fit(NodeType::Tabs, vec![paragraph("a"), paragraph("b")]);
        assert_eq!(content.len(), 1);
        assert_eq!(content[0].node_type, NodeType::Tab);
        assert_eq!(content[0].content.len(), 2);
        assert_eq!(content[0].attr_str("title"), Some("New Tab"));
    }

    #[test]
    fn test_fit_empty_tabs_gets_one_tab() {
        let content = fit(NodeType::Tabs, Vec::new());
        let tabs = Node::new(NodeType::Tabs).with_content(content);
        assert!(validate_subtree(&tabs).is_ok());
    }

    #[test]
    fn test_fit_parsed_trims_textblock_edges() {
        let content = fit_parsed(
            NodeType::Paragraph,
            vec![Node::text(" hello "), Node::text(" world ")],
        );
        assert_eq!(content, vec![Node::text("hello world")]);
    }

    #[test]
    fn test_fit_list_item_needs_leading_paragraph() {
        let nested = Node::new(NodeType::BulletList)
            .with_content(vec![create_and_fill(NodeType::ListItem)]);
        let content = fit(NodeType::ListItem, vec![nested]);
        assert_eq!(content[0].node_type, NodeType::Paragraph);
        assert_eq!(content[1].node_type, NodeType::BulletList);
    }

    #[test]
    fn test_fit_details_without_summary() {
        let content = fit(NodeType::Details, vec![paragraph("body")]);
        let details = Node::new(NodeType::Details).with_content(content);
        assert!(validate_subtree(&details).is_ok());
        assert_eq!(details.content[1].text_content(), "body");
    }

    #[test]
    fn test_merge_text_respects_marks() {
        let bold = vec![Mark::new(MarkType::Bold)];
        let merged = merge_text(vec![
            Node::text("a"),
            Node::text("b"),
            Node::text("c").with_marks(bold.clone()),
        ]);
        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0].text_str(), "ab");
    }
}
