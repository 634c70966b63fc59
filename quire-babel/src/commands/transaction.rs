//! Transactions: ordered edit steps applied atomically
//!
//! Each step addresses the document as it is after the previous steps. The
//! steps run against a clone of the document; the result is validated once at
//! the end, so intermediate states may break content constraints but a
//! finished transaction never does.

use crate::model::{Node, ResolvedPos, TextSelection};
use crate::schema::content::merge_text;
use crate::schema::{self, SchemaError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EditError {
    #[error("position {pos} is outside the document (size {size})")]
    OutOfRange { pos: usize, size: usize },
    #[error("range {from}..{to} is inverted")]
    InvertedRange { from: usize, to: usize },
    #[error("range {from}..{to} does not stay within one parent")]
    CrossesParents { from: usize, to: usize },
    #[error("position {pos} cuts through a {node}")]
    NotABoundary { pos: usize, node: String },
    #[error("result violates the schema: {0}")]
    Schema(#[from] SchemaError),
}

/// One edit.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// Remove everything between two positions in the same parent.
    Delete { from: usize, to: usize },
    /// Insert nodes at a position.
    Insert { pos: usize, content: Vec<Node> },
    /// Replace the selection.
    SetSelection(TextSelection),
    /// Put a cursor at the valid text position closest to `pos`.
    SelectNear(usize),
}

/// An ordered list of steps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Transaction {
    steps: Vec<Step>,
}

impl Transaction {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delete(mut self, from: usize, to: usize) -> Self {
        self.steps.push(Step::Delete { from, to });
        self
    }

    pub fn insert(mut self, pos: usize, content: Vec<Node>) -> Self {
        self.steps.push(Step::Insert { pos, content });
        self
    }

    pub fn set_selection(mut self, selection: TextSelection) -> Self {
        self.steps.push(Step::SetSelection(selection));
        self
    }

    pub fn select_near(mut self, pos: usize) -> Self {
        self.steps.push(Step::SelectNear(pos));
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Apply every step to a copy of `doc`, mapping `selection` along.
    ///
    /// On error the inputs are untouched and nothing is returned.
    pub fn apply(
        &self,
        doc: &Node,
        selection: TextSelection,
    ) -> Result<(Node, TextSelection), EditError> {
        let mut doc = doc.clone();
        let mut selection = selection;

        for step in &self.steps {
            match step {
                Step::Delete { from, to } => {
                    replace(&mut doc, *from, *to, Vec::new())?;
                    selection = map_selection(selection, |p| map_delete(p, *from, *to));
                }
                Step::Insert { pos, content } => {
                    let size: usize = content.iter().map(Node::node_size).sum();
                    replace(&mut doc, *pos, *pos, content.clone())?;
                    selection = map_selection(selection, |p| if p >= *pos { p + size } else { p });
                }
                Step::SetSelection(next) => {
                    check_range(&doc, next.to())?;
                    selection = *next;
                }
                Step::SelectNear(pos) => {
                    check_range(&doc, *pos)?;
                    selection = TextSelection::near(&doc, *pos);
                }
            }
        }

        schema::validate(&doc)?;
        Ok((doc, selection))
    }
}

fn map_selection(selection: TextSelection, map: impl Fn(usize) -> usize) -> TextSelection {
    TextSelection::new(map(selection.anchor), map(selection.head))
}

fn map_delete(pos: usize, from: usize, to: usize) -> usize {
    if pos <= from {
        pos
    } else if pos >= to {
        pos - (to - from)
    } else {
        from
    }
}

fn check_range(doc: &Node, pos: usize) -> Result<(), EditError> {
    let size = doc.content_size();
    if pos > size {
        Err(EditError::OutOfRange { pos, size })
    } else {
        Ok(())
    }
}

/// Replace `from..to` with `content`. Both ends must share their parent.
fn replace(doc: &mut Node, from: usize, to: usize, content: Vec<Node>) -> Result<(), EditError> {
    if from > to {
        return Err(EditError::InvertedRange { from, to });
    }
    let size = doc.content_size();
    let start = ResolvedPos::resolve(doc, from).ok_or(EditError::OutOfRange { pos: from, size })?;
    let end = ResolvedPos::resolve(doc, to).ok_or(EditError::OutOfRange { pos: to, size })?;

    let depth = start.depth();
    if end.depth() != depth || start.path(depth) != end.path(depth) {
        return Err(EditError::CrossesParents { from, to });
    }
    let path = start.path(depth);
    let (start_offset, end_offset) = (start.parent_offset, end.parent_offset);

    let parent = doc
        .descendant_mut(&path)
        .ok_or(EditError::CrossesParents { from, to })?;
    let children = std::mem::take(&mut parent.content);
    let (head, rest) = split_at(children, start_offset, from)?;
    let (_, tail) = split_at(rest, end_offset - start_offset, to)?;

    let mut joined = head;
    joined.extend(content);
    joined.extend(tail);
    parent.content = merge_text(joined);
    Ok(())
}

/// Split a content list at an offset; offsets inside text split the text.
fn split_at(
    children: Vec<Node>,
    offset: usize,
    pos_for_error: usize,
) -> Result<(Vec<Node>, Vec<Node>), EditError> {
    let mut head = Vec::new();
    let mut tail = Vec::new();
    let mut pos = 0;
    for child in children {
        let size = child.node_size();
        if pos >= offset {
            tail.push(child);
        } else if pos + size <= offset {
            head.push(child);
        } else if !child.is_text() {
            return Err(EditError::NotABoundary {
                pos: pos_for_error,
                node: child.node_type.name().to_string(),
            });
        } else {
            let at = offset - pos;
            let chars: Vec<char> = child.text_str().chars().collect();
            let left: String = chars[..at].iter().collect();
            let right: String = chars[at..].iter().collect();
            head.push(Node {
                text: Some(left),
                ..child.clone()
            });
            tail.push(Node {
                text: Some(right),
                ..child
            });
        }
        pos += size;
    }
    Ok((head, tail))
}
