//! Text selections

use super::Node;
use serde::{Deserialize, Serialize};

/// A text selection between two positions. `anchor == head` is a cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSelection {
    pub anchor: usize,
    pub head: usize,
}

impl TextSelection {
    pub fn new(anchor: usize, head: usize) -> Self {
        TextSelection { anchor, head }
    }

    pub fn cursor(pos: usize) -> Self {
        TextSelection::new(pos, pos)
    }

    pub fn from(&self) -> usize {
        self.anchor.min(self.head)
    }

    pub fn to(&self) -> usize {
        self.anchor.max(self.head)
    }

    pub fn is_empty(&self) -> bool {
        self.anchor == self.head
    }

    /// A cursor at the valid text position closest to `pos`.
    ///
    /// Inside a textblock the position is kept. Otherwise the start of the
    /// next textblock is preferred, then the end of the previous one.
    pub fn near(doc: &Node, pos: usize) -> Self {
        let mut ranges = Vec::new();
        collect_textblock_ranges(doc, 0, &mut ranges);

        if ranges
            .iter()
            .any(|&(start, end)| start <= pos && pos <= end)
        {
            return TextSelection::cursor(pos);
        }
        if let Some(&(start, _)) = ranges.iter().find(|&&(start, _)| start >= pos) {
            return TextSelection::cursor(start);
        }
        if let Some(&(_, end)) = ranges.iter().rev().find(|&&(_, end)| end <= pos) {
            return TextSelection::cursor(end);
        }
        TextSelection::cursor(pos.min(doc.content_size()))
    }
}

fn collect_textblock_ranges(node: &Node, content_start: usize, out: &mut Vec<(usize, usize)>) {
    let mut pos = content_start;
    for child in &node.content {
        if child.node_type.is_textblock() {
            out.push((pos + 1, pos + 1 + child.content_size()));
        } else if !child.is_text() && !child.node_type.is_leaf() {
            collect_textblock_ranges(child, pos + 1, out);
        }
        pos += child.node_size();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::NodeType;

    #[test]
    fn test_bounds() {
        let selection = TextSelection::new(9, 3);
        assert_eq!(selection.from(), 3);
        assert_eq!(selection.to(), 9);
        assert!(!selection.is_empty());
        assert!(TextSelection::cursor(4).is_empty());
    }

    #[test]
    fn test_near_inside_textblock() {
        let doc = Node::doc(vec![Node::paragraph("abc")]);
        assert_eq!(TextSelection::near(&doc, 2), TextSelection::cursor(2));
    }

    #[test]
    fn test_near_between_blocks_prefers_next() {
        let doc = Node::doc(vec![Node::paragraph("ab"), Node::paragraph("cd")]);
        assert_eq!(TextSelection::near(&doc, 4), TextSelection::cursor(5));
    }

    #[test]
    fn test_near_at_end_falls_back_to_previous() {
        let doc = Node::doc(vec![
            Node::new(NodeType::Tab).with_content(vec![Node::paragraph("A")]),
        ]);
        assert_eq!(TextSelection::near(&doc, 4), TextSelection::cursor(3));
    }
}
