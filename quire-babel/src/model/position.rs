//! Integer document positions
//!
//! Positions count tokens in a flattened view of the tree: entering or leaving
//! a non-leaf node is one token, each character of text is one token, and a
//! leaf node is one token. Position 0 is the start of the `doc` content.

use super::Node;

#[derive(Debug, Clone, Copy)]
struct Level<'a> {
    node: &'a Node,
    /// Index of the child at or after the position
    index: usize,
    /// Absolute position where that child starts
    offset: usize,
}

/// A position resolved against a document: the chain of ancestors around it.
#[derive(Debug, Clone)]
pub struct ResolvedPos<'a> {
    pub pos: usize,
    /// Offset of `pos` inside the innermost parent's content
    pub parent_offset: usize,
    levels: Vec<Level<'a>>,
}

impl Node {
    /// Resolve `pos` against this node's content. `None` when out of range.
    pub fn resolve(&self, pos: usize) -> Option<ResolvedPos<'_>> {
        ResolvedPos::resolve(self, pos)
    }
}

impl<'a> ResolvedPos<'a> {
    pub fn resolve(doc: &'a Node, pos: usize) -> Option<Self> {
        if pos > doc.content_size() {
            return None;
        }
        let mut levels = Vec::new();
        let mut start = 0;
        let mut parent_offset = pos;
        let mut node = doc;
        loop {
            let (index, offset) = find_index(node, parent_offset);
            levels.push(Level {
                node,
                index,
                offset: start + offset,
            });
            let rem = parent_offset - offset;
            if rem == 0 {
                break;
            }
            let child = node.content.get(index)?;
            if child.is_text() {
                break;
            }
            node = child;
            parent_offset = rem - 1;
            start += offset + 1;
        }
        Some(ResolvedPos {
            pos,
            parent_offset,
            levels,
        })
    }

    /// Number of ancestors above the innermost parent (`doc` is depth 0).
    pub fn depth(&self) -> usize {
        self.levels.len() - 1
    }

    /// Ancestor at `depth`. Panics past [`depth`](Self::depth).
    pub fn node(&self, depth: usize) -> &'a Node {
        self.levels[depth].node
    }

    /// The innermost parent.
    pub fn parent(&self) -> &'a Node {
        self.node(self.depth())
    }

    /// Index into the ancestor at `depth` of the child at or after the position.
    pub fn index(&self, depth: usize) -> usize {
        self.levels[depth].index
    }

    /// Start of the content of the ancestor at `depth`.
    pub fn start(&self, depth: usize) -> usize {
        if depth == 0 {
            0
        } else {
            self.levels[depth - 1].offset + 1
        }
    }

    /// End of the content of the ancestor at `depth`.
    pub fn end(&self, depth: usize) -> usize {
        self.start(depth) + self.node(depth).content_size()
    }

    /// Position directly before the ancestor at `depth`. `None` for the root.
    pub fn before(&self, depth: usize) -> Option<usize> {
        depth
            .checked_sub(1)
            .map(|parent| self.levels[parent].offset)
    }

    /// Position directly after the ancestor at `depth`. `None` for the root.
    pub fn after(&self, depth: usize) -> Option<usize> {
        self.before(depth)
            .map(|before| before + self.node(depth).node_size())
    }

    /// Child indices leading from the root to the ancestor at `depth`.
    pub fn path(&self, depth: usize) -> Vec<usize> {
        self.levels[..depth].iter().map(|l| l.index).collect()
    }

    /// The deepest depth whose content contains both this position and `pos`.
    pub fn shared_depth(&self, pos: usize) -> usize {
        (0..=self.depth())
            .rev()
            .find(|&d| self.start(d) <= pos && pos <= self.end(d))
            .unwrap_or(0)
    }
}

/// Child index and start offset for an offset into `node`'s content.
fn find_index(node: &Node, pos: usize) -> (usize, usize) {
    if pos == 0 {
        return (0, 0);
    }
    if pos == node.content_size() {
        return (node.content.len(), pos);
    }
    let mut cur = 0;
    for (index, child) in node.content.iter().enumerate() {
        let end = cur + child.node_size();
        if end >= pos {
            if end == pos {
                return (index + 1, end);
            }
            return (index, cur);
        }
        cur = end;
    }
    (node.content.len(), cur)
}
