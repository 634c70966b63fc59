//! Backspace at the start of a block that follows a container
//!
//! With the cursor at the very start of a top-level block that directly
//! follows a container (callout, tab, tabs), Backspace pulls the block's
//! content into the end of the container instead of leaving an empty line
//! behind it. An empty block is simply removed. When the container ends in
//! something other than a textblock (a tab, a list) the content is wrapped to
//! fit there.

use super::{EditorState, Key, KeyCommand, Outcome, Transaction};
use crate::model::Node;
use crate::schema::content::fit;
use crate::schema::NodeType;

#[derive(Debug, Clone)]
pub struct ContainerMerge {
    container: NodeType,
    name: String,
}

impl ContainerMerge {
    pub fn new(container: NodeType) -> Self {
        ContainerMerge {
            container,
            name: format!("containerMerge({})", container.name()),
        }
    }

    pub fn container(&self) -> NodeType {
        self.container
    }

    fn decline(&self, reason: &str) -> Outcome {
        tracing::debug!(container = %self.container.name(), reason, "merge declined");
        Outcome::Decline
    }
}

impl KeyCommand for ContainerMerge {
    fn name(&self) -> &str {
        &self.name
    }

    fn run(&self, state: &EditorState, key: Key) -> Outcome {
        if key != Key::Backspace {
            return Outcome::Decline;
        }
        if !state.selection.is_empty() {
            return self.decline("selection is not empty");
        }
        let doc = &state.doc;
        let Some(cursor) = doc.resolve(state.selection.head) else {
            return self.decline("cursor outside the document");
        };
        if cursor.parent_offset != 0 {
            return self.decline("cursor is not at the start of its block");
        }

        let depth = cursor.depth();
        let Some(before) = cursor.before(depth) else {
            return self.decline("cursor is not inside a block");
        };
        let previous = match before.checked_sub(1) {
            Some(previous) if previous >= 1 => previous,
            _ => return self.decline("nothing before the block"),
        };
        let Some(previous_pos) = doc.resolve(previous) else {
            return self.decline("previous position does not resolve");
        };
        let previous_node = previous_pos.parent();

        if depth != 1 {
            return self.decline("block is nested");
        }
        let block = cursor.node(depth);
        if block.node_type == self.container || previous_node.node_type != self.container {
            return Outcome::Decline;
        }

        // `previous - 1` is the end of the container's last child
        let target = previous - 1;
        let Some(target_pos) = doc.resolve(target) else {
            return self.decline("container end does not resolve");
        };
        let content = fit_into(target_pos.parent().node_type, block.content.clone());

        let mut transaction = Transaction::new()
            .delete(before, before + block.node_size())
            .select_near(target);
        if !content.is_empty() {
            transaction = transaction.insert(target, content);
        }
        state.check(&self.name, transaction)
    }
}

/// The block's children reshaped for the node they land in. Inline content
/// goes straight into a textblock; anywhere else it is wrapped the way the
/// receiving node's content rule asks for (a paragraph in a tab, a list item
/// in a list).
fn fit_into(parent: NodeType, content: Vec<Node>) -> Vec<Node> {
    if content.is_empty() || parent.is_textblock() {
        content
    } else {
        fit(parent, content)
    }
}
