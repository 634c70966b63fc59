//! Block type commands: wrap, lift and retype the block around the cursor

use super::{EditorState, Outcome, Transaction};
use crate::model::{Attrs, Node, ResolvedPos, TextSelection};
use crate::schema::content::fit;
use crate::schema::NodeType;

/// Lift the cursor's block out of the nearest `node_type` ancestor, or wrap
/// the cursor's textblock in a new `node_type` node when there is none.
///
/// Wrapping fills whatever the wrapper requires between itself and the
/// block, so wrapping a paragraph in `tabs` yields `tabs > tab > paragraph`.
pub fn toggle_wrap(state: &EditorState, node_type: NodeType, attrs: &Attrs) -> Outcome {
    let name = format!("toggleWrap({})", node_type.name());
    let Some(cursor) = state.doc.resolve(state.selection.from()) else {
        return Outcome::Decline;
    };
    let depth = cursor.depth();

    if let Some(d) = (1..depth).rev().find(|&d| cursor.node(d).node_type == node_type) {
        return lift(state, &name, &cursor, d);
    }

    if depth == 0 || !cursor.parent().node_type.is_textblock() {
        tracing::debug!(command = %name, "declined: cursor is not in a textblock");
        return Outcome::Decline;
    }
    let Some(before) = cursor.before(depth) else {
        return Outcome::Decline;
    };
    let block = cursor.parent();
    let wrapper = Node::new(node_type)
        .with_attrs(attrs)
        .with_content(fit(node_type, vec![block.clone()]));

    let transaction = Transaction::new()
        .delete(before, before + block.node_size())
        .insert(before, vec![wrapper.clone()]);
    let transaction = match nesting(&wrapper, block) {
        Some(levels) => transaction.set_selection(shift(state.selection, levels as isize)),
        None => transaction.select_near(before + 1),
    };
    state.check(&name, transaction)
}

/// Move the child of the ancestor at `depth` holding the cursor out into the
/// ancestor's parent, splitting the ancestor around it.
fn lift(state: &EditorState, name: &str, cursor: &ResolvedPos<'_>, depth: usize) -> Outcome {
    let Some(before) = cursor.before(depth) else {
        return Outcome::Decline;
    };
    let wrapper = cursor.node(depth);
    let index = cursor.index(depth);
    let Some(lifted) = wrapper.content.get(index) else {
        return Outcome::Decline;
    };
    let leading = &wrapper.content[..index];
    let trailing = &wrapper.content[index + 1..];

    let mut replacement = Vec::new();
    if !leading.is_empty() {
        replacement.push(wrapper.clone().with_content(leading.to_vec()));
    }
    replacement.push(lifted.clone());
    if !trailing.is_empty() {
        replacement.push(wrapper.clone().with_content(trailing.to_vec()));
    }

    // the lifted block loses the wrapper's opening token, or gains a closing
    // one when a leading part stays behind
    let delta = if leading.is_empty() { -1 } else { 1 };
    let transaction = Transaction::new()
        .delete(before, before + wrapper.node_size())
        .insert(before, replacement)
        .set_selection(shift(state.selection, delta));
    state.check(name, transaction)
}

/// Change the cursor's textblock into `node_type`, keeping its content where
/// the new type allows it.
pub fn set_node(state: &EditorState, node_type: NodeType, attrs: &Attrs) -> Outcome {
    let name = format!("setNode({})", node_type.name());
    if !node_type.is_textblock() {
        tracing::debug!(command = %name, "declined: target is not a textblock");
        return Outcome::Decline;
    }
    let Some(cursor) = state.doc.resolve(state.selection.from()) else {
        return Outcome::Decline;
    };
    let depth = cursor.depth();
    let block = cursor.parent();
    let Some(before) = cursor.before(depth).filter(|_| block.node_type.is_textblock()) else {
        tracing::debug!(command = %name, "declined: cursor is not in a textblock");
        return Outcome::Decline;
    };

    let replacement = Node::new(node_type)
        .with_attrs(attrs)
        .with_content(fit(node_type, block.content.clone()));
    let same_size = replacement.node_size() == block.node_size();

    let transaction = Transaction::new()
        .delete(before, before + block.node_size())
        .insert(before, vec![replacement]);
    let transaction = if same_size {
        transaction.set_selection(state.selection)
    } else {
        transaction.select_near(state.selection.from())
    };
    state.check(&name, transaction)
}

/// How many levels below `wrapper` the first-child chain reaches `block`.
fn nesting(wrapper: &Node, block: &Node) -> Option<usize> {
    let mut node = wrapper;
    let mut levels = 0;
    while node != block {
        node = node.content.first()?;
        levels += 1;
    }
    Some(levels)
}

fn shift(selection: TextSelection, delta: isize) -> TextSelection {
    let apply = |pos: usize| pos.saturating_add_signed(delta);
    TextSelection::new(apply(selection.anchor), apply(selection.head))
}
