//! Tab inside a code block indents instead of moving focus

use super::{EditorState, Key, KeyCommand, Outcome, Transaction};
use crate::model::Node;
use crate::schema::NodeType;

/// Two non-breaking spaces: what a Tab press inserts in code.
pub const TAB_INDENT: &str = "\u{a0}\u{a0}";

#[derive(Debug, Clone, Copy, Default)]
pub struct CodeIndent;

impl KeyCommand for CodeIndent {
    fn name(&self) -> &str {
        "codeIndent"
    }

    fn run(&self, state: &EditorState, key: Key) -> Outcome {
        if key != Key::Tab {
            return Outcome::Decline;
        }
        let (from, to) = (state.selection.from(), state.selection.to());
        let in_code = |pos: usize| {
            state
                .doc
                .resolve(pos)
                .is_some_and(|p| p.parent().node_type == NodeType::CodeBlock)
        };
        if !in_code(from) || !in_code(to) {
            return Outcome::Decline;
        }

        let mut transaction = Transaction::new();
        if from != to {
            transaction = transaction.delete(from, to);
        }
        let transaction = transaction.insert(from, vec![Node::text(TAB_INDENT)]);
        state.check(self.name(), transaction)
    }
}
