//! Editing commands
//!
//! Commands are pure: they read an [`EditorState`] and either decline or hand
//! back a [`Transaction`]. Nothing is mutated until the caller applies the
//! transaction, and a transaction that would break the schema fails as a
//! whole.
//!
//! Key-bound commands implement [`KeyCommand`] and are dispatched through a
//! [`Keymap`]: handlers run in registration order and the first one that does
//! not decline wins.

pub mod code_block;
pub mod merge;
pub mod transaction;
pub mod wrap;

pub use code_block::CodeIndent;
pub use merge::ContainerMerge;
pub use transaction::{EditError, Step, Transaction};
pub use wrap::{set_node, toggle_wrap};

use crate::model::{Node, TextSelection};
use crate::schema::NodeType;
use std::fmt;
use std::str::FromStr;

/// Keys the keymap dispatches on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Backspace,
    Delete,
    Enter,
    Tab,
}

impl Key {
    pub const ALL: &'static [Key] = &[Key::Backspace, Key::Delete, Key::Enter, Key::Tab];

    pub fn name(self) -> &'static str {
        match self {
            Key::Backspace => "Backspace",
            Key::Delete => "Delete",
            Key::Enter => "Enter",
            Key::Tab => "Tab",
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Key {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Key::ALL
            .iter()
            .copied()
            .find(|key| key.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("Unknown key '{s}'"))
    }
}

/// A document with a selection.
#[derive(Debug, Clone, PartialEq)]
pub struct EditorState {
    pub doc: Node,
    pub selection: TextSelection,
}

impl EditorState {
    pub fn new(doc: Node, selection: TextSelection) -> Self {
        EditorState { doc, selection }
    }

    /// The state after `transaction`; `self` is left as it was on error.
    pub fn apply(&self, transaction: &Transaction) -> Result<EditorState, EditError> {
        let (doc, selection) = transaction.apply(&self.doc, self.selection)?;
        Ok(EditorState { doc, selection })
    }

    /// Dry-run `transaction`, turning failure into a decline.
    pub(crate) fn check(&self, command: &str, transaction: Transaction) -> Outcome {
        match transaction.apply(&self.doc, self.selection) {
            Ok(_) => Outcome::Apply(transaction),
            Err(err) => {
                tracing::debug!(command, error = %err, "declined: transaction does not apply");
                Outcome::Decline
            }
        }
    }
}

/// What a command decided.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Decline,
    Apply(Transaction),
}

impl Outcome {
    pub fn is_decline(&self) -> bool {
        matches!(self, Outcome::Decline)
    }

    pub fn transaction(self) -> Option<Transaction> {
        match self {
            Outcome::Apply(tr) => Some(tr),
            Outcome::Decline => None,
        }
    }
}

/// A command bound to keys.
pub trait KeyCommand: Send + Sync {
    fn name(&self) -> &str;

    fn run(&self, state: &EditorState, key: Key) -> Outcome;
}

/// Ordered key handlers.
#[derive(Default)]
pub struct Keymap {
    commands: Vec<Box<dyn KeyCommand>>,
}

impl Keymap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<C: KeyCommand + 'static>(&mut self, command: C) {
        self.commands.push(Box::new(command));
    }

    /// Run handlers in order until one does not decline.
    pub fn handle(&self, state: &EditorState, key: Key) -> Outcome {
        for command in &self.commands {
            let outcome = command.run(state, key);
            if !outcome.is_decline() {
                tracing::trace!(command = command.name(), %key, "key handled");
                return outcome;
            }
        }
        Outcome::Decline
    }

    pub fn names(&self) -> Vec<&str> {
        self.commands.iter().map(|c| c.name()).collect()
    }

    /// Container merges for callouts and tabs, then code indentation.
    pub fn with_defaults() -> Self {
        let mut keymap = Keymap::new();
        keymap.register(ContainerMerge::new(NodeType::Callout));
        keymap.register(ContainerMerge::new(NodeType::Tab));
        keymap.register(ContainerMerge::new(NodeType::Tabs));
        keymap.register(CodeIndent);
        keymap
    }
}
