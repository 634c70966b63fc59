//! Interchange engine for quire documents
//!
//!     The editor keeps documents as a typed tree of block and inline nodes. This crate owns
//!     that tree's contract (the schema) and every conversion in and out of it: HTML for display
//!     and clipboard, extended Markdown for export to the docs site, plain text for search, and
//!     the lossless document JSON. It also hosts the pure editing commands that the editor binds
//!     to keys.
//!
//!     This is a pure lib: no I/O, no environment, no printing. The CLI (quire-cli) and the
//!     configuration layer (quire-config) sit on top of it.
//!
//! Architecture
//!
//!     .
//!     ├── schema                  # Node/mark types, attribute normalization, content constraints
//!     ├── model                   # Node tree, positions, selections
//!     ├── common                  # DOM and CSS helpers shared by html and markdown
//!     ├── format.rs               # Format trait and Direction
//!     ├── registry.rs             # FormatRegistry built from FormatOptions
//!     ├── formats
//!     │   ├── html                # renderer + parser
//!     │   ├── markdown            # HTML → Markdown rules, Markdown import
//!     │   ├── text                # plain-text extraction
//!     │   ├── json                # document JSON
//!     │   └── treeviz             # debugging tree view
//!     └── commands                # key commands and transactions
//!
//!     The schema is the leaf everything else depends on. Every way a node can come into
//!     existence (builders, HTML parse, JSON payloads) routes its attributes through
//!     `schema::normalize_attrs` and its children through `schema::content::fit` or
//!     `schema::validate`, so the rest of the crate can rely on well-formed trees.
//!
//! Markdown
//!
//!     Markdown export goes through HTML: the tree is rendered, then the HTML is converted by an
//!     ordered rule list (first match wins). This keeps the Markdown output identical whether it
//!     starts from a tree or from HTML pasted from elsewhere. Import goes the other way: comrak
//!     renders CommonMark to HTML, which the HTML parser turns into a tree.
//!
//! Commands
//!
//!     Commands never touch the document. They read an `EditorState` and return a `Transaction`
//!     (or decline); the caller applies it, and application either fully succeeds with a valid
//!     tree or leaves everything as it was.
//!
//! Testing
//!     tests
//!     ├── <format>
//!     │   └── <testname>.rs
//!     └── fixtures
//!
//!     Note that rust does not by default discover tests in subdirectories, so we need to include
//!     these in the mod.
pub mod commands;
pub mod common;
pub mod error;
pub mod format;
pub mod formats;
pub mod model;
pub mod registry;
pub mod schema;

pub use commands::{EditorState, Key, Keymap, Outcome, Transaction};
pub use error::FormatError;
pub use format::{Direction, Format};
pub use model::{Attrs, Mark, Node, TextSelection};
pub use registry::{FormatOptions, FormatRegistry};
pub use schema::{MarkType, NodeType};

use formats::markdown::MarkdownOptions;

/// Render a tree to the editor's HTML.
pub fn render_html(doc: &Node) -> Result<String, FormatError> {
    formats::html::serialize_to_html(doc)
}

/// Parse HTML into a fitted, normalized tree.
pub fn parse_html(html: &str) -> Result<Node, FormatError> {
    formats::html::parse_from_html(html)
}

/// Convert editor HTML to extended Markdown with the default options.
pub fn to_markdown(html: &str) -> String {
    formats::markdown::html_to_markdown(html, &MarkdownOptions::default())
}

/// Flatten a tree to plain text.
pub fn to_text(doc: &Node) -> String {
    formats::text::serialize_to_text(doc)
}
