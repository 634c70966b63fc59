//! Shared icon mapping for tree visualization
//!
//! One Unicode character per node type so that `treeviz` output (and anything
//! else that draws trees, like `quire inspect`) stays consistent.

use crate::schema::NodeType;

/// Get the Unicode icon for a node type
pub fn get_icon(node_type: NodeType) -> &'static str {
    match node_type {
        NodeType::Doc => "⧉",
        NodeType::Paragraph => "¶",
        NodeType::Text => "◦",
        NodeType::Heading => "§",
        NodeType::Blockquote => "❝",
        NodeType::BulletList | NodeType::OrderedList => "☰",
        NodeType::ListItem => "•",
        NodeType::TaskList => "☑",
        NodeType::TaskItem => "☐",
        NodeType::CodeBlock => "𝒱",
        NodeType::HorizontalRule => "⎯",
        NodeType::HardBreak => "↵",
        NodeType::Callout => "ℹ",
        NodeType::Tabs => "⊟",
        NodeType::Tab => "⊤",
        NodeType::Details => "▸",
        NodeType::DetailsSummary => "⊤",
        NodeType::DetailsContent => "➔",
        NodeType::MathInline | NodeType::MathBlock => "√",
        NodeType::Table => "▦",
        NodeType::TableRow => "═",
        NodeType::TableHeader | NodeType::TableCell => "▢",
        NodeType::Image => "▣",
        NodeType::Video | NodeType::Youtube => "▶",
        NodeType::Attachment => "⎘",
        NodeType::Embed => "⧈",
        NodeType::Drawio | NodeType::Excalidraw => "✎",
    }
}
