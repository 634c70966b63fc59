//! Shared document fixtures.

use quire_babel::schema::content::create_and_fill;
use quire_babel::{Mark, MarkType, Node, NodeType};

/// A page using every container the docs site knows about.
pub fn setup_page() -> Node {
    let intro = Node::new(NodeType::Paragraph).with_content(vec![
        Node::text("Read "),
        Node::text("this").with_marks(vec![Mark::new(MarkType::Bold)]),
        Node::text(" first"),
    ]);
    let callout = Node::new(NodeType::Callout)
        .with_attr("type", "warning")
        .with_content(vec![Node::paragraph("Back up first")]);
    let tabs = Node::new(NodeType::Tabs).with_content(vec![
        tab("Mac OS", "brew install quire"),
        tab("Linux", "apt install quire"),
    ]);
    let code = Node::new(NodeType::CodeBlock)
        .with_attr("language", "rust")
        .with_content(vec![Node::text("fn main() {}")]);
    let tasks = Node::new(NodeType::TaskList).with_content(vec![
        task("Install", true),
        task("Configure", false),
    ]);

    Node::doc(vec![
        heading(2, "Setup"),
        intro,
        callout,
        tabs,
        code,
        tasks,
    ])
}

pub fn heading(level: i64, text: &str) -> Node {
    Node::new(NodeType::Heading)
        .with_attr("level", level)
        .with_content(vec![Node::text(text)])
}

pub fn tab(title: &str, text: &str) -> Node {
    Node::new(NodeType::Tab)
        .with_attr("title", title)
        .with_content(vec![Node::paragraph(text)])
}

pub fn task(text: &str, checked: bool) -> Node {
    Node::new(NodeType::TaskItem)
        .with_attr("checked", checked)
        .with_content(vec![Node::paragraph(text)])
}

pub fn callout(callout_type: &str, paragraphs: &[&str]) -> Node {
    Node::new(NodeType::Callout)
        .with_attr("type", callout_type)
        .with_content(paragraphs.iter().map(|p| Node::paragraph(p)).collect())
}

/// An empty details block, filled the way the editor inserts one.
pub fn empty_details() -> Node {
    create_and_fill(NodeType::Details)
}

/// Node type names of the top-level blocks.
pub fn block_types(doc: &Node) -> Vec<&'static str> {
    doc.content.iter().map(|n| n.node_type.name()).collect()
}
