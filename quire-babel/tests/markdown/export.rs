//! Export tests for Markdown format (tree → Markdown)
//!
//! Most of these re-parse the output with comrak and check the resulting AST,
//! so they hold regardless of incidental whitespace.

use crate::common::{callout, heading, setup_page};
use comrak::nodes::{AstNode, NodeValue};
use comrak::{parse_document, Arena, Options};
use proptest::prelude::*;
use quire_babel::formats::markdown::code_block::fence_length;
use quire_babel::formats::markdown::{html_to_markdown, serialize_to_markdown, MarkdownOptions};
use quire_babel::{Node, NodeType};

fn to_comrak_ast<'a>(doc: &Node, arena: &'a Arena<AstNode<'a>>) -> &'a AstNode<'a> {
    let md = serialize_to_markdown(doc).unwrap();
    parse_document(arena, &md, &Options::default())
}

fn inline_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut out = String::new();
    for child in node.descendants() {
        if let NodeValue::Text(text) = &child.data.borrow().value {
            out.push_str(text);
        }
    }
    out
}

#[test]
fn test_heading_and_paragraph() {
    let doc = Node::doc(vec![heading(2, "Setup"), Node::paragraph("Body text.")]);

    let arena = Arena::new();
    let root = to_comrak_ast(&doc, &arena);

    let mut heading_text = None;
    let mut paragraph_text = None;
    for child in root.children() {
        match &child.data.borrow().value {
            NodeValue::Heading(h) => {
                assert_eq!(h.level, 2);
                heading_text = Some(inline_text(child));
            }
            NodeValue::Paragraph if paragraph_text.is_none() => {
                paragraph_text = Some(inline_text(child));
            }
            _ => {}
        }
    }
    assert_eq!(heading_text.as_deref(), Some("Setup"));
    // the first paragraph holds the component imports
    assert!(paragraph_text.unwrap().starts_with("import Tabs"));
}

#[test]
fn test_code_block_survives_as_fenced_code() {
    let code = Node::new(NodeType::CodeBlock)
        .with_attr("language", "rust")
        .with_content(vec![Node::text("let fence = \"```\";\n```\nnested")]);

    let arena = Arena::new();
    let root = to_comrak_ast(&Node::doc(vec![code]), &arena);

    let blocks: Vec<_> = root
        .children()
        .filter_map(|child| match &child.data.borrow().value {
            NodeValue::CodeBlock(block) => Some((block.info.clone(), block.literal.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].0, "rust");
    assert_eq!(blocks[0].1, "let fence = \"```\";\n```\nnested\n");
}

#[test]
fn test_page_markdown() {
    let md = serialize_to_markdown(&setup_page()).unwrap();
    assert!(md.starts_with("import Tabs from '@theme/Tabs';\nimport TabItem from '@theme/TabItem';\n"));
    assert!(md.contains("## Setup"));
    assert!(md.contains("Read **this** first"));
    assert!(md.contains(":::warning\nBack up first\n:::"));
    assert!(md.contains("<Tabs>\n<TabItem value='macos' label='Mac OS'>\nbrew install quire\n</TabItem>"));
    assert!(md.contains("```rust\nfn main() {}\n```"));
    assert!(md.contains("- [x]  Install \n- [ ]  Configure"));
}

#[test]
fn test_callout_type_defaults_to_info() {
    let md = html_to_markdown(
        "<div data-type=\"callout\"><p>Plain</p></div>",
        &MarkdownOptions::default(),
    );
    assert!(md.ends_with(":::info\nPlain\n:::"));
}

#[test]
fn test_nested_callout_content_is_trimmed() {
    let doc = Node::doc(vec![callout("note", &["One", "Two"])]);
    let md = serialize_to_markdown(&doc).unwrap();
    assert!(md.contains(":::note\nOne\n\nTwo\n:::"));
}

proptest! {
    #[test]
    fn fence_outgrows_backtick_runs(run in 0usize..12, prefix in "[a-z ]{0,8}") {
        let code = format!("{}\n{prefix}", "`".repeat(run));
        let fence = fence_length(&code, '`');
        prop_assert!(fence >= 3);
        prop_assert!(fence > run);
    }
}
