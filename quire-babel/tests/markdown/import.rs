//! Import tests for Markdown format (Markdown → tree)

use crate::common::{block_types, setup_page};
use insta::assert_snapshot;
use quire_babel::formats::markdown::parser::parse_from_markdown;
use quire_babel::formats::markdown::serialize_to_markdown;
use quire_babel::formats::treeviz::to_treeviz_str;
use quire_babel::schema::validate;
use quire_babel::NodeType;

#[test]
fn test_import_page_tree() {
    let doc = parse_from_markdown("## Setup\n\n:::warning\nBack up first\n:::\n").unwrap();
    assert_snapshot!(to_treeviz_str(&doc), @r#"
    ⧉ doc (2 blocks, size 24)
    ├─ § heading {level=2} "Setup"
    └─ ℹ callout {type=warning}
      └─ ¶ paragraph "Back up first"
    "#);
}

#[test]
fn test_exported_page_imports_back() {
    let original = setup_page();
    let md = serialize_to_markdown(&original).unwrap();
    let doc = parse_from_markdown(&md).unwrap();

    assert!(validate(&doc).is_ok());
    assert_eq!(block_types(&doc), block_types(&original));

    // inline content and attributes survive
    assert_eq!(doc.content[1], original.content[1]);
    assert_eq!(doc.content[2], original.content[2]);
    assert_eq!(doc.content[3], original.content[3]);

    let code = &doc.content[4];
    assert_eq!(code.attr_str("language"), Some("rust"));
    assert_eq!(code.text_content().trim_end(), "fn main() {}");

    let tasks = &doc.content[5];
    assert!(tasks.content[0].attr_bool("checked"));
    assert!(!tasks.content[1].attr_bool("checked"));
    assert_eq!(tasks.content[1].text_content(), "Configure");
}

#[test]
fn test_directives_inside_code_are_left_alone() {
    let doc = parse_from_markdown("```md\n:::tip\nnot a callout\n:::\n```\n").unwrap();
    assert_eq!(doc.content.len(), 1);
    assert_eq!(doc.content[0].node_type, NodeType::CodeBlock);
    assert!(doc.content[0].text_content().starts_with(":::tip"));
}

#[test]
fn test_unknown_callout_type_imports_as_info() {
    let doc = parse_from_markdown(":::spooky\nBoo\n:::\n").unwrap();
    assert_eq!(doc.content[0].node_type, NodeType::Callout);
    assert_eq!(doc.content[0].attr_str("type"), Some("info"));
}

#[test]
fn test_gfm_table_imports() {
    let doc = parse_from_markdown("| a | b |\n|---|---|\n| 1 | 2 |\n").unwrap();
    let table = &doc.content[0];
    assert_eq!(table.node_type, NodeType::Table);
    assert_eq!(table.content.len(), 2);
    assert_eq!(table.content[0].content[0].node_type, NodeType::TableHeader);
    assert_eq!(table.content[1].content[1].text_content(), "2");
}

#[test]
fn test_empty_source_is_a_valid_doc() {
    let doc = parse_from_markdown("").unwrap();
    assert!(validate(&doc).is_ok());
    assert_eq!(block_types(&doc), ["paragraph"]);
}
