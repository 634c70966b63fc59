//! Parsing tests (HTML → tree), including round trips through the renderer

use crate::common::{block_types, empty_details, setup_page};
use proptest::prelude::*;
use quire_babel::schema::validate;
use quire_babel::{parse_html, render_html, to_text, Node, NodeType};

#[test]
fn test_page_round_trips_through_html() {
    let doc = setup_page();
    let html = render_html(&doc).unwrap();
    assert_eq!(parse_html(&html).unwrap(), doc);
}

#[test]
fn test_details_round_trips_through_html() {
    let doc = Node::doc(vec![empty_details().with_attr("open", true)]);
    let html = render_html(&doc).unwrap();
    assert_eq!(parse_html(&html).unwrap(), doc);
}

#[test]
fn test_pasted_html_is_fitted() {
    // loose text, an unknown wrapper and a list item without a paragraph
    let html = "Intro<section><ul><li>one</li></ul></section><h7>odd</h7>";
    let doc = parse_html(html).unwrap();
    assert!(validate(&doc).is_ok());
    assert_eq!(block_types(&doc)[..2], ["paragraph", "bulletList"]);
    let item = &doc.content[1].content[0];
    assert_eq!(item.content[0].node_type, NodeType::Paragraph);
    assert_eq!(item.text_content(), "one");
}

#[test]
fn test_unknown_callout_type_becomes_info() {
    let html = "<div data-type=\"callout\" data-callout-type=\"shout\"><p>x</p></div>";
    let doc = parse_html(html).unwrap();
    assert_eq!(doc.content[0].attr_str("type"), Some("info"));
}

#[test]
fn test_empty_tabs_get_a_tab() {
    let doc = parse_html("<div data-type=\"tabs\"></div>").unwrap();
    let tabs = &doc.content[0];
    assert_eq!(tabs.node_type, NodeType::Tabs);
    assert_eq!(tabs.content.len(), 1);
    assert_eq!(tabs.content[0].node_type, NodeType::Tab);
    assert_eq!(tabs.content[0].attr_str("title"), Some("New Tab"));
}

#[test]
fn test_text_of_parsed_page() {
    let doc = parse_html("<h1>Title</h1><p>One <em>two</em></p>").unwrap();
    assert_eq!(to_text(&doc), "Title\n\nOne two");
}

#[test]
fn test_whitespace_runs_collapse() {
    let doc = Node::doc(vec![Node::paragraph("a  b\tc\n d")]);
    let html = render_html(&doc).unwrap();
    assert_eq!(html, "<p>a  b\tc\n d</p>");
    assert_eq!(
        parse_html(&html).unwrap(),
        Node::doc(vec![Node::paragraph("a b c d")])
    );
}

proptest! {
    #[test]
    fn paragraphs_round_trip(words in proptest::collection::vec("[a-zA-Z0-9]{1,12}", 1..8)) {
        let text = words.join(" ");
        let doc = Node::doc(vec![Node::paragraph(&text)]);
        let html = render_html(&doc).unwrap();
        prop_assert_eq!(parse_html(&html).unwrap(), doc);
    }
}
