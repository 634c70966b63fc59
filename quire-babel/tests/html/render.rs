//! Rendering tests (tree → HTML)

use crate::common::{callout, setup_page, tab};
use quire_babel::formats::html::{serialize_to_html_with_options, HtmlOptions};
use quire_babel::{render_html, Node, NodeType};

#[test]
fn test_render_callout_and_tabs() {
    let doc = Node::doc(vec![
        callout("tip", &["Short answer"]),
        Node::new(NodeType::Tabs).with_content(vec![tab("Linux", "apt")]),
    ]);
    assert_eq!(
        render_html(&doc).unwrap(),
        "<div data-type=\"callout\" data-callout-type=\"tip\"><p>Short answer</p></div>\
         <div data-type=\"tabs\"><div data-type=\"tab\" data-tab-title=\"Linux\"><p>apt</p></div></div>"
    );
}

#[test]
fn test_render_escapes_text() {
    let doc = Node::doc(vec![Node::paragraph("a < b & c")]);
    assert_eq!(render_html(&doc).unwrap(), "<p>a &lt; b &amp; c</p>");
}

#[test]
fn test_render_page_uses_every_container() {
    let html = render_html(&setup_page()).unwrap();
    assert!(html.starts_with("<h2>Setup</h2><p>Read <strong>this</strong> first</p>"));
    assert!(html.contains("data-callout-type=\"warning\""));
    assert!(html.contains("data-tab-title=\"Mac OS\""));
    assert!(html.contains("<code class=\"language-rust\">fn main() {}</code>"));
    assert!(html.contains("<ul data-type=\"taskList\">"));
}

#[test]
fn test_render_with_custom_language_prefix() {
    let code = Node::new(NodeType::CodeBlock)
        .with_attr("language", "python")
        .with_content(vec![Node::text("print(1)")]);
    let options = HtmlOptions {
        language_class_prefix: "lang-".to_string(),
        ..HtmlOptions::default()
    };
    let html = serialize_to_html_with_options(&Node::doc(vec![code]), &options).unwrap();
    assert_eq!(html, "<pre><code class=\"lang-python\">print(1)</code></pre>");
}
