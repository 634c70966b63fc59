//! Wrapping and node-type changes

use crate::common::callout;
use quire_babel::commands::{set_node, toggle_wrap};
use quire_babel::schema::{default_attrs, validate};
use quire_babel::{to_text, Attrs, EditorState, Node, NodeType, TextSelection};
use serde_json::json;

fn apply(state: &EditorState, outcome: quire_babel::Outcome) -> EditorState {
    let transaction = outcome.transaction().expect("command applies");
    state.apply(&transaction).unwrap()
}

#[test]
fn test_wrap_then_unwrap_restores_the_document() {
    let doc = Node::doc(vec![Node::paragraph("Intro"), Node::paragraph("Careful")]);
    // inside "Careful"
    let state = EditorState::new(doc.clone(), TextSelection::cursor(10));

    let mut attrs = Attrs::new();
    attrs.insert("type".to_string(), json!("danger"));
    let wrapped = apply(&state, toggle_wrap(&state, NodeType::Callout, &attrs));
    assert_eq!(wrapped.doc.content[1], callout("danger", &["Careful"]));
    assert!(validate(&wrapped.doc).is_ok());

    let unwrapped = apply(
        &wrapped,
        toggle_wrap(&wrapped, NodeType::Callout, &default_attrs(NodeType::Callout)),
    );
    assert_eq!(unwrapped.doc, doc);
    assert_eq!(unwrapped.selection, state.selection);
}

#[test]
fn test_set_node_keeps_text() {
    let doc = Node::doc(vec![Node::paragraph("Title"), Node::paragraph("Body")]);
    let state = EditorState::new(doc, TextSelection::cursor(3));

    let mut attrs = Attrs::new();
    attrs.insert("level".to_string(), json!(3));
    let next = apply(&state, set_node(&state, NodeType::Heading, &attrs));

    assert_eq!(next.doc.content[0].node_type, NodeType::Heading);
    assert_eq!(next.doc.content[0].attr_i64("level"), Some(3));
    assert_eq!(to_text(&next.doc), "Title\n\nBody");
    assert_eq!(next.selection, TextSelection::cursor(3));
}

#[test]
fn test_wrap_declines_for_inline_targets() {
    let doc = Node::doc(vec![Node::paragraph("x")]);
    let state = EditorState::new(doc, TextSelection::cursor(1));
    assert!(toggle_wrap(&state, NodeType::Text, &Attrs::new()).is_decline());
}
