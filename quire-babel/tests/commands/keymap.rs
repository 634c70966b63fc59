//! Key handling on documents that came in through the importers

use crate::common::tab;
use quire_babel::commands::code_block::TAB_INDENT;
use quire_babel::formats::markdown::parser::parse_from_markdown;
use quire_babel::schema::validate;
use quire_babel::{EditorState, Key, Keymap, Node, NodeType, Outcome, TextSelection};

fn press(state: &EditorState, key: Key) -> Option<EditorState> {
    match Keymap::with_defaults().handle(state, key) {
        Outcome::Apply(transaction) => Some(state.apply(&transaction).unwrap()),
        Outcome::Decline => None,
    }
}

#[test]
fn test_default_keymap_order() {
    assert_eq!(
        Keymap::with_defaults().names(),
        vec![
            "containerMerge(callout)",
            "containerMerge(tab)",
            "containerMerge(tabs)",
            "codeIndent"
        ]
    );
}

#[test]
fn test_backspace_pulls_paragraph_into_imported_callout() {
    let doc = parse_from_markdown(":::info\nFirst\n:::\n\nSecond\n").unwrap();
    // callout(0) paragraph(1) "First"(2..7); "Second" starts at 10
    let state = EditorState::new(doc, TextSelection::cursor(10));

    let next = press(&state, Key::Backspace).expect("merge applies");
    assert!(validate(&next.doc).is_ok());
    assert_eq!(next.doc.content.len(), 1);
    assert_eq!(next.doc.content[0].node_type, NodeType::Callout);
    assert_eq!(next.doc.content[0].text_content(), "FirstSecond");
    assert_eq!(next.selection, TextSelection::cursor(13));
}

#[test]
fn test_backspace_joins_paragraph_into_last_tab() {
    let tabs = Node::new(NodeType::Tabs).with_content(vec![tab("One", "a"), tab("Two", "b")]);
    let doc = Node::doc(vec![tabs, Node::paragraph("after")]);
    let start = doc.content[0].node_size() + 1;
    let state = EditorState::new(doc, TextSelection::cursor(start));

    let next = press(&state, Key::Backspace).expect("merge applies");
    let tabs = &next.doc.content[0];
    assert_eq!(next.doc.content.len(), 1);
    assert_eq!(tabs.content.len(), 2);
    assert_eq!(tabs.content[1].content.len(), 2);
    assert_eq!(tabs.content[1].content[1].text_content(), "after");
}

#[test]
fn test_backspace_mid_paragraph_is_left_to_the_editor() {
    let doc = parse_from_markdown(":::info\nFirst\n:::\n\nSecond\n").unwrap();
    let state = EditorState::new(doc, TextSelection::cursor(12));
    assert!(press(&state, Key::Backspace).is_none());
}

#[test]
fn test_tab_indents_imported_code() {
    let doc = parse_from_markdown("```rust\nlet x = 1;\n```\n").unwrap();
    let state = EditorState::new(doc, TextSelection::cursor(1));

    let next = press(&state, Key::Tab).expect("indent applies");
    let code = &next.doc.content[0];
    assert!(code.text_content().starts_with(&format!("{TAB_INDENT}let x")));
    assert_eq!(code.attr_str("language"), Some("rust"));
    assert_eq!(next.selection, TextSelection::cursor(1 + TAB_INDENT.chars().count()));
}

#[test]
fn test_unbound_keys_decline() {
    let doc = parse_from_markdown("Hello\n").unwrap();
    let state = EditorState::new(doc, TextSelection::cursor(1));
    for key in [Key::Enter, Key::Delete, Key::Tab] {
        assert!(press(&state, key).is_none(), "{key} should decline");
    }
}
