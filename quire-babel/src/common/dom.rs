//! Helpers over the `markup5ever_rcdom` DOM
//!
//! Both directions of the HTML interchange go through an RcDom: the renderer
//! builds one and serializes it with html5ever, the parser and the Markdown
//! serializer walk the one html5ever builds from a string.

use crate::error::FormatError;
use html5ever::tendril::TendrilSink;
use html5ever::{
    ns, parse_document, serialize, serialize::SerializeOpts, serialize::TraversalScope,
    Attribute, LocalName, QualName,
};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom, SerializableHandle};
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

/// Parse an HTML string (document or fragment) into a DOM.
pub fn parse_html(source: &str) -> RcDom {
    parse_document(RcDom::default(), Default::default()).one(source)
}

/// The `<body>` element of a parsed document.
pub fn find_body(document: &Handle) -> Option<Handle> {
    find_first(document, &|node| is_element(node, "body"))
}

/// Create an element node
pub fn create_element(tag: &str, attrs: Vec<(&str, String)>) -> Handle {
    let qual_name = QualName::new(None, ns!(html), LocalName::from(tag));
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: QualName::new(None, ns!(), LocalName::from(name)),
            value: value.into(),
        })
        .collect();

    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Element {
            name: qual_name,
            attrs: RefCell::new(attributes),
            template_contents: Default::default(),
            mathml_annotation_xml_integration_point: false,
        },
    })
}

/// Create a text node
pub fn create_text(text: &str) -> Handle {
    Rc::new(Node {
        parent: Cell::new(None),
        children: RefCell::new(Vec::new()),
        data: NodeData::Text {
            contents: RefCell::new(text.to_string().into()),
        },
    })
}

pub fn append(parent: &Handle, child: Handle) {
    child.parent.set(Some(Rc::downgrade(parent)));
    parent.children.borrow_mut().push(child);
}

/// Serialize nodes (each including itself) to an HTML string
pub fn serialize_nodes(nodes: &[Handle]) -> Result<String, FormatError> {
    let mut output = Vec::new();
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    for node in nodes {
        let serializable = SerializableHandle::from(node.clone());
        serialize(&mut output, &serializable, opts.clone()).map_err(|e| {
            FormatError::SerializationError(format!("HTML serialization failed: {e}"))
        })?;
    }

    String::from_utf8(output)
        .map_err(|e| FormatError::SerializationError(format!("UTF-8 conversion failed: {e}")))
}

/// Lowercase local name of an element, `None` for other node kinds.
pub fn tag_name(node: &Handle) -> Option<&str> {
    match &node.data {
        NodeData::Element { name, .. } => Some(&*name.local),
        _ => None,
    }
}

pub fn is_element(node: &Handle, tag: &str) -> bool {
    tag_name(node) == Some(tag)
}

pub fn attr(node: &Handle, name: &str) -> Option<String> {
    match &node.data {
        NodeData::Element { attrs, .. } => attrs
            .borrow()
            .iter()
            .find(|a| &*a.name.local == name)
            .map(|a| a.value.to_string()),
        _ => None,
    }
}

pub fn has_attr(node: &Handle, name: &str) -> bool {
    attr(node, name).is_some()
}

pub fn class_list(node: &Handle) -> Vec<String> {
    attr(node, "class")
        .map(|classes| classes.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

pub fn has_class(node: &Handle, class: &str) -> bool {
    class_list(node).iter().any(|c| c == class)
}

/// Text of a text node.
pub fn text(node: &Handle) -> Option<String> {
    match &node.data {
        NodeData::Text { contents } => Some(contents.borrow().to_string()),
        _ => None,
    }
}

pub fn parent(node: &Handle) -> Option<Handle> {
    let weak = node.parent.take();
    let parent = weak.as_ref().and_then(Weak::upgrade);
    node.parent.set(weak);
    parent
}

pub fn children(node: &Handle) -> Vec<Handle> {
    node.children.borrow().clone()
}

pub fn element_children(node: &Handle) -> Vec<Handle> {
    node.children
        .borrow()
        .iter()
        .filter(|c| tag_name(c).is_some())
        .cloned()
        .collect()
}

pub fn first_child(node: &Handle) -> Option<Handle> {
    node.children.borrow().first().cloned()
}

pub fn first_element_child(node: &Handle) -> Option<Handle> {
    element_children(node).into_iter().next()
}

fn sibling(node: &Handle, step: isize) -> Option<Handle> {
    let parent = parent(node)?;
    let siblings = parent.children.borrow();
    let index = siblings.iter().position(|s| Rc::ptr_eq(s, node))?;
    let target = index.checked_add_signed(step)?;
    siblings.get(target).cloned()
}

pub fn previous_sibling(node: &Handle) -> Option<Handle> {
    sibling(node, -1)
}

pub fn next_sibling(node: &Handle) -> Option<Handle> {
    sibling(node, 1)
}

/// Index of `node` among its parent's element children.
pub fn element_index(node: &Handle) -> Option<usize> {
    let parent = parent(node)?;
    element_children(&parent)
        .iter()
        .position(|s| Rc::ptr_eq(s, node))
}

/// Concatenated text of every descendant text node.
pub fn text_content(node: &Handle) -> String {
    let mut out = String::new();
    collect_text(node, &mut out);
    out
}

fn collect_text(node: &Handle, out: &mut String) {
    if let NodeData::Text { contents } = &node.data {
        out.push_str(&contents.borrow());
    }
    for child in node.children.borrow().iter() {
        collect_text(child, out);
    }
}

/// First descendant (depth-first, excluding `node`) matching `predicate`.
pub fn find_first(node: &Handle, predicate: &dyn Fn(&Handle) -> bool) -> Option<Handle> {
    for child in node.children.borrow().iter() {
        if predicate(child) {
            return Some(child.clone());
        }
        if let Some(found) = find_first(child, predicate) {
            return Some(found);
        }
    }
    None
}

/// Whether any ancestor of `node` is a `tag` element.
pub fn has_ancestor(node: &Handle, tag: &str) -> bool {
    let mut current = parent(node);
    while let Some(ancestor) = current {
        if is_element(&ancestor, tag) {
            return true;
        }
        current = parent(&ancestor);
    }
    false
}
