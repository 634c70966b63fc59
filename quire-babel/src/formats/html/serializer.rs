//! HTML rendering (node tree → HTML)
//!
//! Each node type has one render rule producing an element and, for non-leaf
//! types, the "hole" element its children are rendered into. Text nodes are
//! wrapped in their marks, outermost mark first. Pipeline: tree → RcDom → HTML
//! string via html5ever.

use super::HtmlOptions;
use crate::common::dom::{append, create_element, create_text, serialize_nodes};
use crate::error::FormatError;
use crate::model::{Mark, Node};
use crate::schema::{AttrSpec, HtmlAttr, MarkType, NodeType};
use markup5ever_rcdom::Handle;
use serde_json::Value;

type HtmlAttrs = Vec<(&'static str, String)>;

/// Rendered element and the element children go into, if any
struct Rendered {
    dom: Handle,
    content: Option<Handle>,
}

impl Rendered {
    fn container(tag: &str, attrs: HtmlAttrs) -> Self {
        let dom = create_element(tag, attrs);
        Rendered {
            content: Some(dom.clone()),
            dom,
        }
    }

    fn leaf(tag: &str, attrs: HtmlAttrs) -> Self {
        Rendered {
            dom: create_element(tag, attrs),
            content: None,
        }
    }
}

/// Render a tree to HTML with default options
pub fn serialize_to_html(doc: &Node) -> Result<String, FormatError> {
    serialize_to_html_with_options(doc, &HtmlOptions::default())
}

/// Render a tree to HTML. A `doc` renders as the concatenation of its children.
pub fn serialize_to_html_with_options(
    doc: &Node,
    options: &HtmlOptions,
) -> Result<String, FormatError> {
    let renderer = Renderer { options };
    let nodes: Vec<Handle> = if doc.node_type == NodeType::Doc {
        doc.content.iter().map(|n| renderer.render(n)).collect()
    } else {
        vec![renderer.render(doc)]
    };
    serialize_nodes(&nodes)
}

struct Renderer<'a> {
    options: &'a HtmlOptions,
}

impl Renderer<'_> {
    fn render(&self, node: &Node) -> Handle {
        if node.is_text() {
            return render_text(node);
        }
        let Rendered { dom, content } = self.render_rule(node);
        if let Some(hole) = content {
            for child in &node.content {
                append(&hole, self.render(child));
            }
        }
        dom
    }

    fn render_rule(&self, node: &Node) -> Rendered {
        let attrs = html_attrs(node.node_type.spec().attrs, node);
        match node.node_type {
            NodeType::Doc => Rendered::container("div", attrs),
            NodeType::Text => Rendered {
                dom: create_text(node.text_str()),
                content: None,
            },
            NodeType::Paragraph => Rendered::container("p", attrs),
            NodeType::Heading => {
                let level = node.attr_i64("level").unwrap_or(1).clamp(1, 6);
                Rendered::container(&format!("h{level}"), attrs)
            }
            NodeType::Blockquote => Rendered::container("blockquote", attrs),
            NodeType::BulletList => Rendered::container("ul", attrs),
            NodeType::OrderedList => {
                let attrs = attrs
                    .into_iter()
                    .filter(|(name, value)| !(*name == "start" && value == "1"))
                    .collect();
                Rendered::container("ol", attrs)
            }
            NodeType::ListItem => Rendered::container("li", attrs),
            NodeType::TaskList => Rendered::container("ul", typed(node, attrs)),
            NodeType::TaskItem => task_item(node, attrs),
            NodeType::CodeBlock => self.code_block(node),
            NodeType::HorizontalRule => Rendered::leaf("hr", attrs),
            NodeType::HardBreak => Rendered::leaf("br", attrs),
            NodeType::Callout | NodeType::Tabs | NodeType::Tab | NodeType::DetailsContent => {
                Rendered::container("div", typed(node, attrs))
            }
            NodeType::Details => Rendered::container("details", typed(node, attrs)),
            NodeType::DetailsSummary => Rendered::container("summary", attrs),
            NodeType::MathInline => math(node, "span"),
            NodeType::MathBlock => math(node, "div"),
            NodeType::Table => {
                let table = create_element("table", attrs);
                let body = create_element("tbody", Vec::new());
                append(&table, body.clone());
                Rendered {
                    dom: table,
                    content: Some(body),
                }
            }
            NodeType::TableRow => Rendered::container("tr", attrs),
            NodeType::TableHeader => Rendered::container("th", attrs),
            NodeType::TableCell => Rendered::container("td", attrs),
            NodeType::Image => Rendered::leaf("img", attrs),
            NodeType::Video => {
                let mut video_attrs = vec![("controls", String::new())];
                video_attrs.extend(attrs);
                Rendered::leaf("video", video_attrs)
            }
            NodeType::Attachment | NodeType::Embed => Rendered::leaf("div", typed(node, attrs)),
            NodeType::Drawio | NodeType::Excalidraw => diagram(node, attrs),
            NodeType::Youtube => youtube(node),
        }
    }

    fn code_block(&self, node: &Node) -> Rendered {
        let mut code_attrs = Vec::new();
        if let Some(language) = node.attr_str("language") {
            code_attrs.push((
                "class",
                format!("{}{language}", self.options.language_class_prefix),
            ));
        }
        if let Some(title) = node.attr_str("title").filter(|t| !t.is_empty()) {
            code_attrs.push(("data-title", title.to_string()));
        }
        let pre = create_element("pre", Vec::new());
        let code = create_element("code", code_attrs);
        append(&pre, code.clone());
        Rendered {
            dom: pre,
            content: Some(code),
        }
    }
}

/// `data-type` first, then the attribute-derived ones.
fn typed(node: &Node, attrs: HtmlAttrs) -> HtmlAttrs {
    let mut out = vec![("data-type", node.node_type.name().to_string())];
    out.extend(attrs);
    out
}

fn task_item(node: &Node, attrs: HtmlAttrs) -> Rendered {
    let item = create_element("li", typed(node, attrs));

    let mut input_attrs = vec![("type", "checkbox".to_string())];
    if node.attr_bool("checked") {
        input_attrs.push(("checked", "checked".to_string()));
    }
    let label = create_element("label", Vec::new());
    append(&label, create_element("input", input_attrs));
    append(&label, create_element("span", Vec::new()));
    append(&item, label);

    let content = create_element("div", Vec::new());
    append(&item, content.clone());
    Rendered {
        dom: item,
        content: Some(content),
    }
}

fn math(node: &Node, tag: &str) -> Rendered {
    let element = create_element(
        tag,
        typed(node, vec![("data-katex", "true".to_string())]),
    );
    let text = node.attr_str("text").unwrap_or("");
    if !text.is_empty() {
        append(&element, create_text(text));
    }
    Rendered {
        dom: element,
        content: None,
    }
}

fn diagram(node: &Node, attrs: HtmlAttrs) -> Rendered {
    let wrapper = create_element("div", typed(node, attrs));
    if let Some(src) = node.attr_str("src") {
        let mut img_attrs = vec![("src", src.to_string())];
        if let Some(title) = node.attr_str("title") {
            img_attrs.push(("alt", title.to_string()));
        }
        append(&wrapper, create_element("img", img_attrs));
    }
    Rendered {
        dom: wrapper,
        content: None,
    }
}

fn youtube(node: &Node) -> Rendered {
    let wrapper = create_element("div", vec![("data-youtube-video", String::new())]);
    let mut iframe_attrs: HtmlAttrs = ["src", "width", "height"]
        .into_iter()
        .filter_map(|name| node.attr_str(name).map(|v| (name, v.to_string())))
        .collect();
    iframe_attrs.push(("allowfullscreen", "true".to_string()));
    append(&wrapper, create_element("iframe", iframe_attrs));
    Rendered {
        dom: wrapper,
        content: None,
    }
}

fn render_text(node: &Node) -> Handle {
    let mut current = create_text(node.text_str());
    for mark in node.marks.iter().rev() {
        let element = render_mark(mark);
        append(&element, current);
        current = element;
    }
    current
}

fn render_mark(mark: &Mark) -> Handle {
    let attrs = mark_attrs(mark);
    match mark.mark_type {
        MarkType::Bold => create_element("strong", attrs),
        MarkType::Italic => create_element("em", attrs),
        MarkType::Underline => create_element("u", attrs),
        MarkType::Strike => create_element("s", attrs),
        MarkType::Code => create_element("code", attrs),
        MarkType::Subscript => create_element("sub", attrs),
        MarkType::Superscript => create_element("sup", attrs),
        MarkType::Link => {
            let mut attrs = attrs;
            attrs.push(("rel", "noopener noreferrer nofollow".to_string()));
            create_element("a", attrs)
        }
        MarkType::Highlight => {
            let mut attrs = attrs;
            if let Some(color) = mark.attr_str("color") {
                attrs.push(("style", format!("background-color: {color}")));
            }
            create_element("mark", attrs)
        }
        MarkType::TextStyle => {
            let mut attrs = attrs;
            if let Some(color) = mark.attr_str("color") {
                attrs.push(("style", format!("color: {color}")));
            }
            create_element("span", attrs)
        }
        MarkType::Comment => create_element("span", attrs),
    }
}

fn mark_attrs(mark: &Mark) -> HtmlAttrs {
    mark.mark_type
        .attrs()
        .iter()
        .filter_map(|spec| {
            let value = mark.attrs.get(spec.name)?;
            html_attr(spec, value)
        })
        .collect()
}

/// HTML attributes derived from the schema's attribute contract.
fn html_attrs(specs: &[AttrSpec], node: &Node) -> HtmlAttrs {
    specs
        .iter()
        .filter_map(|spec| {
            let value = node.attrs.get(spec.name)?;
            html_attr(spec, value)
        })
        .collect()
}

fn html_attr(spec: &AttrSpec, value: &Value) -> Option<(&'static str, String)> {
    match spec.html {
        HtmlAttr::Attr(name) => attr_string(value).map(|v| (name, v)),
        HtmlAttr::Flag(name) => (value.as_bool() == Some(true)).then(|| (name, String::new())),
        HtmlAttr::Custom => None,
    }
}

fn attr_string(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        other => Some(other.to_string()),
    }
}
