//! HTML parsing (HTML → node tree)
//!
//! Elements are matched against an ordered list of parse rules, first match
//! wins. Elements matching no node rule may still add a mark; anything else is
//! transparent and its children are parsed in place. Every node's children are
//! then fitted to its content constraint, so the result always validates.

use super::HtmlOptions;
use crate::common::{css, dom};
use crate::error::FormatError;
use crate::model::{Attrs, Mark, Node};
use crate::schema::content::{fit_parsed, ContentConstraint};
use crate::schema::{self, HtmlAttr, MarkType, NodeType};
use markup5ever_rcdom::Handle;
use serde_json::Value;

/// Elements whose subtree never contributes content
const IGNORED_TAGS: &[&str] = &[
    "head", "script", "style", "template", "title", "meta", "link", "noscript",
];

/// Tag plus an attribute predicate
struct ParseRule {
    node_type: NodeType,
    tag: &'static str,
    /// Required `data-type` value
    data_type: Option<&'static str>,
    /// Required attribute (presence only)
    attr: Option<&'static str>,
    /// Extra structural test
    check: Option<fn(&Handle) -> bool>,
}

impl ParseRule {
    const fn tag(node_type: NodeType, tag: &'static str) -> Self {
        ParseRule {
            node_type,
            tag,
            data_type: None,
            attr: None,
            check: None,
        }
    }

    const fn typed(node_type: NodeType, tag: &'static str, data_type: &'static str) -> Self {
        ParseRule {
            node_type,
            tag,
            data_type: Some(data_type),
            attr: None,
            check: None,
        }
    }

    const fn checked(node_type: NodeType, tag: &'static str, check: fn(&Handle) -> bool) -> Self {
        ParseRule {
            node_type,
            tag,
            data_type: None,
            attr: None,
            check: Some(check),
        }
    }

    fn matches(&self, element: &Handle) -> bool {
        if !dom::is_element(element, self.tag) {
            return false;
        }
        if let Some(expected) = self.data_type {
            if dom::attr(element, "data-type").as_deref() != Some(expected) {
                return false;
            }
        }
        if let Some(check) = self.check {
            if !check(element) {
                return false;
            }
        }
        self.attr.map_or(true, |name| dom::has_attr(element, name))
    }
}

/// Specific rules come before the generic tag rules they shadow.
static PARSE_RULES: &[ParseRule] = &[
    ParseRule::typed(NodeType::Callout, "div", "callout"),
    ParseRule::typed(NodeType::Tabs, "div", "tabs"),
    ParseRule::typed(NodeType::Tab, "div", "tab"),
    ParseRule::typed(NodeType::DetailsContent, "div", "detailsContent"),
    ParseRule::typed(NodeType::MathBlock, "div", "mathBlock"),
    ParseRule::typed(NodeType::Attachment, "div", "attachment"),
    ParseRule::typed(NodeType::Embed, "div", "embed"),
    ParseRule::typed(NodeType::Drawio, "div", "drawio"),
    ParseRule::typed(NodeType::Excalidraw, "div", "excalidraw"),
    ParseRule {
        node_type: NodeType::Youtube,
        tag: "div",
        data_type: None,
        attr: Some("data-youtube-video"),
        check: None,
    },
    ParseRule::typed(NodeType::MathInline, "span", "mathInline"),
    ParseRule::typed(NodeType::TaskList, "ul", "taskList"),
    ParseRule::typed(NodeType::TaskItem, "li", "taskItem"),
    // GitHub-style: a list whose items all open with a checkbox
    ParseRule::checked(NodeType::TaskList, "ul", is_checkbox_list),
    ParseRule::checked(NodeType::TaskItem, "li", is_checkbox_item),
    ParseRule::tag(NodeType::Details, "details"),
    ParseRule::tag(NodeType::DetailsSummary, "summary"),
    ParseRule::tag(NodeType::CodeBlock, "pre"),
    ParseRule::tag(NodeType::Heading, "h1"),
    ParseRule::tag(NodeType::Heading, "h2"),
    ParseRule::tag(NodeType::Heading, "h3"),
    ParseRule::tag(NodeType::Heading, "h4"),
    ParseRule::tag(NodeType::Heading, "h5"),
    ParseRule::tag(NodeType::Heading, "h6"),
    ParseRule::tag(NodeType::Paragraph, "p"),
    ParseRule::tag(NodeType::Blockquote, "blockquote"),
    ParseRule::tag(NodeType::BulletList, "ul"),
    ParseRule::tag(NodeType::OrderedList, "ol"),
    ParseRule::tag(NodeType::ListItem, "li"),
    ParseRule::tag(NodeType::HorizontalRule, "hr"),
    ParseRule::tag(NodeType::HardBreak, "br"),
    ParseRule::tag(NodeType::Image, "img"),
    ParseRule::tag(NodeType::Video, "video"),
    ParseRule::tag(NodeType::Table, "table"),
    ParseRule::tag(NodeType::TableRow, "tr"),
    ParseRule::tag(NodeType::TableHeader, "th"),
    ParseRule::tag(NodeType::TableCell, "td"),
];

/// Parse HTML with default options
pub fn parse_from_html(source: &str) -> Result<Node, FormatError> {
    parse_from_html_with_options(source, &HtmlOptions::default())
}

/// Parse an HTML document or fragment into a `doc` node
pub fn parse_from_html_with_options(
    source: &str,
    options: &HtmlOptions,
) -> Result<Node, FormatError> {
    let dom = dom::parse_html(source);
    let body = dom::find_body(&dom.document)
        .ok_or_else(|| FormatError::ParseError("HTML has no body".to_string()))?;

    let parser = DomParser { options };
    let children = parser.parse_children(&body, &[]);
    let doc = Node::doc(fit_parsed(NodeType::Doc, children));
    schema::validate(&doc)?;
    Ok(doc)
}

struct DomParser<'a> {
    options: &'a HtmlOptions,
}

impl DomParser<'_> {
    fn parse_children(&self, parent: &Handle, marks: &[Mark]) -> Vec<Node> {
        let mut out = Vec::new();
        for child in dom::children(parent) {
            if let Some(text) = dom::text(&child) {
                let text = collapse_whitespace(&text);
                if !text.is_empty() {
                    out.push(Node::text(text).with_marks(marks.to_vec()));
                }
            } else if dom::tag_name(&child).is_some() {
                out.extend(self.parse_element(&child, marks));
            }
        }
        out
    }

    fn parse_element(&self, element: &Handle, marks: &[Mark]) -> Vec<Node> {
        let Some(tag) = dom::tag_name(element) else {
            return Vec::new();
        };
        if IGNORED_TAGS.contains(&tag) {
            return Vec::new();
        }
        if let Some(rule) = PARSE_RULES.iter().find(|rule| rule.matches(element)) {
            return self.build_node(rule.node_type, element, marks);
        }
        if let Some(mark) = match_mark(element) {
            let mut marks = marks.to_vec();
            marks.retain(|m| m.mark_type != mark.mark_type);
            marks.push(mark);
            return self.parse_children(element, &marks);
        }
        tracing::trace!(tag, "no parse rule matched, parsing children in place");
        self.parse_children(element, marks)
    }

    /// Build a node; textblocks holding blocks are split around them.
    fn build_node(&self, node_type: NodeType, element: &Handle, marks: &[Mark]) -> Vec<Node> {
        let attrs = self.parse_attrs(node_type, element);
        let node = Node::new(node_type).with_attrs(&attrs);
        match node_type.spec().content {
            ContentConstraint::Leaf => vec![node],
            ContentConstraint::Text => {
                let text = code_text(element);
                let children = if text.is_empty() {
                    Vec::new()
                } else {
                    vec![Node::text(text)]
                };
                vec![node.with_content(children)]
            }
            ContentConstraint::Inline => {
                split_textblock(node, self.parse_children(element, marks))
            }
            _ => {
                let children = self.parse_children(element, marks);
                vec![node.with_content(fit_parsed(node_type, children))]
            }
        }
    }

    fn parse_attrs(&self, node_type: NodeType, element: &Handle) -> Attrs {
        let mut raw = Attrs::new();
        for spec in node_type.spec().attrs {
            match spec.html {
                HtmlAttr::Attr(name) => {
                    if let Some(value) = dom::attr(element, name) {
                        raw.insert(spec.name.to_string(), Value::String(value));
                    }
                }
                HtmlAttr::Flag(name) => {
                    if let Some(value) = dom::attr(element, name) {
                        raw.insert(spec.name.to_string(), Value::Bool(value != "false"));
                    }
                }
                HtmlAttr::Custom => {}
            }
        }

        match node_type {
            NodeType::Heading => {
                let level = dom::tag_name(element)
                    .and_then(|tag| tag.strip_prefix('h'))
                    .and_then(|n| n.parse::<i64>().ok());
                if let Some(level) = level {
                    raw.insert("level".to_string(), Value::from(level));
                }
            }
            NodeType::CodeBlock => self.code_block_attrs(element, &mut raw),
            NodeType::TaskItem if !raw.contains_key("checked") => {
                if let Some(checkbox) = leading_checkbox(element) {
                    raw.insert(
                        "checked".to_string(),
                        Value::Bool(dom::has_attr(&checkbox, "checked")),
                    );
                }
            }
            NodeType::MathInline | NodeType::MathBlock => {
                raw.insert(
                    "text".to_string(),
                    Value::String(dom::text_content(element)),
                );
            }
            NodeType::Youtube => {
                if let Some(iframe) = dom::find_first(element, &|n| dom::is_element(n, "iframe")) {
                    for name in ["src", "width", "height"] {
                        if let Some(value) = dom::attr(&iframe, name) {
                            raw.insert(name.to_string(), Value::String(value));
                        }
                    }
                }
            }
            _ => {}
        }
        raw
    }

    /// Language and title live on the first child element (`<code>`).
    fn code_block_attrs(&self, pre: &Handle, raw: &mut Attrs) {
        let code = dom::first_element_child(pre);
        let prefix = self.options.language_class_prefix.as_str();

        let language = code.as_ref().and_then(|code| {
            dom::class_list(code)
                .iter()
                .find_map(|class| class.strip_prefix(prefix).map(str::to_string))
                .filter(|lang| !lang.is_empty())
        });
        let language = match language {
            Some(lang) => Some(self.options.languages.canonical(&lang).to_string()),
            None => self.options.default_language.clone(),
        };
        if let Some(language) = language {
            raw.insert("language".to_string(), Value::String(language));
        }

        if let Some(title) = code.as_ref().and_then(|code| dom::attr(code, "data-title")) {
            raw.insert("title".to_string(), Value::String(title));
        }
    }
}

/// Mark added by a formatting element, if any.
fn match_mark(element: &Handle) -> Option<Mark> {
    let tag = dom::tag_name(element)?;
    let mark = match tag {
        "strong" | "b" => Mark::new(MarkType::Bold),
        "em" | "i" => Mark::new(MarkType::Italic),
        "u" => Mark::new(MarkType::Underline),
        "s" | "del" | "strike" => Mark::new(MarkType::Strike),
        "code" => Mark::new(MarkType::Code),
        "sub" => Mark::new(MarkType::Subscript),
        "sup" => Mark::new(MarkType::Superscript),
        "a" => {
            let href = dom::attr(element, "href")?;
            let mark = Mark::new(MarkType::Link).with_attr("href", href);
            match dom::attr(element, "target") {
                Some(target) => mark.with_attr("target", target),
                None => mark,
            }
        }
        "mark" => {
            let color = dom::attr(element, "data-color").or_else(|| {
                dom::attr(element, "style")
                    .and_then(|style| css::property_value(&style, "background-color"))
            });
            match color {
                Some(color) => Mark::new(MarkType::Highlight).with_attr("color", color),
                None => Mark::new(MarkType::Highlight),
            }
        }
        "span" => {
            if let Some(id) = dom::attr(element, "data-comment-id") {
                Mark::new(MarkType::Comment).with_attr("commentId", id)
            } else {
                let style = dom::attr(element, "style")?;
                let color = css::property_value(&style, "color")?;
                Mark::new(MarkType::TextStyle).with_attr("color", color)
            }
        }
        _ => return None,
    };
    Some(mark)
}

/// The checkbox a list item opens with, looking through a leading `<p>`.
fn leading_checkbox(li: &Handle) -> Option<Handle> {
    for child in dom::children(li) {
        if let Some(text) = dom::text(&child) {
            if text.trim().is_empty() {
                continue;
            }
            return None;
        }
        if dom::is_element(&child, "input") {
            return (dom::attr(&child, "type").as_deref() == Some("checkbox")).then_some(child);
        }
        if dom::is_element(&child, "p") {
            return leading_checkbox(&child);
        }
        if dom::tag_name(&child).is_some() {
            return None;
        }
    }
    None
}

fn is_checkbox_list(ul: &Handle) -> bool {
    let items = dom::element_children(ul);
    !items.is_empty()
        && items
            .iter()
            .all(|li| dom::is_element(li, "li") && leading_checkbox(li).is_some())
}

fn is_checkbox_item(li: &Handle) -> bool {
    dom::parent(li).is_some_and(|ul| dom::is_element(&ul, "ul") && is_checkbox_list(&ul))
}

/// Split a textblock's children at block nodes, hoisting the blocks out.
fn split_textblock(template: Node, children: Vec<Node>) -> Vec<Node> {
    let node_type = template.node_type;
    if children.iter().all(|c| c.node_type.is_inline()) {
        return vec![template.with_content(fit_parsed(node_type, children))];
    }

    let mut out = Vec::new();
    let mut run = Vec::new();
    for child in children {
        if child.node_type.is_inline() {
            run.push(child);
            continue;
        }
        let content = fit_parsed(node_type, std::mem::take(&mut run));
        if !content.is_empty() {
            out.push(template.clone().with_content(content));
        }
        out.push(child);
    }
    let content = fit_parsed(node_type, run);
    if !content.is_empty() {
        out.push(template.with_content(content));
    }
    out
}

/// Raw text of a code block: text nodes verbatim, `<br>` as a newline.
fn code_text(element: &Handle) -> String {
    fn collect(node: &Handle, out: &mut String) {
        if let Some(text) = dom::text(node) {
            out.push_str(&text);
        } else if dom::is_element(node, "br") {
            out.push('\n');
        }
        for child in dom::children(node) {
            collect(&child, out);
        }
    }
    let mut out = String::new();
    for child in dom::children(element) {
        collect(&child, &mut out);
    }
    out
}

/// Collapse runs of ASCII whitespace into a single space.
fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if matches!(c, ' ' | '\t' | '\n' | '\r' | '\u{c}') {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}
