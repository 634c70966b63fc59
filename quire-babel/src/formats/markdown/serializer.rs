//! HTML → Markdown rule engine
//!
//! The DOM is walked depth-first. For every element, its children are
//! converted first and the result is handed to the first matching rule
//! together with the element itself. Rule outputs are joined with at most two
//! newlines between them, so block rules can pad generously with `\n\n`.
//!
//! Before the walk, whitespace in text nodes is collapsed the way a browser
//! lays it out: runs become a single space, spaces at the edges of blocks are
//! dropped, and `<pre>` contents are left untouched.

use super::rules::{self, Rule};
use super::MarkdownOptions;
use crate::common::dom;
use crate::error::FormatError;
use crate::formats::html::serialize_to_html;
use crate::model::Node;
use markup5ever_rcdom::{Handle, NodeData};
use once_cell::sync::Lazy;
use regex::Regex;
use std::rc::Rc;

/// Import lines for the docs-site components used by tabs.
pub const COMPONENT_IMPORTS: &str =
    "import Tabs from '@theme/Tabs';\nimport TabItem from '@theme/TabItem';\n";

const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "aside", "audio", "blockquote", "body", "canvas", "center", "dd",
    "details", "dir", "div", "dl", "dt", "fieldset", "figcaption", "figure", "footer", "form",
    "frameset", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hgroup", "hr", "html", "isindex",
    "li", "main", "menu", "nav", "noframes", "noscript", "ol", "output", "p", "pre", "section",
    "summary", "table", "tbody", "td", "tfoot", "th", "thead", "tr", "ul",
];

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "command", "embed", "hr", "img", "input", "keygen", "link",
    "meta", "param", "source", "track", "wbr",
];

const MEANINGFUL_WHEN_BLANK: &[&str] = &[
    "a", "table", "thead", "tbody", "tfoot", "th", "td", "iframe", "script", "audio", "video",
];

static WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \r\n\t]+").expect("valid whitespace regex"));

static ESCAPES: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        (r"\\", r"\\"),
        (r"\*", r"\*"),
        (r"^-", r"\-"),
        (r"^\+ ", r"\+ "),
        (r"^(=+)", r"\$1"),
        (r"^(#{1,6}) ", r"\$1 "),
        (r"`", r"\`"),
        (r"^~~~", r"\~~~"),
        (r"\[", r"\["),
        (r"\]", r"\]"),
        (r"^>", r"\>"),
        (r"_", r"\_"),
        (r"^(\d+)\. ", r"${1}\. "),
    ]
    .into_iter()
    .map(|(pattern, replacement)| {
        (Regex::new(pattern).expect("valid escape regex"), replacement)
    })
    .collect()
});

pub(crate) fn is_block(tag: &str) -> bool {
    BLOCK_ELEMENTS.contains(&tag)
}

fn is_void(tag: &str) -> bool {
    VOID_ELEMENTS.contains(&tag)
}

fn is_meaningful_when_blank(tag: &str) -> bool {
    MEANINGFUL_WHEN_BLANK.contains(&tag)
}

/// Backslash-escape Markdown syntax in plain text.
pub fn escape(text: &str) -> String {
    ESCAPES
        .iter()
        .fold(text.to_string(), |acc, (regex, replacement)| {
            regex.replace_all(&acc, *replacement).into_owned()
        })
}

/// Concatenate two outputs, keeping at most two newlines at the seam.
pub fn join(output: &str, replacement: &str) -> String {
    let head = output.trim_end_matches('\n');
    let tail = replacement.trim_start_matches('\n');
    let newlines = (output.len() - head.len())
        .max(replacement.len() - tail.len())
        .min(2);
    format!("{head}{}{tail}", &"\n\n"[..newlines])
}

fn post_process(output: &str) -> String {
    output
        .trim_start_matches(['\t', '\r', '\n'])
        .trim_end()
        .to_string()
}

/// Converts editor HTML to Markdown through an ordered list of rules.
pub struct MarkdownSerializer {
    options: MarkdownOptions,
    rules: Vec<Rule>,
}

impl Default for MarkdownSerializer {
    fn default() -> Self {
        Self::new(MarkdownOptions::default())
    }
}

impl MarkdownSerializer {
    pub fn new(options: MarkdownOptions) -> Self {
        Self {
            options,
            rules: rules::default_rules(),
        }
    }

    pub fn options(&self) -> &MarkdownOptions {
        &self.options
    }

    /// Register a rule. It takes precedence over every rule added before it.
    pub fn add_rule(&mut self, rule: Rule) {
        self.rules.insert(0, rule);
    }

    /// Rule names in the order they are tried.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name).collect()
    }

    /// Convert an HTML document or fragment.
    pub fn convert(&self, html: &str) -> String {
        let dom = dom::parse_html(html);
        match dom::find_body(&dom.document) {
            Some(body) => self.convert_node(&body),
            None => String::new(),
        }
    }

    /// Convert the children of `root`. Collapses whitespace in place first.
    pub fn convert_node(&self, root: &Handle) -> String {
        collapse_whitespace(root);
        self.convert_children(root, None)
    }

    /// Convert the children of `parent` as a standalone fragment, leaving out
    /// `skip`. Whitespace must already be collapsed.
    pub fn convert_children(&self, parent: &Handle, skip: Option<&Handle>) -> String {
        post_process(&self.process(parent, skip))
    }

    fn process(&self, parent: &Handle, skip: Option<&Handle>) -> String {
        let mut output = String::new();
        for child in dom::children(parent) {
            if skip.is_some_and(|skipped| Rc::ptr_eq(skipped, &child)) {
                continue;
            }
            let replacement = match &child.data {
                NodeData::Text { contents } => {
                    let text = contents.borrow().to_string();
                    if is_code_context(&child) {
                        text
                    } else {
                        escape(&text)
                    }
                }
                NodeData::Element { .. } => self.replacement_for_node(&child),
                _ => String::new(),
            };
            output = join(&output, &replacement);
        }
        output
    }

    fn replacement_for_node(&self, node: &Handle) -> String {
        let tag = dom::tag_name(node).unwrap_or("");
        let mut content = self.process(node, None);
        let whitespace = flanking_whitespace(node);
        if !whitespace.leading.is_empty() || !whitespace.trailing.is_empty() {
            content = content.trim().to_string();
        }

        let replacement = if is_blank(node) {
            if is_block(tag) { "\n\n" } else { "" }.to_string()
        } else if let Some(rule) = self.rules.iter().find(|r| (r.filter)(node, &self.options)) {
            tracing::trace!(rule = rule.name, tag, "applying markdown rule");
            (rule.replacement)(&content, node, self)
        } else if is_block(tag) {
            format!("\n\n{content}\n\n")
        } else {
            content
        };

        format!("{}{replacement}{}", whitespace.leading, whitespace.trailing)
    }
}

/// Convert HTML to a docs-site Markdown page: the rule engine output with
/// literal `<br>` flattened to spaces, prefixed by the component imports.
pub fn html_to_markdown(html: &str, options: &MarkdownOptions) -> String {
    let markdown = MarkdownSerializer::new(options.clone()).convert(html);
    format!("{COMPONENT_IMPORTS}{}", markdown.replace("<br>", " "))
}

/// Render a tree to Markdown with default options.
pub fn serialize_to_markdown(doc: &Node) -> Result<String, FormatError> {
    let html = serialize_to_html(doc)?;
    Ok(html_to_markdown(&html, &MarkdownOptions::default()))
}

fn is_code_context(node: &Handle) -> bool {
    dom::has_ancestor(node, "code") || dom::has_ancestor(node, "pre")
}

fn is_blank(node: &Handle) -> bool {
    let tag = dom::tag_name(node).unwrap_or("");
    !is_void(tag)
        && !is_meaningful_when_blank(tag)
        && dom::text_content(node).trim().is_empty()
        && dom::find_first(node, &|n| {
            dom::tag_name(n).is_some_and(|t| is_void(t) || is_meaningful_when_blank(t))
        })
        .is_none()
}

struct Flanking {
    leading: String,
    trailing: String,
}

/// Whitespace at the edges of an inline element's text that has to move
/// outside its Markdown delimiters (`**a **` is not bold).
fn flanking_whitespace(node: &Handle) -> Flanking {
    if dom::tag_name(node).is_some_and(is_block) {
        return Flanking {
            leading: String::new(),
            trailing: String::new(),
        };
    }
    let text = dom::text_content(node);
    let edges = Edges::of(&text);
    let leading = if edges.leading_ascii && is_flanked_by_space(node, Side::Left) {
        edges.leading_non_ascii
    } else {
        edges.leading
    };
    let trailing = if edges.trailing_ascii && is_flanked_by_space(node, Side::Right) {
        edges.trailing_non_ascii
    } else {
        edges.trailing
    };
    Flanking {
        leading: leading.to_string(),
        trailing: trailing.to_string(),
    }
}

#[derive(Clone, Copy)]
enum Side {
    Left,
    Right,
}

fn is_flanked_by_space(node: &Handle, side: Side) -> bool {
    let sibling = match side {
        Side::Left => dom::previous_sibling(node),
        Side::Right => dom::next_sibling(node),
    };
    let Some(sibling) = sibling else {
        return false;
    };
    let text = match (&sibling.data, dom::tag_name(&sibling)) {
        (NodeData::Text { .. }, _) => dom::text(&sibling).unwrap_or_default(),
        (_, Some(tag)) if !is_block(tag) => dom::text_content(&sibling),
        _ => return false,
    };
    match side {
        Side::Left => text.ends_with(' '),
        Side::Right => text.starts_with(' '),
    }
}

fn is_ascii_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// Leading and trailing whitespace of a string, split into the ASCII run at
/// the outer edge and the remaining (non-breaking etc.) whitespace inside it.
struct Edges<'a> {
    leading: &'a str,
    leading_non_ascii: &'a str,
    leading_ascii: bool,
    trailing: &'a str,
    trailing_non_ascii: &'a str,
    trailing_ascii: bool,
}

impl<'a> Edges<'a> {
    fn of(s: &'a str) -> Self {
        let ascii_lead = s.len() - s.trim_start_matches(is_ascii_space).len();
        let lead = s.len() - s.trim_start().len();
        if lead == s.len() {
            return Edges {
                leading: s,
                leading_non_ascii: &s[ascii_lead..],
                leading_ascii: ascii_lead > 0,
                trailing: "",
                trailing_non_ascii: "",
                trailing_ascii: false,
            };
        }
        let trail_start = s.trim_end().len();
        let ascii_trail_start = s.trim_end_matches(is_ascii_space).len();
        Edges {
            leading: &s[..lead],
            leading_non_ascii: &s[ascii_lead.min(lead)..lead],
            leading_ascii: ascii_lead > 0,
            trailing: &s[trail_start..],
            trailing_non_ascii: &s[trail_start..ascii_trail_start.max(trail_start)],
            trailing_ascii: ascii_trail_start < s.len(),
        }
    }
}

/// Collapse whitespace under `root` in place.
pub(crate) fn collapse_whitespace(root: &Handle) {
    let mut collapser = Collapser::default();
    collapser.visit(root);
    collapser.trim_previous();

    for node in collapser.removed {
        if let Some(parent) = dom::parent(&node) {
            parent
                .children
                .borrow_mut()
                .retain(|child| !Rc::ptr_eq(child, &node));
        }
    }
}

#[derive(Default)]
struct Collapser {
    previous_text: Option<Handle>,
    keep_leading_space: bool,
    removed: Vec<Handle>,
}

impl Collapser {
    fn visit(&mut self, parent: &Handle) {
        for node in dom::children(parent) {
            match &node.data {
                NodeData::Text { contents } => {
                    let mut text = WHITESPACE.replace_all(&contents.borrow(), " ").into_owned();
                    let after_space = self.previous_text.as_ref().map_or(true, |previous| {
                        dom::text(previous).is_some_and(|t| t.ends_with(' '))
                    });
                    if after_space && !self.keep_leading_space && text.starts_with(' ') {
                        text.remove(0);
                    }
                    if text.is_empty() {
                        self.removed.push(node.clone());
                        continue;
                    }
                    *contents.borrow_mut() = text.into();
                    self.previous_text = Some(node.clone());
                }
                NodeData::Element { .. } => {
                    let tag = dom::tag_name(&node).unwrap_or("");
                    self.element_boundary(tag);
                    // pre keeps its whitespace; other elements are also
                    // passed again on the way out
                    if tag != "pre" && !node.children.borrow().is_empty() {
                        self.visit(&node);
                        self.element_boundary(tag);
                    }
                }
                _ => self.removed.push(node.clone()),
            }
        }
    }

    fn element_boundary(&mut self, tag: &str) {
        if is_block(tag) || tag == "br" {
            self.trim_previous();
            self.previous_text = None;
            self.keep_leading_space = false;
        } else if is_void(tag) {
            self.previous_text = None;
            self.keep_leading_space = true;
        } else if self.previous_text.is_some() {
            self.keep_leading_space = false;
        }
    }

    fn trim_previous(&mut self) {
        let Some(previous) = self.previous_text.take() else {
            return;
        };
        if let NodeData::Text { contents } = &previous.data {
            let trimmed = contents.borrow().strip_suffix(' ').map(str::to_string);
            if let Some(trimmed) = trimmed {
                if trimmed.is_empty() {
                    self.removed.push(previous.clone());
                }
                *contents.borrow_mut() = trimmed.into();
            }
        }
        self.previous_text = Some(previous);
    }
}
