//! Conversion rules
//!
//! [`default_rules`] lists the rules in the order they are tried; the first
//! rule whose filter accepts an element produces its Markdown. Editor
//! constructs (tabs, code blocks, math, details, callouts, task items) come
//! first, then GFM tables and strikethrough, then plain CommonMark.

use super::code_block;
use super::serializer::MarkdownSerializer;
use super::{HeadingStyle, MarkdownOptions};
use crate::common::dom;
use markup5ever_rcdom::Handle;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

pub type Filter = fn(&Handle, &MarkdownOptions) -> bool;
pub type Replacement = fn(&str, &Handle, &MarkdownSerializer) -> String;

/// A named filter/replacement pair.
#[derive(Clone, Copy)]
pub struct Rule {
    pub name: &'static str,
    pub filter: Filter,
    pub replacement: Replacement,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

static HIGHLIGHT_CLASS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"highlight-(?:text|source)-([a-z0-9]+)").expect("valid highlight regex")
});

static PIPES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\|+").expect("valid pipe regex"));

static NEWLINES: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n+").expect("valid newline regex"));

static LINE_ENDINGS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\r?\n|\r").expect("valid line ending regex"));

static SPACE_PADDED: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ .*?[^ ].* $").expect("valid padding regex"));

static ATTRIBUTE_BREAKS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:\n+\s*)+").expect("valid attribute regex"));

static BACKTICK_RUNS: Lazy<Regex> = Lazy::new(|| Regex::new(r"`+").expect("valid backtick regex"));

macro_rules! rule {
    ($name:literal, $filter:expr, $replacement:expr) => {
        Rule {
            name: $name,
            filter: $filter,
            replacement: $replacement,
        }
    };
}

/// Rules in precedence order.
pub fn default_rules() -> Vec<Rule> {
    vec![
        rule!("tab", |n, _| is_typed_div(n, "tab"), tab),
        rule!("tabs", |n, _| is_typed_div(n, "tabs"), tabs),
        rule!("fencedCodeBlock", |n, _| code_block::is_code_block(n), fenced_code_block),
        rule!("iframeEmbed", |n, _| dom::is_element(n, "iframe"), iframe),
        rule!("mathBlock", |n, _| is_typed_div(n, "mathBlock"), math_block),
        rule!("mathInline", |n, _| is_typed(n, "span", "mathInline"), math_inline),
        rule!("paragraph", |n, _| dom::is_element(n, "p"), paragraph),
        rule!("preserveDetail", |n, _| dom::is_element(n, "details"), details),
        rule!("callout", |n, _| is_typed_div(n, "callout"), callout),
        rule!("taskListItem", is_task_list_item, task_list_item),
        rule!("highlightedCodeBlock", is_highlighted_code_block, highlighted_code_block),
        rule!("strikethrough", |n, _| is_any(n, &["del", "s", "strike"]), strikethrough),
        rule!("tableCell", |n, _| is_any(n, &["th", "td"]), table_cell),
        rule!("tableRow", |n, _| dom::is_element(n, "tr"), table_row),
        rule!("table", |n, _| dom::is_element(n, "table"), table),
        rule!(
            "tableSection",
            |n, _| is_any(n, &["thead", "tbody", "tfoot"]),
            |c, _, _| c.to_string()
        ),
        rule!("lineBreak", |n, _| dom::is_element(n, "br"), line_break),
        rule!("heading", |n, _| heading_level(n).is_some(), heading),
        rule!("blockquote", |n, _| dom::is_element(n, "blockquote"), blockquote),
        rule!("list", |n, _| is_any(n, &["ul", "ol"]), list),
        rule!("listItem", |n, _| dom::is_element(n, "li"), list_item),
        rule!("horizontalRule", |n, _| dom::is_element(n, "hr"), |_, _, s| {
            format!("\n\n{}\n\n", s.options().hr)
        }),
        rule!(
            "inlineLink",
            |n, _| dom::is_element(n, "a") && dom::has_attr(n, "href"),
            inline_link
        ),
        rule!("emphasis", |n, _| is_any(n, &["em", "i"]), emphasis),
        rule!("strong", |n, _| is_any(n, &["strong", "b"]), strong),
        rule!("code", is_inline_code, code),
        rule!("image", |n, _| dom::is_element(n, "img"), image),
    ]
}

fn is_any(node: &Handle, tags: &[&str]) -> bool {
    dom::tag_name(node).is_some_and(|tag| tags.contains(&tag))
}

fn is_typed(node: &Handle, tag: &str, data_type: &str) -> bool {
    dom::is_element(node, tag) && dom::attr(node, "data-type").as_deref() == Some(data_type)
}

fn is_typed_div(node: &Handle, data_type: &str) -> bool {
    is_typed(node, "div", data_type)
}

fn parent_is(node: &Handle, tag: &str) -> bool {
    dom::parent(node).is_some_and(|parent| dom::is_element(&parent, tag))
}

fn tab(content: &str, node: &Handle, _: &MarkdownSerializer) -> String {
    let title = dom::attr(node, "data-tab-title").unwrap_or_default();
    let value = title.to_lowercase().replace(' ', "");
    format!(
        "\n\n<TabItem value='{value}' label='{title}'>\n{}\n</TabItem>\n\n",
        content.trim()
    )
}

fn tabs(content: &str, _: &Handle, _: &MarkdownSerializer) -> String {
    format!("\n\n<Tabs>\n{}\n</Tabs>\n\n", content.trim())
}

fn fenced_code_block(content: &str, node: &Handle, serializer: &MarkdownSerializer) -> String {
    let element = code_block::code_element(node);
    let language = code_block::code_language(&element);
    let title = dom::attr(&element, "data-title");
    let fence_char = serializer.options().fence.chars().next().unwrap_or('`');
    code_block::fence_code(content, &language, title.as_deref(), fence_char)
}

fn iframe(_: &str, node: &Handle, _: &MarkdownSerializer) -> String {
    let src = dom::attr(node, "src").unwrap_or_default();
    format!("[{src}]({src})")
}

// Math is TeX; its source goes out unescaped.
fn math_block(_: &str, node: &Handle, _: &MarkdownSerializer) -> String {
    format!("\n$$\n{}\n$$\n", dom::text_content(node))
}

fn math_inline(_: &str, node: &Handle, _: &MarkdownSerializer) -> String {
    format!("${}$", dom::text_content(node))
}

fn paragraph(content: &str, node: &Handle, _: &MarkdownSerializer) -> String {
    if parent_is(node, "li") {
        content.to_string()
    } else {
        format!("\n\n{content}\n\n")
    }
}

fn details(_: &str, node: &Handle, serializer: &MarkdownSerializer) -> String {
    let summary = dom::element_children(node)
        .into_iter()
        .find(|child| dom::is_element(child, "summary"));
    let heading = summary
        .as_ref()
        .map(|summary| format!("<summary>{}</summary>", serializer.convert_children(summary, None)))
        .unwrap_or_default();
    let body = serializer.convert_children(node, summary.as_ref());
    format!("\n<details>\n{heading}\n\n{body}\n\n</details>\n")
}

fn callout(content: &str, node: &Handle, _: &MarkdownSerializer) -> String {
    let callout_type = dom::attr(node, "data-callout-type")
        .filter(|t| !t.is_empty())
        .unwrap_or_else(|| "info".to_string());
    format!("\n\n:::{callout_type}\n{}\n:::\n\n", content.trim())
}

fn is_task_list_item(node: &Handle, _: &MarkdownOptions) -> bool {
    dom::attr(node, "data-type").as_deref() == Some("taskItem") && parent_is(node, "ul")
}

fn task_list_item(content: &str, node: &Handle, _: &MarkdownSerializer) -> String {
    let checked = dom::find_first(node, &|n| {
        dom::is_element(n, "input") && dom::attr(n, "type").as_deref() == Some("checkbox")
    })
    .is_some_and(|checkbox| dom::has_attr(&checkbox, "checked"));
    let mark = if checked { "[x]" } else { "[ ]" };
    format!("- {mark}  {} \n", content.trim())
}

fn is_highlighted_code_block(node: &Handle, _: &MarkdownOptions) -> bool {
    dom::is_element(node, "div")
        && dom::attr(node, "class").is_some_and(|class| HIGHLIGHT_CLASS.is_match(&class))
        && dom::first_child(node).is_some_and(|child| dom::is_element(&child, "pre"))
}

fn highlighted_code_block(_: &str, node: &Handle, serializer: &MarkdownSerializer) -> String {
    let language = dom::attr(node, "class")
        .and_then(|class| HIGHLIGHT_CLASS.captures(&class).map(|caps| caps[1].to_string()))
        .unwrap_or_default();
    let code = dom::first_child(node)
        .map(|pre| dom::text_content(&pre))
        .unwrap_or_default();
    let fence = &serializer.options().fence;
    format!("\n\n{fence}{language}\n{code}\n{fence}\n\n")
}

fn strikethrough(content: &str, _: &Handle, _: &MarkdownSerializer) -> String {
    format!("~~{content}~~")
}

/// One pipe-table cell. Newlines become `<br>`, pipes are escaped, and the
/// cell is padded to three characters; a colspan adds empty cells after it.
fn cell(content: &str, node: &Handle) -> String {
    let prefix = if dom::element_index(node).unwrap_or(0) == 0 { "| " } else { " " };
    let mut text = content.trim().replace("\n\r", "<br>").replace('\n', "<br>");
    text = PIPES.replace_all(&text, "\\|").into_owned();
    while text.chars().count() < 3 {
        text.push(' ');
    }
    for _ in 1..colspan(node) {
        text.push_str(" |    ");
    }
    format!("{prefix}{text} |")
}

fn colspan(node: &Handle) -> usize {
    dom::attr(node, "colspan")
        .and_then(|span| span.trim().parse().ok())
        .filter(|&span| span > 0)
        .unwrap_or(1)
}

fn table_cell(content: &str, node: &Handle, _: &MarkdownSerializer) -> String {
    cell(content, node)
}

fn is_first_tbody(node: &Handle) -> bool {
    if !dom::is_element(node, "tbody") {
        return false;
    }
    match dom::previous_sibling(node) {
        None => true,
        Some(previous) => {
            dom::is_element(&previous, "thead") && dom::text_content(&previous).trim().is_empty()
        }
    }
}

fn is_heading_row(row: &Handle) -> bool {
    let Some(parent) = dom::parent(row) else {
        return false;
    };
    if dom::is_element(&parent, "thead") {
        return true;
    }
    let first =
        dom::first_element_child(&parent).is_some_and(|first| std::rc::Rc::ptr_eq(&first, row));
    first
        && (dom::is_element(&parent, "table") || is_first_tbody(&parent))
        && dom::element_children(row)
            .iter()
            .all(|cell| dom::is_element(cell, "th"))
}

fn table_row(content: &str, node: &Handle, _: &MarkdownSerializer) -> String {
    let mut border = String::new();
    if is_heading_row(node) {
        for child in dom::element_children(node) {
            let align = dom::attr(&child, "align").unwrap_or_default().to_lowercase();
            let marker = match align.as_str() {
                "left" => ":--",
                "right" => "--:",
                "center" => ":-:",
                _ => "---",
            };
            border.push_str(&cell(marker, &child));
        }
    }
    if border.is_empty() {
        format!("\n{content}")
    } else {
        format!("\n{content}\n{border}")
    }
}

fn collect_rows(node: &Handle, rows: &mut Vec<Handle>) {
    for child in dom::element_children(node) {
        if dom::is_element(&child, "tr") {
            rows.push(child);
        } else if !dom::is_element(&child, "table") {
            collect_rows(&child, rows);
        }
    }
}

fn column_count(table: &Handle) -> usize {
    let mut rows = Vec::new();
    collect_rows(table, &mut rows);
    rows.iter()
        .map(|row| dom::element_children(row).iter().map(colspan).sum())
        .max()
        .unwrap_or(0)
}

/// Pipe tables need a header; a table without one gets an empty header row.
fn table(content: &str, node: &Handle, _: &MarkdownSerializer) -> String {
    let content = NEWLINES.replace_all(content, "\n");
    let has_divider = content
        .trim()
        .split('\n')
        .nth(1)
        .is_some_and(|line| line.starts_with("| --") || line.starts_with("| :-"));
    let columns = column_count(node);
    let header = if columns > 0 && !has_divider {
        format!("|{}\n|{}", "     |".repeat(columns), " --- |".repeat(columns))
    } else {
        String::new()
    };
    format!("\n\n{header}{content}\n\n")
}

fn line_break(_: &str, _: &Handle, serializer: &MarkdownSerializer) -> String {
    format!("{}\n", serializer.options().br)
}

fn heading_level(node: &Handle) -> Option<usize> {
    let tag = dom::tag_name(node)?;
    let level = tag.strip_prefix('h')?.parse().ok()?;
    (1..=6).contains(&level).then_some(level)
}

fn heading(content: &str, node: &Handle, serializer: &MarkdownSerializer) -> String {
    let level = heading_level(node).unwrap_or(1);
    match serializer.options().heading_style {
        HeadingStyle::Setext if level < 3 => {
            let underline = if level == 1 { "=" } else { "-" };
            format!(
                "\n\n{content}\n{}\n\n",
                underline.repeat(content.chars().count())
            )
        }
        _ => format!("\n\n{} {content}\n\n", "#".repeat(level)),
    }
}

fn blockquote(content: &str, _: &Handle, _: &MarkdownSerializer) -> String {
    let quoted = content
        .trim_matches('\n')
        .split('\n')
        .map(|line| format!("> {line}"))
        .collect::<Vec<_>>()
        .join("\n");
    format!("\n\n{quoted}\n\n")
}

fn list(content: &str, node: &Handle, _: &MarkdownSerializer) -> String {
    let nested_last = dom::parent(node).is_some_and(|parent| {
        dom::is_element(&parent, "li")
            && dom::element_children(&parent)
                .last()
                .is_some_and(|last| std::rc::Rc::ptr_eq(last, node))
    });
    if nested_last {
        format!("\n{content}")
    } else {
        format!("\n\n{content}\n\n")
    }
}

fn list_item(content: &str, node: &Handle, serializer: &MarkdownSerializer) -> String {
    let parent = dom::parent(node);
    let prefix = match parent.as_ref().filter(|p| dom::is_element(p, "ol")) {
        Some(ol) => {
            let index = dom::element_index(node).unwrap_or(0) as i64;
            let start = dom::attr(ol, "start").and_then(|s| s.trim().parse::<i64>().ok());
            let number = start.map_or(index + 1, |start| start.saturating_add(index));
            format!("{number}. ")
        }
        None => format!("{} ", serializer.options().bullet_list_marker),
    };
    let indent = " ".repeat(prefix.chars().count());

    let body = content.trim_start_matches('\n');
    let trimmed = body.trim_end_matches('\n');
    let trailing_newline = trimmed.len() < body.len();
    let mut indented = trimmed
        .split('\n')
        .enumerate()
        .map(|(i, line)| {
            if i == 0 || line.is_empty() {
                line.to_string()
            } else {
                format!("{indent}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n");
    if trailing_newline || dom::next_sibling(node).is_some() {
        indented.push('\n');
    }
    format!("{prefix}{indented}")
}

fn clean_attribute(value: Option<String>) -> String {
    value
        .map(|v| ATTRIBUTE_BREAKS.replace_all(&v, "\n").into_owned())
        .unwrap_or_default()
}

fn inline_link(content: &str, node: &Handle, _: &MarkdownSerializer) -> String {
    let href = dom::attr(node, "href")
        .unwrap_or_default()
        .replace('(', "\\(")
        .replace(')', "\\)");
    let title = clean_attribute(dom::attr(node, "title"));
    let title = if title.is_empty() {
        String::new()
    } else {
        format!(" \"{}\"", title.replace('"', "\\\""))
    };
    format!("[{content}]({href}{title})")
}

fn emphasis(content: &str, _: &Handle, serializer: &MarkdownSerializer) -> String {
    if content.trim().is_empty() {
        return String::new();
    }
    let delimiter = &serializer.options().em_delimiter;
    format!("{delimiter}{content}{delimiter}")
}

fn strong(content: &str, _: &Handle, serializer: &MarkdownSerializer) -> String {
    if content.trim().is_empty() {
        return String::new();
    }
    let delimiter = &serializer.options().strong_delimiter;
    format!("{delimiter}{content}{delimiter}")
}

fn is_inline_code(node: &Handle, _: &MarkdownOptions) -> bool {
    if !dom::is_element(node, "code") {
        return false;
    }
    let has_siblings = dom::previous_sibling(node).is_some() || dom::next_sibling(node).is_some();
    !(parent_is(node, "pre") && !has_siblings)
}

/// Inline code, delimited by a backtick run that does not occur inside it.
fn code(content: &str, _: &Handle, _: &MarkdownSerializer) -> String {
    if content.is_empty() {
        return String::new();
    }
    let content = LINE_ENDINGS.replace_all(content, " ");
    let fenced_by_backtick = content.starts_with('`') || content.ends_with('`');
    let padding = if fenced_by_backtick || SPACE_PADDED.is_match(&content) {
        " "
    } else {
        ""
    };
    let runs: Vec<usize> = BACKTICK_RUNS
        .find_iter(&content)
        .map(|m| m.as_str().len())
        .collect();
    let mut width = 1;
    while runs.contains(&width) {
        width += 1;
    }
    let delimiter = "`".repeat(width);
    format!("{delimiter}{padding}{content}{padding}{delimiter}")
}

fn image(_: &str, node: &Handle, _: &MarkdownSerializer) -> String {
    let src = dom::attr(node, "src").unwrap_or_default();
    if src.is_empty() {
        return String::new();
    }
    let alt = clean_attribute(dom::attr(node, "alt"));
    let title = clean_attribute(dom::attr(node, "title"));
    let title = if title.is_empty() {
        String::new()
    } else {
        format!(" \"{title}\"")
    };
    format!("![{alt}]({src}{title})")
}
