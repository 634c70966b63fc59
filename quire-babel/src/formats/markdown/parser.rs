//! Markdown parsing (Markdown → node tree)
//!
//! Pipeline: Markdown string → directive expansion → comrak HTML → HTML parser.
//!
//! The docs-site constructs the exporter writes are not CommonMark, so they
//! are rewritten into the editor's HTML before comrak sees the text:
//!
//! - `:::type` ... `:::` becomes a callout `<div>`,
//! - `<Tabs>` / `<TabItem label='T'>` become tab `<div>`s,
//! - `$$` ... `$$` becomes a math block,
//! - the component import lines are dropped.
//!
//! Each opening tag is followed by a blank line so comrak keeps parsing the
//! inside as Markdown. Lines inside fenced code are left alone.

use crate::error::FormatError;
use crate::formats::html::{parse_from_html_with_options, HtmlOptions};
use crate::model::Node;
use comrak::{markdown_to_html, Options};
use once_cell::sync::Lazy;
use regex::Regex;

static CALLOUT_OPEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:::([A-Za-z][\w-]*)\s*$").expect("valid callout regex"));

static TAB_ITEM_OPEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"^<TabItem\b[^>]*?\blabel=(?:'([^']*)'|"([^"]*)")[^>]*>$"#)
        .expect("valid tab item regex")
});

const IMPORT_LINES: &[&str] = &[
    "import Tabs from '@theme/Tabs';",
    "import TabItem from '@theme/TabItem';",
];

/// Parse Markdown with default options
pub fn parse_from_markdown(source: &str) -> Result<Node, FormatError> {
    parse_from_markdown_with_options(source, &HtmlOptions::default())
}

pub fn parse_from_markdown_with_options(
    source: &str,
    options: &HtmlOptions,
) -> Result<Node, FormatError> {
    let expanded = expand_directives(source);
    let html = markdown_to_html(&expanded, &default_comrak_options());
    tracing::debug!(bytes = html.len(), "rendered markdown to html");
    parse_from_html_with_options(&html, options)
}

fn default_comrak_options() -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.superscript = true;
    // expanded directives are raw HTML
    options.render.unsafe_ = true;
    options
}

/// Fence state while scanning lines
struct Fence {
    marker: char,
    len: usize,
}

fn fence_run(line: &str) -> Option<Fence> {
    let trimmed = line.trim_start();
    let marker = trimmed.chars().next().filter(|c| *c == '`' || *c == '~')?;
    let len = trimmed.chars().take_while(|c| *c == marker).count();
    (len >= 3).then_some(Fence { marker, len })
}

fn escape_attr(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('"', "&quot;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Rewrite docs-site directives into editor HTML blocks.
pub fn expand_directives(source: &str) -> String {
    let mut out = Vec::new();
    let mut fence: Option<Fence> = None;
    let mut math: Option<Vec<&str>> = None;

    for line in source.lines() {
        if let Some(open) = &fence {
            let closes = fence_run(line).is_some_and(|run| {
                run.marker == open.marker
                    && run.len >= open.len
                    && line.trim().chars().all(|c| c == open.marker)
            });
            if closes {
                fence = None;
            }
            out.push(line.to_string());
            continue;
        }
        if let Some(lines) = &mut math {
            if line.trim() == "$$" {
                let tex = lines
                    .iter()
                    .filter(|l| !l.trim().is_empty())
                    .copied()
                    .collect::<Vec<_>>()
                    .join("\n");
                out.push(format!(
                    "<div data-type=\"mathBlock\">{}</div>\n",
                    escape_text(&tex)
                ));
                math = None;
            } else {
                lines.push(line);
            }
            continue;
        }

        let trimmed = line.trim();
        if let Some(run) = fence_run(line) {
            fence = Some(run);
            out.push(line.to_string());
        } else if IMPORT_LINES.contains(&trimmed) {
            continue;
        } else if trimmed == "$$" {
            math = Some(Vec::new());
        } else if let Some(caps) = CALLOUT_OPEN.captures(trimmed) {
            out.push(format!(
                "<div data-type=\"callout\" data-callout-type=\"{}\">\n",
                escape_attr(&caps[1])
            ));
        } else if trimmed == ":::" || trimmed == "</Tabs>" || trimmed == "</TabItem>" {
            out.push("\n</div>\n".to_string());
        } else if trimmed == "<Tabs>" {
            out.push("<div data-type=\"tabs\">\n".to_string());
        } else if let Some(caps) = TAB_ITEM_OPEN.captures(trimmed) {
            let label = caps.get(1).or_else(|| caps.get(2)).map_or("", |m| m.as_str());
            out.push(format!(
                "<div data-type=\"tab\" data-tab-title=\"{}\">\n",
                escape_attr(label)
            ));
        } else {
            out.push(line.to_string());
        }
    }

    // an unterminated math block is kept as text
    if let Some(lines) = math {
        out.push("$$".to_string());
        out.extend(lines.into_iter().map(str::to_string));
    }

    let mut expanded = out.join("\n");
    expanded.push('\n');
    expanded
}
