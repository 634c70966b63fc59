//! Markdown format implementation
//!
//! Export converts a tree to the docs-site Markdown dialect: CommonMark + GFM
//! tables, strikethrough and task lists, plus `:::type` callouts, `<Tabs>` /
//! `<TabItem>` components, `<details>` blocks and `$`/`$$` math. Export goes
//! through the editor's HTML: tree → HTML (renderer) → Markdown (rule engine),
//! so any HTML the editor produces can be exported the same way.
//!
//! Import goes the other way through HTML as well: Markdown → HTML (comrak) →
//! tree (HTML parser).
//!
//! # Library Choice
//!
//! - `html5ever` + `markup5ever_rcdom` provide the DOM the rule engine walks.
//! - `comrak` renders CommonMark with GFM extensions to HTML on import.
//!
//! # Element Mapping Table
//!
//! | HTML construct                     | Markdown                                                    |
//! |------------------------------------|-------------------------------------------------------------|
//! | `<p>` (inside `<li>`)              | content inline                                              |
//! | `<p>`                              | `\n\n<content>\n\n`                                         |
//! | `div[data-type=callout]`           | `:::<type>` ... `:::`                                       |
//! | `div[data-type=tabs]`              | `<Tabs>` ... `</Tabs>`                                      |
//! | `div[data-type=tab]`               | `<TabItem value='<slug>' label='<title>'>` ... `</TabItem>` |
//! | `li[data-type=taskItem]` in `<ul>` | `- [x]  <content> ` / `- [ ]  <content> `                   |
//! | `<details>`                        | `<details>` + `<summary>S</summary>` + body                 |
//! | `span[data-type=mathInline]`       | `$<text>$`                                                  |
//! | `div[data-type=mathBlock]`         | `$$` block                                                  |
//! | `<iframe src>`                     | `[src](src)`                                                |
//! | code blocks                        | fenced, fence longer than any fence run in the code         |
//! | `<table>`                          | GFM pipe table (empty header row when none is marked)       |
//! | `<s>`, `<del>`, `<strike>`         | `~~text~~`                                                  |
//!
//! # Lossy Conversions
//!
//! - Attachments, embeds and videos have no Markdown form and are dropped.
//! - Marks without Markdown syntax (underline, highlight, colour, sub/sup,
//!   comments) export as plain text.
//! - Literal `<br>` in the output (table cells) becomes a single space.
//! - Task lists import as bullet lists with a task item per checkbox entry.

pub mod code_block;
pub mod parser;
pub mod rules;
pub mod serializer;

pub use rules::Rule;
pub use serializer::{html_to_markdown, serialize_to_markdown, MarkdownSerializer};

use crate::error::FormatError;
use crate::format::{unknown_option, Direction, Format};
use crate::formats::html::{serialize_to_html_with_options, HtmlOptions};
use crate::model::Node;
use serde::Deserialize;
use std::collections::HashMap;
use std::str::FromStr;

/// Heading syntax
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingStyle {
    /// `# Title`
    #[default]
    Atx,
    /// Underlined with `=` / `-` for levels 1 and 2
    Setext,
}

impl FromStr for HeadingStyle {
    type Err = FormatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "atx" => Ok(HeadingStyle::Atx),
            "setext" => Ok(HeadingStyle::Setext),
            other => Err(FormatError::SerializationError(format!(
                "Unknown heading style '{other}' (expected atx or setext)"
            ))),
        }
    }
}

/// Options for Markdown export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkdownOptions {
    pub heading_style: HeadingStyle,
    pub hr: String,
    pub bullet_list_marker: String,
    /// Fence string; its first character is repeated to build fences
    pub fence: String,
    pub em_delimiter: String,
    pub strong_delimiter: String,
    /// Emitted before the newline of a hard break
    pub br: String,
}

impl Default for MarkdownOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Atx,
            hr: "---".to_string(),
            bullet_list_marker: "-".to_string(),
            fence: "```".to_string(),
            em_delimiter: "_".to_string(),
            strong_delimiter: "**".to_string(),
            br: "  ".to_string(),
        }
    }
}

impl MarkdownOptions {
    /// Apply `--extra-*` style overrides.
    pub fn apply_overrides(&mut self, options: &HashMap<String, String>) -> Result<(), FormatError> {
        for (key, value) in options {
            match key.as_str() {
                "fence" => self.fence = value.clone(),
                "heading-style" => self.heading_style = value.parse()?,
                "bullet-list-marker" => self.bullet_list_marker = value.clone(),
                "hr" => self.hr = value.clone(),
                "em-delimiter" => self.em_delimiter = value.clone(),
                "strong-delimiter" => self.strong_delimiter = value.clone(),
                _ => return Err(unknown_option("markdown", key)),
            }
        }
        if !matches!(self.fence.chars().next(), Some('`' | '~')) {
            return Err(FormatError::SerializationError(format!(
                "Fence must start with '`' or '~', got '{}'",
                self.fence
            )));
        }
        Ok(())
    }
}

/// Format implementation for Markdown
#[derive(Default)]
pub struct MarkdownFormat {
    options: MarkdownOptions,
    html: HtmlOptions,
}

impl MarkdownFormat {
    pub fn new(options: MarkdownOptions, html: HtmlOptions) -> Self {
        Self { options, html }
    }
}

impl Format for MarkdownFormat {
    fn name(&self) -> &str {
        "markdown"
    }

    fn description(&self) -> &str {
        "Docs-site Markdown (GFM with callouts, tabs, details and math)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["md", "markdown"]
    }

    fn direction(&self) -> Direction {
        Direction::Both
    }

    fn parse(&self, source: &str) -> Result<Node, FormatError> {
        parser::parse_from_markdown_with_options(source, &self.html)
    }

    fn serialize(&self, doc: &Node) -> Result<String, FormatError> {
        let html = serialize_to_html_with_options(doc, &self.html)?;
        Ok(html_to_markdown(&html, &self.options))
    }

    fn serialize_with_options(
        &self,
        doc: &Node,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let mut markdown_options = self.options.clone();
        markdown_options.apply_overrides(options)?;
        let html = serialize_to_html_with_options(doc, &self.html)?;
        Ok(html_to_markdown(&html, &markdown_options))
    }
}
