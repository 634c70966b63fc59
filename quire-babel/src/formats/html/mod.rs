//! HTML format implementation
//!
//! This module implements bidirectional conversion between node trees and the
//! editor's HTML dialect.
//!
//! # Library Choice
//!
//! We use the `html5ever` + `markup5ever_rcdom` ecosystem for HTML parsing and serialization:
//! - `html5ever`: Browser-grade HTML5 parser and serializer from the Servo project
//! - `markup5ever_rcdom`: Reference-counted DOM tree implementation
//!
//! Rendering builds an RcDom and serializes it, so escaping is never done by hand.
//! Parsing goes through the same tokenizer a browser uses, so malformed input is
//! recovered from the same way the editor's clipboard would.
//!
//! # Element Mapping Table
//!
//! | Node             | HTML                                                                  |
//! |------------------|-----------------------------------------------------------------------|
//! | paragraph        | `<p>`                                                                 |
//! | heading          | `<h1>`..`<h6>`                                                        |
//! | blockquote       | `<blockquote>`                                                        |
//! | bulletList       | `<ul>` / orderedList `<ol start>` / listItem `<li>`                   |
//! | taskList         | `<ul data-type="taskList">`                                           |
//! | taskItem         | `<li data-type="taskItem" data-checked>` + `<label><input type="checkbox"><span>` + `<div>` hole |
//! | codeBlock        | `<pre><code class="language-X" data-title="T">`                       |
//! | horizontalRule   | `<hr>` / hardBreak `<br>`                                             |
//! | callout          | `<div data-type="callout" data-callout-type="T">`                     |
//! | tabs / tab       | `<div data-type="tabs">` / `<div data-type="tab" data-tab-title="T">` |
//! | details          | `<details data-type="details" open>` + `<summary>` + `<div data-type="detailsContent">` |
//! | mathInline/Block | `<span/div data-type="mathInline/mathBlock" data-katex="true">text`   |
//! | table            | `<table><tbody><tr><th/td colspan rowspan>`                           |
//! | image / video    | `<img>` / `<video controls>`                                          |
//! | attachment/embed | `<div data-type="attachment/embed" data-...>`                         |
//! | drawio/excalidraw| `<div data-type="drawio/excalidraw" data-...><img>`                   |
//! | youtube          | `<div data-youtube-video><iframe src>`                                |
//!
//! Marks: `<strong>`, `<em>`, `<u>`, `<s>`, `<code>`, `<a href target rel>`,
//! `<mark data-color>`, `<span style="color">`, `<sub>`, `<sup>`,
//! `<span data-comment-id>`.
//!
//! # Lossy Conversions
//!
//! - Unknown elements are transparent on import; their attributes are lost.
//! - Whitespace outside `<pre>` is collapsed.
//! - Marks on non-text inline nodes are dropped on import.

pub mod parser;
pub mod serializer;

pub use parser::{parse_from_html, parse_from_html_with_options};
pub use serializer::{serialize_to_html, serialize_to_html_with_options};

use crate::error::FormatError;
use crate::format::{unknown_option, Direction, Format};
use crate::model::Node;
use crate::schema::LanguageTable;
use std::collections::HashMap;

/// Options shared by the renderer and the parser
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlOptions {
    /// Class prefix marking a code block's language on the inner `<code>`
    pub language_class_prefix: String,
    /// Language assigned to parsed code blocks that declare none
    pub default_language: Option<String>,
    /// Registered languages, used to canonicalize parsed language names
    pub languages: LanguageTable,
}

impl Default for HtmlOptions {
    fn default() -> Self {
        Self {
            language_class_prefix: "language-".to_string(),
            default_language: None,
            languages: LanguageTable::common(),
        }
    }
}

impl HtmlOptions {
    pub fn with_languages(mut self, languages: LanguageTable) -> Self {
        self.languages = languages;
        self
    }

    /// Apply `--extra-*` style overrides.
    pub fn apply_overrides(&mut self, options: &HashMap<String, String>) -> Result<(), FormatError> {
        for (key, value) in options {
            match key.as_str() {
                "language-class-prefix" => self.language_class_prefix = value.clone(),
                "default-language" => {
                    self.default_language = Some(value.clone()).filter(|v| !v.is_empty())
                }
                _ => return Err(unknown_option("html", key)),
            }
        }
        Ok(())
    }
}

/// Format implementation for HTML
#[derive(Default)]
pub struct HtmlFormat {
    options: HtmlOptions,
}

impl HtmlFormat {
    pub fn new(options: HtmlOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &HtmlOptions {
        &self.options
    }
}

impl Format for HtmlFormat {
    fn name(&self) -> &str {
        "html"
    }

    fn description(&self) -> &str {
        "Editor HTML (data-type containers, task items, math, embeds)"
    }

    fn file_extensions(&self) -> &[&str] {
        &["html", "htm"]
    }

    fn direction(&self) -> Direction {
        Direction::Both
    }

    fn parse(&self, source: &str) -> Result<Node, FormatError> {
        parse_from_html_with_options(source, &self.options)
    }

    fn serialize(&self, doc: &Node) -> Result<String, FormatError> {
        serialize_to_html_with_options(doc, &self.options)
    }

    fn serialize_with_options(
        &self,
        doc: &Node,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let mut html_options = self.options.clone();
        html_options.apply_overrides(options)?;
        serialize_to_html_with_options(doc, &html_options)
    }
}
