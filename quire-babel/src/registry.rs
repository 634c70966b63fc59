//! The set of interchange formats a tool works with
//!
//! A registry is built once from a [`FormatOptions`] bundle, usually derived from the user's
//! configuration, so every format it hands out already carries the configured code-block
//! languages, Markdown delimiters and text separators. Lookups go by the name used on the
//! command line (`--from`/`--to`) or by a file's extension.

use crate::error::FormatError;
use crate::format::{Direction, Format};
use crate::formats::{
    HtmlFormat, HtmlOptions, JsonFormat, MarkdownFormat, MarkdownOptions, TextFormat,
    TextOptions, TreevizFormat, TreevizOptions,
};
use crate::model::Node;
use std::collections::HashMap;

/// Options for every built-in format.
///
/// Markdown export renders through HTML first, so the Markdown format receives the HTML
/// options as well.
#[derive(Debug, Clone)]
pub struct FormatOptions {
    pub html: HtmlOptions,
    pub markdown: MarkdownOptions,
    pub text: TextOptions,
    pub treeviz: TreevizOptions,
    pub pretty_json: bool,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            html: HtmlOptions::default(),
            markdown: MarkdownOptions::default(),
            text: TextOptions::default(),
            treeviz: TreevizOptions::default(),
            pretty_json: true,
        }
    }
}

/// The built-in formats, kept in name order.
pub struct FormatRegistry {
    formats: Vec<Box<dyn Format>>,
}

impl FormatRegistry {
    pub fn new(options: &FormatOptions) -> Self {
        let mut formats: Vec<Box<dyn Format>> = vec![
            Box::new(HtmlFormat::new(options.html.clone())),
            Box::new(JsonFormat::new(options.pretty_json)),
            Box::new(MarkdownFormat::new(
                options.markdown.clone(),
                options.html.clone(),
            )),
            Box::new(TextFormat::new(options.text.clone())),
            Box::new(TreevizFormat::new(options.treeviz)),
        ];
        formats.sort_by(|a, b| a.name().cmp(b.name()));
        FormatRegistry { formats }
    }

    pub fn get(&self, name: &str) -> Result<&dyn Format, FormatError> {
        self.formats
            .iter()
            .find(|format| format.name() == name)
            .map(|format| format.as_ref())
            .ok_or_else(|| FormatError::FormatNotFound(name.to_string()))
    }

    pub fn list_formats(&self) -> Vec<String> {
        self.formats.iter().map(|f| f.name().to_string()).collect()
    }

    /// Name of the format owning the file's extension, compared case-insensitively.
    ///
    /// Both `.md` and `.markdown` map to markdown, `.htm` to html, and `.tree` to treeviz.
    pub fn detect_format_from_filename(&self, filename: &str) -> Option<String> {
        let extension = std::path::Path::new(filename)
            .extension()
            .and_then(|ext| ext.to_str())?
            .to_ascii_lowercase();
        self.formats
            .iter()
            .find(|format| format.file_extensions().contains(&extension.as_str()))
            .map(|format| format.name().to_string())
    }

    /// Parse `source` into a validated tree.
    pub fn parse(&self, source: &str, format: &str) -> Result<Node, FormatError> {
        let fmt = self.capable(format, Direction::Import)?;
        tracing::debug!(format, bytes = source.len(), "parsing");
        fmt.parse(source)
    }

    pub fn serialize(&self, doc: &Node, format: &str) -> Result<String, FormatError> {
        self.serialize_with_options(doc, format, &HashMap::new())
    }

    /// Serialize with `--extra-*` overrides for this one call.
    pub fn serialize_with_options(
        &self,
        doc: &Node,
        format: &str,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        let fmt = self.capable(format, Direction::Export)?;
        tracing::debug!(format, options = options.len(), "serializing");
        fmt.serialize_with_options(doc, options)
    }

    /// Parse in one format and serialize in another.
    pub fn convert(
        &self,
        source: &str,
        from: &str,
        to: &str,
        options: &HashMap<String, String>,
    ) -> Result<String, FormatError> {
        // fail on an unknown target before doing the parse
        self.capable(to, Direction::Export)?;
        let doc = self.parse(source, from)?;
        self.serialize_with_options(&doc, to, options)
    }

    fn capable(&self, name: &str, wanted: Direction) -> Result<&dyn Format, FormatError> {
        let format = self.get(name)?;
        let direction = format.direction();
        let (ok, verb) = match wanted {
            Direction::Import => (direction.can_parse(), "parsing"),
            _ => (direction.can_serialize(), "serialization"),
        };
        if ok {
            Ok(format)
        } else {
            Err(FormatError::NotSupported(format!(
                "Format '{name}' does not support {verb}"
            )))
        }
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new(&FormatOptions::default())
    }
}
