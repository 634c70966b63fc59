//! Shared configuration loader for the quire toolchain.
//!
//! `defaults/quire.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`QuireConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use quire_babel::formats::html::HtmlOptions;
use quire_babel::formats::markdown::{HeadingStyle, MarkdownOptions};
use quire_babel::formats::text::TextOptions;
use quire_babel::formats::treeviz::TreevizOptions;
use quire_babel::schema::LanguageTable;
use quire_babel::FormatOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/quire.default.toml");

/// Top-level configuration consumed by quire applications.
#[derive(Debug, Clone, Deserialize)]
pub struct QuireConfig {
    pub markdown: MarkdownConfig,
    pub html: HtmlConfig,
    pub code: CodeConfig,
    pub text: TextConfig,
    pub inspect: InspectConfig,
}

/// Mirrors the knobs exposed by the Markdown serializer.
#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownConfig {
    pub heading_style: HeadingStyle,
    pub fence: String,
    pub bullet_list_marker: String,
    pub hr: String,
    pub em_delimiter: String,
    pub strong_delimiter: String,
}

impl From<&MarkdownConfig> for MarkdownOptions {
    fn from(config: &MarkdownConfig) -> Self {
        MarkdownOptions {
            heading_style: config.heading_style,
            fence: config.fence.clone(),
            bullet_list_marker: config.bullet_list_marker.clone(),
            hr: config.hr.clone(),
            em_delimiter: config.em_delimiter.clone(),
            strong_delimiter: config.strong_delimiter.clone(),
            ..MarkdownOptions::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct HtmlConfig {
    pub language_class_prefix: String,
    /// Empty means "leave unset".
    pub default_language: String,
}

/// Extra code-block languages registered on top of the common set.
#[derive(Debug, Clone, Deserialize)]
pub struct CodeConfig {
    pub languages: Vec<String>,
}

impl From<&CodeConfig> for LanguageTable {
    fn from(config: &CodeConfig) -> Self {
        let mut table = LanguageTable::common();
        table.extend(config.languages.iter().cloned());
        table
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TextConfig {
    pub block_separator: String,
}

impl From<&TextConfig> for TextOptions {
    fn from(config: &TextConfig) -> Self {
        TextOptions {
            block_separator: config.block_separator.clone(),
        }
    }
}

/// Controls `quire inspect` output.
#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    pub show_positions: bool,
    pub include_all: bool,
}

impl From<&InspectConfig> for TreevizOptions {
    fn from(config: &InspectConfig) -> Self {
        TreevizOptions {
            include_all: config.include_all,
            show_pos: config.show_positions,
        }
    }
}

impl QuireConfig {
    pub fn markdown_options(&self) -> MarkdownOptions {
        (&self.markdown).into()
    }

    pub fn languages(&self) -> LanguageTable {
        (&self.code).into()
    }

    /// HTML options with the configured language table.
    pub fn html_options(&self) -> HtmlOptions {
        HtmlOptions {
            language_class_prefix: self.html.language_class_prefix.clone(),
            default_language: Some(self.html.default_language.clone()).filter(|l| !l.is_empty()),
            languages: self.languages(),
        }
    }

    pub fn text_options(&self) -> TextOptions {
        (&self.text).into()
    }

    pub fn treeviz_options(&self) -> TreevizOptions {
        (&self.inspect).into()
    }

    /// Options for every built-in format, ready for `FormatRegistry::new`.
    pub fn format_options(&self) -> FormatOptions {
        FormatOptions {
            html: self.html_options(),
            markdown: self.markdown_options(),
            text: self.text_options(),
            treeviz: self.treeviz_options(),
            ..FormatOptions::default()
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<QuireConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<QuireConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.markdown.heading_style, HeadingStyle::Atx);
        assert_eq!(config.markdown.fence, "```");
        assert_eq!(config.html.language_class_prefix, "language-");
        assert_eq!(config.text.block_separator, "\n\n");
        assert!(!config.inspect.show_positions);
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("markdown.fence", "~~~")
            .expect("override to apply")
            .set_override("markdown.heading_style", "setext")
            .expect("override to apply")
            .build()
            .expect("config to build");
        let options = config.markdown_options();
        assert_eq!(options.fence, "~~~");
        assert_eq!(options.heading_style, HeadingStyle::Setext);
    }

    #[test]
    fn markdown_config_converts_to_options() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.markdown_options(), MarkdownOptions::default());
    }

    #[test]
    fn format_options_follow_overrides() {
        let config = Loader::new()
            .set_override("text.block_separator", " / ")
            .expect("override to apply")
            .set_override("inspect.show_positions", true)
            .expect("override to apply")
            .build()
            .expect("config to build");
        let options = config.format_options();
        assert_eq!(options.text.block_separator, " / ");
        assert!(options.treeviz.show_pos);
        assert!(options.html.languages.contains("mermaid"));
        assert!(options.pretty_json);
    }

    #[test]
    fn extra_languages_are_registered() {
        let config = load_defaults().expect("defaults to deserialize");
        let languages = config.languages();
        assert!(languages.contains("mermaid"));
        assert!(languages.contains("Haskell"));
        assert!(languages.len() > config.code.languages.len());
    }

    #[test]
    fn empty_default_language_stays_unset() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.html_options().default_language, None);

        let config = Loader::new()
            .set_override("html.default_language", "plaintext")
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(
            config.html_options().default_language.as_deref(),
            Some("plaintext")
        );
    }

    #[test]
    fn missing_required_file_fails() {
        let result = Loader::new().with_file("/nonexistent/quire.toml").build();
        assert!(result.is_err());
    }
}
