//! Code-block language table
//!
//! The set of language names the editor knows how to highlight. It is a plain
//! value: build it once (usually from configuration) and pass it to the HTML
//! options. Lookups are case-insensitive and return the registered spelling.

use std::collections::BTreeMap;

/// The languages bundled with the highlighter's common set.
pub const COMMON_LANGUAGES: &[&str] = &[
    "arduino",
    "bash",
    "c",
    "cpp",
    "csharp",
    "css",
    "diff",
    "go",
    "graphql",
    "ini",
    "java",
    "javascript",
    "json",
    "kotlin",
    "less",
    "lua",
    "makefile",
    "markdown",
    "objectivec",
    "perl",
    "php",
    "php-template",
    "plaintext",
    "python",
    "python-repl",
    "r",
    "ruby",
    "rust",
    "scss",
    "shell",
    "sql",
    "swift",
    "typescript",
    "vbnet",
    "wasm",
    "xml",
    "yaml",
];

/// Registered language names keyed by their lowercase form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LanguageTable {
    names: BTreeMap<String, String>,
}

impl LanguageTable {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The common highlighter set.
    pub fn common() -> Self {
        let mut table = Self::empty();
        table.extend(COMMON_LANGUAGES.iter().copied());
        table
    }

    /// Register a language. Registering a name twice keeps the first spelling.
    pub fn register(&mut self, name: impl Into<String>) {
        let name = name.into();
        let name = name.trim();
        if name.is_empty() {
            return;
        }
        self.names
            .entry(name.to_lowercase())
            .or_insert_with(|| name.to_string());
    }

    pub fn extend<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            self.register(name);
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(&name.to_lowercase())
    }

    /// The registered spelling of `name`, or `name` itself if unregistered.
    pub fn canonical<'a>(&'a self, name: &'a str) -> &'a str {
        self.names
            .get(&name.to_lowercase())
            .map(String::as_str)
            .unwrap_or(name)
    }

    /// All registered names, sorted.
    pub fn list(&self) -> Vec<&str> {
        self.names.values().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
