//! Code block detection and fencing
//!
//! Three shapes of `<pre>` count as code blocks:
//!
//! - a `<pre>` directly inside `<td class="code">` (line-numbered highlighters
//!   render the code into the second cell of a table),
//! - a `<pre style="...">` whose `font-family` list names `monospace`,
//! - a `<pre>` whose first child is a `<code>` element (the editor's own shape).
//!
//! For the first two the `<pre>` itself carries the language class and title;
//! for the last the inner `<code>` does.

use crate::common::css;
use crate::common::dom;
use markup5ever_rcdom::Handle;
use once_cell::sync::Lazy;
use regex::Regex;

static LANGUAGE_CLASS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"language-(\S+)").expect("valid language class regex"));

static LEADING_BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:[ \t]*\n)+").expect("valid blank line regex"));

pub fn is_code_block(node: &Handle) -> bool {
    if is_table_code_block(node) || is_monospace_block(node) {
        return true;
    }
    dom::is_element(node, "pre")
        && dom::first_child(node).is_some_and(|child| dom::is_element(&child, "code"))
}

/// `<td class="code"><pre>`
pub fn is_table_code_block(node: &Handle) -> bool {
    if !dom::is_element(node, "pre") {
        return false;
    }
    dom::parent(node).is_some_and(|parent| {
        dom::is_element(&parent, "td") && dom::has_class(&parent, "code")
    })
}

/// `<pre>` styled with a monospace font family.
pub fn is_monospace_block(node: &Handle) -> bool {
    if !dom::is_element(node, "pre") {
        return false;
    }
    let Some(style) = dom::attr(node, "style").filter(|s| !s.is_empty()) else {
        return false;
    };
    let declarations = match css::parse_declarations(&style) {
        Ok(declarations) => declarations,
        Err(err) => {
            tracing::debug!(%style, error = %err, "ignoring unparsable pre style");
            return false;
        }
    };
    declarations
        .iter()
        .find(|d| d.property == "font-family")
        .is_some_and(|d| {
            d.value
                .split(',')
                .any(|family| family.trim().eq_ignore_ascii_case("monospace"))
        })
}

/// The element carrying the language class and title of a code block.
pub fn code_element(pre: &Handle) -> Handle {
    if is_table_code_block(pre) || is_monospace_block(pre) {
        return pre.clone();
    }
    dom::first_child(pre).unwrap_or_else(|| pre.clone())
}

/// Language named by a `language-X` class, or empty.
pub fn code_language(element: &Handle) -> String {
    dom::attr(element, "class")
        .and_then(|class| {
            LANGUAGE_CLASS
                .captures(&class)
                .map(|caps| caps[1].to_string())
        })
        .unwrap_or_default()
}

/// Fence length for `code`: three, or one more than the longest run of
/// `fence_char` (three or more) opening any line.
pub fn fence_length(code: &str, fence_char: char) -> usize {
    code.split('\n')
        .map(|line| line.chars().take_while(|&c| c == fence_char).count())
        .filter(|&run| run >= 3)
        .fold(3, |size, run| if run >= size { run + 1 } else { size })
}

/// Render a fenced block. Blank lines before the code and trailing
/// whitespace after it are dropped.
pub fn fence_code(code: &str, language: &str, title: Option<&str>, fence_char: char) -> String {
    let fence = fence_char.to_string().repeat(fence_length(code, fence_char));
    let body = LEADING_BLANK_LINES.replace(code, "");
    let body = body.trim_end();
    let title = match title {
        Some(title) if !title.is_empty() => format!(" title=\"{title}\""),
        _ => String::new(),
    };
    format!("\n\n{fence}{language}{title}\n{body}\n{fence}\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::dom::{find_first, parse_html};

    fn first_pre(html: &str) -> Handle {
        let dom = parse_html(html);
        find_first(&dom.document, &|n| dom::is_element(n, "pre")).unwrap()
    }

    #[test]
    fn test_fence_length() {
        assert_eq!(fence_length("let x = 1;", '`'), 3);
        assert_eq!(fence_length("```\nnested\n```", '`'), 4);
        assert_eq!(fence_length("`````rust", '`'), 6);
        assert_eq!(fence_length("  ```indented", '`'), 3);
        assert_eq!(fence_length("~~~~", '`'), 3);
        assert_eq!(fence_length("~~~~", '~'), 5);
    }

    #[test]
    fn test_fence_code_trims_blank_lines() {
        let out = fence_code("\n  \nfn main() {}\n\n", "rust", None, '`');
        assert_eq!(out, "\n\n```rust\nfn main() {}\n```\n\n");
    }

    #[test]
    fn test_fence_code_with_title() {
        let out = fence_code("print(1)", "python", Some("demo.py"), '`');
        assert_eq!(out, "\n\n```python title=\"demo.py\"\nprint(1)\n```\n\n");
        let untitled = fence_code("x", "", Some(""), '`');
        assert_eq!(untitled, "\n\n```\nx\n```\n\n");
    }

    #[test]
    fn test_editor_shape() {
        let pre = first_pre("<pre><code class=\"language-go\">x</code></pre>");
        assert!(is_code_block(&pre));
        assert_eq!(code_language(&code_element(&pre)), "go");
    }

    #[test]
    fn test_table_cell_shape() {
        let pre = first_pre(
            "<table><tr><td class=\"gutter\">1</td><td class=\"code\"><pre class=\"language-sh\">ls</pre></td></tr></table>",
        );
        assert!(is_table_code_block(&pre));
        assert!(is_code_block(&pre));
        assert_eq!(code_language(&code_element(&pre)), "sh");
    }

    #[test]
    fn test_monospace_shape() {
        let pre = first_pre("<pre style=\"font-family: 'Fira Code', Monospace; color: red\">x</pre>");
        assert!(is_monospace_block(&pre));

        let serif = first_pre("<pre style=\"font-family: serif\">x</pre>");
        assert!(!is_monospace_block(&serif));
        assert!(!is_code_block(&serif));

        let broken = first_pre("<pre style=\"font-family: monospace; {\">x</pre>");
        assert!(!is_monospace_block(&broken));
    }

    #[test]
    fn test_plain_pre_is_not_code() {
        let pre = first_pre("<pre>text</pre>");
        assert!(!is_code_block(&pre));
    }
}
