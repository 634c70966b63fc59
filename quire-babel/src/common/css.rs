//! Inline `style` attribute parsing
//!
//! Only declaration lists are understood (`prop: value; prop: value`), which is
//! all an inline style can legally hold. Quotes, parentheses and comments are
//! tracked so that `;` inside `url(...)` or a quoted font name does not split a
//! declaration.

use thiserror::Error;

/// A single `property: value` pair. The property is lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Declaration {
    pub property: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CssError {
    #[error("unterminated {0}")]
    Unterminated(&'static str),
    #[error("unbalanced ')'")]
    UnbalancedParen,
    #[error("unexpected '{0}' in a declaration list")]
    Unexpected(char),
    #[error("declaration '{0}' has no ':'")]
    MissingColon(String),
    #[error("declaration '{0}' has no property name")]
    MissingProperty(String),
}

/// Parse a declaration list.
pub fn parse_declarations(style: &str) -> Result<Vec<Declaration>, CssError> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut depth = 0usize;
    let mut chars = style.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            current.push(c);
            if c == '\\' {
                if let Some(escaped) = chars.next() {
                    current.push(escaped);
                }
            } else if c == q {
                quote = None;
            }
            continue;
        }
        match c {
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    if c == '*' && chars.peek() == Some(&'/') {
                        chars.next();
                        closed = true;
                        break;
                    }
                }
                if !closed {
                    return Err(CssError::Unterminated("comment"));
                }
            }
            '"' | '\'' => {
                quote = Some(c);
                current.push(c);
            }
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.checked_sub(1).ok_or(CssError::UnbalancedParen)?;
                current.push(c);
            }
            '{' | '}' => return Err(CssError::Unexpected(c)),
            ';' if depth == 0 => segments.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    if quote.is_some() {
        return Err(CssError::Unterminated("string"));
    }
    if depth > 0 {
        return Err(CssError::Unterminated("parenthesis"));
    }
    segments.push(current);

    segments
        .into_iter()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .map(|segment| {
            let (property, value) = segment
                .split_once(':')
                .ok_or_else(|| CssError::MissingColon(segment.clone()))?;
            let property = property.trim();
            if property.is_empty() {
                return Err(CssError::MissingProperty(segment.clone()));
            }
            Ok(Declaration {
                property: property.to_lowercase(),
                value: value.trim().to_string(),
            })
        })
        .collect()
}

/// Value of the last declaration of `property`, if the style parses.
pub fn property_value(style: &str, property: &str) -> Option<String> {
    parse_declarations(style)
        .ok()?
        .into_iter()
        .rev()
        .find(|d| d.property == property)
        .map(|d| d.value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_list() {
        let decls = parse_declarations("color: red; Font-Family: Menlo, monospace;").unwrap();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[1].property, "font-family");
        assert_eq!(decls[1].value, "Menlo, monospace");
    }

    #[test]
    fn test_semicolon_inside_quotes_and_parens() {
        let decls =
            parse_declarations("font-family: \"a;b\", mono; background: url(x;y)").unwrap();
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].value, "\"a;b\", mono");
        assert_eq!(decls[1].value, "url(x;y)");
    }

    #[test]
    fn test_comments_are_skipped() {
        let decls = parse_declarations("/* note */ color: blue").unwrap();
        assert_eq!(decls[0].property, "color");
    }

    #[test]
    fn test_errors() {
        assert!(parse_declarations("color red").is_err());
        assert!(parse_declarations("color: red }").is_err());
        assert!(parse_declarations("font-family: \"open").is_err());
        assert!(parse_declarations(": red").is_err());
        assert!(parse_declarations("/* open").is_err());
    }

    #[test]
    fn test_empty_style_has_no_declarations() {
        assert_eq!(parse_declarations("  ;  ").unwrap(), Vec::new());
    }

    #[test]
    fn test_property_value() {
        assert_eq!(
            property_value("color: red; color: #fff", "color"),
            Some("#fff".to_string())
        );
        assert_eq!(property_value("color red", "color"), None);
    }
}
