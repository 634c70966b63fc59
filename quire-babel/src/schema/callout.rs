//! Callout type domain

use std::fmt;
use std::str::FromStr;

/// The visual flavour of a callout block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CalloutType {
    Default,
    #[default]
    Info,
    Success,
    Warning,
    Danger,
    Note,
    Tip,
}

impl CalloutType {
    pub const ALL: [CalloutType; 7] = [
        CalloutType::Default,
        CalloutType::Info,
        CalloutType::Success,
        CalloutType::Warning,
        CalloutType::Danger,
        CalloutType::Note,
        CalloutType::Tip,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            CalloutType::Default => "default",
            CalloutType::Info => "info",
            CalloutType::Success => "success",
            CalloutType::Warning => "warning",
            CalloutType::Danger => "danger",
            CalloutType::Note => "note",
            CalloutType::Tip => "tip",
        }
    }
}

impl fmt::Display for CalloutType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CalloutType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown callout type '{s}'"))
    }
}

/// Normalize a raw callout type.
///
/// Empty input yields `None` so the caller falls back to the attribute default.
/// Anything outside the domain is coerced to [`CalloutType::Info`].
pub fn normalize_callout_type(raw: &str) -> Option<CalloutType> {
    if raw.is_empty() {
        return None;
    }
    match raw.parse() {
        Ok(callout_type) => Some(callout_type),
        Err(_) => {
            tracing::debug!(raw, "coercing unknown callout type to info");
            Some(CalloutType::Info)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_domain_values_are_kept() {
        for callout_type in CalloutType::ALL {
            assert_eq!(
                normalize_callout_type(callout_type.as_str()),
                Some(callout_type)
            );
        }
    }

    #[test]
    fn test_empty_is_none() {
        assert_eq!(normalize_callout_type(""), None);
    }

    #[test]
    fn test_case_sensitive() {
        assert_eq!(normalize_callout_type("Warning"), Some(CalloutType::Info));
    }

    proptest! {
        #[test]
        fn prop_outside_domain_is_info(raw in "[a-zA-Z0-9 _-]{1,16}") {
            let expected = raw.parse::<CalloutType>().unwrap_or(CalloutType::Info);
            prop_assert_eq!(normalize_callout_type(&raw), Some(expected));
        }

        #[test]
        fn prop_normalization_is_idempotent(raw in ".{0,12}") {
            let once = normalize_callout_type(&raw);
            let twice = once.and_then(|t| normalize_callout_type(t.as_str()));
            prop_assert_eq!(once, twice);
        }
    }
}
