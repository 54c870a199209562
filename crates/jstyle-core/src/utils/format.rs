//! Regex-backed name format matching.

use crate::options::{CheckOptions, OptionError};
use regex::Regex;

/// A `format` option compiled once at configuration time.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    pattern: Regex,
}

impl PatternMatcher {
    /// Reads `key` from `options`, falling back to `default`.
    ///
    /// # Errors
    ///
    /// Fails when the pattern does not compile.
    pub fn from_options(
        options: &mut CheckOptions,
        key: &str,
        default: &str,
    ) -> Result<Self, OptionError> {
        Ok(Self {
            pattern: options.regex(key, default)?,
        })
    }

    /// Wraps an already compiled pattern.
    #[must_use]
    pub fn new(pattern: Regex) -> Self {
        Self { pattern }
    }

    /// Returns true if the pattern matches anywhere in `text`.
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.pattern.is_match(text)
    }

    /// The pattern source, for messages.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.pattern.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_default_or_configured_pattern() {
        let mut options = CheckOptions::empty("type-name");
        let matcher = PatternMatcher::from_options(&mut options, "format", "^[A-Z]").unwrap();
        assert!(matcher.matches("Foo"));
        assert!(!matcher.matches("foo"));
        assert_eq!(matcher.as_str(), "^[A-Z]");

        let mut options = CheckOptions::empty("type-name").with("format", "^x");
        let matcher = PatternMatcher::from_options(&mut options, "format", "^[A-Z]").unwrap();
        assert!(matcher.matches("xFoo"));
    }
}
