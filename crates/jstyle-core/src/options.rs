//! Typed option extraction for checks.
//!
//! Options arrive as strings (TOML values are stringified, arrays joined with
//! `,`). Each check factory pulls the keys it understands through the typed
//! getters below; anything left over after construction is reported as an
//! unknown option.

use crate::token::{parse_token_list, TokenType};
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

/// Invalid or unknown check option.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OptionError {
    /// A value could not be converted.
    #[error("invalid value `{value}` for option `{key}` of check `{check}`: {reason}")]
    Invalid {
        /// Check name.
        check: String,
        /// Option key.
        key: String,
        /// Raw value.
        value: String,
        /// Conversion failure.
        reason: String,
    },

    /// The check does not understand the option.
    #[error("unknown option `{key}` for check `{check}`")]
    Unknown {
        /// Check name.
        check: String,
        /// Option key.
        key: String,
    },
}

/// String-valued options of one configured check.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    check: String,
    values: BTreeMap<String, String>,
    consumed: BTreeSet<String>,
}

impl CheckOptions {
    /// Wraps the raw option map of `check`.
    #[must_use]
    pub fn new(check: impl Into<String>, values: BTreeMap<String, String>) -> Self {
        Self {
            check: check.into(),
            values,
            consumed: BTreeSet::new(),
        }
    }

    /// Options with no values.
    #[must_use]
    pub fn empty(check: impl Into<String>) -> Self {
        Self::new(check, BTreeMap::new())
    }

    /// Adds a value.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// The raw values.
    #[must_use]
    pub fn values(&self) -> &BTreeMap<String, String> {
        &self.values
    }

    /// Raw string value, marking the key as understood.
    pub fn raw(&mut self, key: &str) -> Option<&str> {
        self.consumed.insert(key.to_string());
        self.values.get(key).map(String::as_str)
    }

    /// String option.
    pub fn string(&mut self, key: &str, default: &str) -> String {
        self.raw(key).unwrap_or(default).to_string()
    }

    /// Boolean option (`true` / `false`).
    ///
    /// # Errors
    ///
    /// Fails on any other value.
    pub fn bool(&mut self, key: &str, default: bool) -> Result<bool, OptionError> {
        self.parsed(key, default, |v| match v.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err("expected `true` or `false`".to_string()),
        })
    }

    /// Non-negative integer option.
    ///
    /// # Errors
    ///
    /// Fails when the value is not a non-negative integer.
    pub fn usize(&mut self, key: &str, default: usize) -> Result<usize, OptionError> {
        self.parsed(key, default, |v| {
            v.trim()
                .parse::<usize>()
                .map_err(|e| format!("expected a non-negative integer ({e})"))
        })
    }

    /// Enumerated option parsed through `FromStr`.
    ///
    /// # Errors
    ///
    /// Fails when `FromStr` rejects the value.
    pub fn choice<T>(&mut self, key: &str, default: T) -> Result<T, OptionError>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.parsed(key, default, |v| T::from_str(v.trim()).map_err(|e| e.to_string()))
    }

    /// Regular expression option.
    ///
    /// # Errors
    ///
    /// Fails when the pattern (configured or default) does not compile.
    pub fn regex(&mut self, key: &str, default: &str) -> Result<Regex, OptionError> {
        let pattern = self.string(key, default);
        Regex::new(&pattern).map_err(|e| self.invalid(key, &pattern, e.to_string()))
    }

    /// Comma separated token type list, `None` when absent.
    ///
    /// # Errors
    ///
    /// Fails on unknown token names.
    pub fn tokens(&mut self, key: &str) -> Result<Option<Vec<TokenType>>, OptionError> {
        let Some(raw) = self.raw(key).map(str::to_string) else {
            return Ok(None);
        };
        parse_token_list(&raw)
            .map(Some)
            .map_err(|e| self.invalid(key, &raw, e.to_string()))
    }

    /// Comma separated string list.
    pub fn list(&mut self, key: &str) -> Vec<String> {
        self.raw(key)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Reports the first key no getter asked for.
    ///
    /// # Errors
    ///
    /// Returns [`OptionError::Unknown`] for a leftover key.
    pub fn finish(&self) -> Result<(), OptionError> {
        match self.values.keys().find(|k| !self.consumed.contains(*k)) {
            Some(key) => Err(OptionError::Unknown {
                check: self.check.clone(),
                key: key.clone(),
            }),
            None => Ok(()),
        }
    }

    fn parsed<T>(
        &mut self,
        key: &str,
        default: T,
        parse: impl FnOnce(&str) -> Result<T, String>,
    ) -> Result<T, OptionError> {
        let Some(raw) = self.raw(key).map(str::to_string) else {
            return Ok(default);
        };
        parse(&raw).map_err(|reason| self.invalid(key, &raw, reason))
    }

    fn invalid(&self, key: &str, value: &str, reason: String) -> OptionError {
        OptionError::Invalid {
            check: self.check.clone(),
            key: key.to_string(),
            value: value.to_string(),
            reason,
        }
    }
}
