//! Configuration types for jstyle.

use crate::options::OptionError;
use crate::registry::CheckSettings;
use crate::token::TokenType;
use crate::types::Severity;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Top-level configuration for jstyle.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Preset used when no `[[checks]]` are listed ("recommended", "strict", "minimal").
    #[serde(default)]
    pub preset: Option<String>,

    /// Severity threshold for a failing run (default: "error").
    #[serde(default)]
    pub fail_on: Option<String>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,

    /// Comment marker suppression.
    #[serde(default)]
    pub suppression_comments: SuppressionCommentConfig,

    /// Configured checks, in registration order.
    #[serde(default)]
    pub checks: Vec<CheckConfig>,

    /// Line-range suppressions.
    #[serde(default)]
    pub suppressions: Vec<SuppressionConfig>,
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Parsed `fail_on` threshold (default: error).
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSeverity`] for an unknown name.
    pub fn fail_on(&self) -> Result<Severity, ConfigError> {
        self.fail_on.as_deref().map_or(Ok(Severity::Error), |s| {
            s.parse().map_err(|_| ConfigError::InvalidSeverity(s.to_string()))
        })
    }

    /// Converts every `[[checks]]` entry into registry settings.
    ///
    /// # Errors
    ///
    /// Fails on unknown token names.
    pub fn check_settings(&self) -> Result<Vec<CheckSettings>, ConfigError> {
        self.checks.iter().map(CheckConfig::to_settings).collect()
    }
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Tab width used when reporting columns.
    #[serde(default = "default_tab_width")]
    pub tab_width: usize,

    /// Maximum number of parallel file analyses.
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: vec!["**/build/**".to_string(), "**/target/**".to_string()],
            respect_gitignore: true,
            tab_width: default_tab_width(),
            parallelism: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_true() -> bool {
    true
}

fn default_tab_width() -> usize {
    crate::contents::DEFAULT_TAB_WIDTH
}

/// Comment markers that switch reporting off and on again.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuppressionCommentConfig {
    /// Whether markers are honoured.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Marker opening a suppressed region.
    #[serde(default = "default_off")]
    pub off: String,

    /// Marker closing a suppressed region.
    #[serde(default = "default_on")]
    pub on: String,
}

impl Default for SuppressionCommentConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            off: default_off(),
            on: default_on(),
        }
    }
}

fn default_off() -> String {
    "jstyle:off".to_string()
}

fn default_on() -> String {
    "jstyle:on".to_string()
}

/// One `[[checks]]` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckConfig {
    /// Check name or code.
    pub name: String,

    /// Severity override.
    #[serde(default)]
    pub severity: Option<Severity>,

    /// Token types replacing the check's defaults.
    #[serde(default)]
    pub tokens: Option<Vec<String>>,

    /// Check-specific options as key-value pairs.
    #[serde(flatten)]
    pub options: BTreeMap<String, toml::Value>,
}

impl CheckConfig {
    /// Gets an option value as a specific type.
    #[must_use]
    pub fn get_option<T: serde::de::DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.options
            .get(key)
            .and_then(|v| v.clone().try_into().ok())
    }

    /// Converts the entry into registry settings, stringifying option values.
    ///
    /// # Errors
    ///
    /// Fails on unknown token names.
    pub fn to_settings(&self) -> Result<CheckSettings, ConfigError> {
        let tokens = match &self.tokens {
            Some(names) => Some(
                names
                    .iter()
                    .map(|n| {
                        n.parse::<TokenType>().map_err(|e| {
                            ConfigError::from(OptionError::Invalid {
                                check: self.name.clone(),
                                key: "tokens".to_string(),
                                value: n.clone(),
                                reason: e.to_string(),
                            })
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?,
            ),
            None => None,
        };
        let options = self
            .options
            .iter()
            .map(|(k, v)| (k.clone(), stringify(v)))
            .collect();

        Ok(CheckSettings {
            name: self.name.clone(),
            severity: self.severity,
            tokens,
            options,
        })
    }
}

fn stringify(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Array(items) => items.iter().map(stringify).collect::<Vec<_>>().join(","),
        other => other.to_string(),
    }
}

/// One `[[suppressions]]` entry.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuppressionConfig {
    /// Glob matched against file paths.
    pub files: String,

    /// Comma separated check names or codes; all checks when absent.
    #[serde(default)]
    pub checks: Option<String>,

    /// Comma separated lines and ranges (`"8-12,20"`); whole file when absent.
    #[serde(default)]
    pub lines: Option<String>,
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// No registered check has this name or code.
    #[error("Unknown check `{0}`")]
    UnknownCheck(String),

    /// An option value could not be converted.
    #[error("Invalid value `{value}` for option `{key}` of check `{check}`: {reason}")]
    InvalidOption {
        /// Check name.
        check: String,
        /// Option key.
        key: String,
        /// Raw value.
        value: String,
        /// Conversion failure.
        reason: String,
    },

    /// A check does not understand an option.
    #[error("Unknown option `{key}` for check `{check}`")]
    UnknownOption {
        /// Check name.
        check: String,
        /// Option key.
        key: String,
    },

    /// A configured token is not acceptable to the check.
    #[error("Illegal token `{token}` for check `{check}`")]
    IllegalToken {
        /// Check name.
        check: String,
        /// Token name.
        token: String,
    },

    /// A token is outside the parser's token universe.
    #[error("Token `{token}` of check `{check}` is not produced by the parser")]
    UnsupportedToken {
        /// Check name.
        check: String,
        /// Token name.
        token: String,
    },

    /// A suppression entry is malformed.
    #[error("Invalid suppression `{spec}`: {reason}")]
    InvalidSuppression {
        /// Offending entry.
        spec: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Unknown preset name.
    #[error("Unknown preset `{0}`")]
    UnknownPreset(String),

    /// Unknown severity name.
    #[error("Invalid severity `{0}`")]
    InvalidSeverity(String),
}

impl From<OptionError> for ConfigError {
    fn from(e: OptionError) -> Self {
        match e {
            OptionError::Invalid {
                check,
                key,
                value,
                reason,
            } => Self::InvalidOption {
                check,
                key,
                value,
                reason,
            },
            OptionError::Unknown { check, key } => Self::UnknownOption { check, key },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.analyzer.respect_gitignore);
        assert_eq!(config.analyzer.tab_width, 8);
        assert!(config.checks.is_empty());
        assert!(config.suppression_comments.enabled);
        assert_eq!(config.fail_on().unwrap(), Severity::Error);
    }

    #[test]
    fn test_parse_config() {
        let toml = r#"
preset = "strict"
fail_on = "warning"

[analyzer]
root = "./src"
exclude = ["**/generated/**"]
tab_width = 4

[suppression_comments]
off = "CHECKSTYLE:OFF"

[[checks]]
name = "throws-count"
severity = "warning"
tokens = ["LITERAL_THROWS"]
max = 2
ignore_private_methods = false

[[checks]]
name = "left-curly"
option = "nl"

[[suppressions]]
files = "**/generated/**"
checks = "throws-count"
lines = "8-12"
"#;

        let config = Config::parse(toml).expect("Failed to parse");
        assert_eq!(config.analyzer.root, PathBuf::from("./src"));
        assert_eq!(config.analyzer.tab_width, 4);
        assert_eq!(config.fail_on().unwrap(), Severity::Warning);
        assert_eq!(config.suppression_comments.off, "CHECKSTYLE:OFF");
        assert_eq!(config.suppression_comments.on, "jstyle:on");
        assert_eq!(config.suppressions[0].lines.as_deref(), Some("8-12"));

        let settings = config.check_settings().unwrap();
        assert_eq!(settings.len(), 2);
        assert_eq!(settings[0].severity, Some(Severity::Warning));
        assert_eq!(settings[0].tokens, Some(vec![TokenType::LiteralThrows]));
        assert_eq!(settings[0].options.get("max").map(String::as_str), Some("2"));
        assert_eq!(
            settings[0].options.get("ignore_private_methods").map(String::as_str),
            Some("false")
        );
        assert_eq!(config.checks[0].get_option::<i64>("max"), Some(2));
        assert_eq!(settings[1].options.get("option").map(String::as_str), Some("nl"));
    }

    #[test]
    fn test_unknown_token_in_config() {
        let config = Config::parse("[[checks]]\nname = \"x\"\ntokens = [\"NOPE\"]\n").unwrap();
        assert!(matches!(
            config.check_settings(),
            Err(ConfigError::InvalidOption { ref key, .. }) if key == "tokens"
        ));
    }

    #[test]
    fn test_array_options_are_joined() {
        let value: toml::Value = toml::Value::Array(vec!["a".into(), "b".into()]);
        assert_eq!(stringify(&value), "a,b");
        assert_eq!(stringify(&toml::Value::Boolean(true)), "true");
    }

    #[test]
    fn test_invalid_fail_on() {
        let config = Config::parse("fail_on = \"loud\"").unwrap();
        assert!(matches!(config.fail_on(), Err(ConfigError::InvalidSeverity(_))));
    }
}
