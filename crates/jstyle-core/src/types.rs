//! Core types for violations, per-file reports and run results.

use crate::message::MessageArg;
use crate::parser::ParseError;
use crate::token::TokenType;
use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Severity level for violations.
///
/// `Ignore` is accepted in configuration; violations carrying it are
/// dropped before reporting.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Never reported.
    Ignore,
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    #[default]
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ignore => write!(f, "ignore"),
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown severity `{other}`")),
        }
    }
}

/// Source code location of a violation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path as discovered.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, tabs expanded).
    pub column: usize,
    /// Byte offset in the file, for diagnostics rendering.
    #[serde(default)]
    pub offset: usize,
    /// Length of the span in bytes.
    #[serde(default)]
    pub length: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }
}

/// A violation logged by a check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    /// Check code (e.g., "JS001").
    pub code: String,
    /// Check name (e.g., "throws-count").
    pub check: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Where the violation was logged.
    pub location: Location,
    /// Message key within the check's message table.
    pub key: String,
    /// Positional message arguments.
    #[serde(default)]
    pub args: Vec<MessageArg>,
    /// Rendered message.
    pub message: String,
    /// Type of the node the violation was logged against.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_type: Option<TokenType>,
}

impl Violation {
    /// Line number (1-indexed).
    #[must_use]
    pub fn line(&self) -> usize {
        self.location.line
    }

    /// Column number (1-indexed).
    #[must_use]
    pub fn column(&self) -> usize {
        self.location.column
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code,
            self.check,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.check,
            self.message
        )
    }
}

/// Converts a Violation to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            message: format!("[{}] {}", v.code, v.message),
            span: SourceSpan::from((v.location.offset, v.location.length)),
            label_message: v.check.clone(),
        }
    }
}

/// Why a file produced no report.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FileError {
    /// The file could not be read.
    #[error("cannot read file: {0}")]
    Io(String),

    /// The parser rejected the file.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// A check failed while walking the file; its results were discarded.
    #[error("check `{check}` failed at {line}:{column}: {message}")]
    Check {
        /// Name of the failing check.
        check: String,
        /// Line of the node being processed, 0 outside the walk.
        line: usize,
        /// Column of the node being processed.
        column: usize,
        /// Failure description.
        message: String,
    },

    /// Check instances could not be created for this worker.
    #[error("cannot instantiate checks: {0}")]
    Setup(String),
}

/// Violations found in one file, in report order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileReport {
    /// File path.
    pub path: PathBuf,
    /// Ordered, deduplicated violations.
    pub violations: Vec<Violation>,
}

/// A file that could not be checked.
#[derive(Debug, Clone, Serialize)]
pub struct FileFailure {
    /// File path.
    pub path: PathBuf,
    /// Rendered error.
    pub error: String,
    #[serde(skip)]
    kind: Option<FileError>,
}

impl FileFailure {
    /// Wraps a file error.
    #[must_use]
    pub fn new(path: PathBuf, error: FileError) -> Self {
        Self {
            path,
            error: error.to_string(),
            kind: Some(error),
        }
    }

    /// The underlying error.
    #[must_use]
    pub fn kind(&self) -> Option<&FileError> {
        self.kind.as_ref()
    }
}

/// Result of running an analysis.
#[derive(Debug, Default, Serialize)]
pub struct LintResult {
    /// One report per successfully checked file, sorted by path.
    pub reports: Vec<FileReport>,
    /// Files that failed to read, parse or walk, sorted by path.
    pub failures: Vec<FileFailure>,
    /// Number of files checked.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All violations across files, in report order.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.reports.iter().flat_map(|r| r.violations.iter())
    }

    /// Total number of violations.
    #[must_use]
    pub fn violation_count(&self) -> usize {
        self.reports.iter().map(|r| r.violations.len()).sum()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.has_violations_at(Severity::Error)
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations().any(|v| v.severity >= severity)
    }

    /// Returns true when some file could not be checked.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    /// Counts violations by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |s: Severity| self.violations().filter(|v| v.severity == s).count();
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Formats violations at or above `fail_on` as a multi-line report.
    #[must_use]
    pub fn format_test_report(&self, fail_on: Severity) -> String {
        use std::fmt::Write;

        let failing: Vec<&Violation> = self.violations().filter(|v| v.severity >= fail_on).collect();

        let mut report = String::new();
        let _ = writeln!(report, "\n=== jstyle: {} violation(s) ===\n", failing.len());

        for v in &failing {
            let _ = writeln!(report, "{}", v.format());
        }
        for failure in &self.failures {
            let _ = writeln!(report, "{}: {}", failure.path.display(), failure.error);
        }

        let (errors, warnings, infos) = self.count_by_severity();
        let _ = writeln!(
            report,
            "Total: {} error(s), {} warning(s), {} info(s) in {} file(s)",
            errors, warnings, infos, self.files_checked
        );

        report
    }

    /// Adds reports and failures from another result.
    pub fn extend(&mut self, other: Self) {
        self.reports.extend(other.reports);
        self.failures.extend(other.failures);
        self.files_checked += other.files_checked;
    }
}
