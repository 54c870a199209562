//! Line-range suppressions from configuration.

use crate::aggregator::SuppressionRegion;
use crate::config::{ConfigError, SuppressionConfig};
use std::path::Path;

#[derive(Debug, Clone)]
struct SuppressionRule {
    files: glob::Pattern,
    checks: Vec<String>,
    lines: Vec<(usize, usize)>,
}

/// Compiled `[[suppressions]]` entries.
#[derive(Debug, Clone, Default)]
pub struct SuppressionFilter {
    rules: Vec<SuppressionRule>,
}

impl SuppressionFilter {
    /// Validates and compiles suppression entries.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidSuppression`] for a bad glob or line list.
    pub fn compile(entries: &[SuppressionConfig]) -> Result<Self, ConfigError> {
        let rules = entries
            .iter()
            .map(|entry| {
                let invalid = |reason: String| ConfigError::InvalidSuppression {
                    spec: entry.files.clone(),
                    reason,
                };
                let files = glob::Pattern::new(&entry.files).map_err(|e| invalid(e.to_string()))?;
                let lines = match &entry.lines {
                    Some(spec) => parse_line_ranges(spec).map_err(invalid)?,
                    None => Vec::new(),
                };
                let checks = entry
                    .checks
                    .as_deref()
                    .unwrap_or_default()
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
                Ok(SuppressionRule {
                    files,
                    checks,
                    lines,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Self { rules })
    }

    /// Number of compiled entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns true when no entry is configured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Regions applying to `path`. Entries without `lines` cover the file.
    #[must_use]
    pub fn regions_for(&self, path: &Path) -> Vec<SuppressionRegion> {
        let mut regions = Vec::new();
        for rule in self.rules.iter().filter(|r| r.files.matches_path(path)) {
            let ranges = if rule.lines.is_empty() {
                vec![(1, usize::MAX)]
            } else {
                rule.lines.clone()
            };
            for (first_line, last_line) in ranges {
                if rule.checks.is_empty() {
                    regions.push(SuppressionRegion::all(first_line, last_line));
                } else {
                    regions.extend(
                        rule.checks
                            .iter()
                            .map(|c| SuppressionRegion::for_check(first_line, last_line, c.clone())),
                    );
                }
            }
        }
        regions
    }
}

/// Parses `"8-12, 20"` into inclusive ranges.
///
/// # Errors
///
/// Returns a description of the first malformed item.
pub fn parse_line_ranges(spec: &str) -> Result<Vec<(usize, usize)>, String> {
    spec.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|item| {
            let number = |s: &str| {
                s.trim()
                    .parse::<usize>()
                    .map_err(|_| format!("`{item}` is not a line or line range"))
            };
            let (first, last) = match item.split_once('-') {
                Some((a, b)) => (number(a)?, number(b)?),
                None => {
                    let n = number(item)?;
                    (n, n)
                }
            };
            if first == 0 || last < first {
                return Err(format!("`{item}` is not a valid line range"));
            }
            Ok((first, last))
        })
        .collect()
}
