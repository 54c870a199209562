//! Violation collection, suppression, ordering and deduplication.

use crate::types::{Severity, Violation};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A line range in which violations are not reported.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuppressionRegion {
    /// First suppressed line (inclusive).
    pub first_line: usize,
    /// Last suppressed line (inclusive).
    pub last_line: usize,
    /// Check name or code; `None` suppresses every check.
    pub check: Option<String>,
}

impl SuppressionRegion {
    /// Suppresses every check on the given lines.
    #[must_use]
    pub fn all(first_line: usize, last_line: usize) -> Self {
        Self {
            first_line,
            last_line,
            check: None,
        }
    }

    /// Suppresses one check on the given lines.
    #[must_use]
    pub fn for_check(first_line: usize, last_line: usize, check: impl Into<String>) -> Self {
        Self {
            first_line,
            last_line,
            check: Some(check.into()),
        }
    }

    /// Returns true if `violation` falls inside this region and names a
    /// matching check (case-insensitive, by name or code).
    #[must_use]
    pub fn suppresses(&self, violation: &Violation) -> bool {
        let line = violation.line();
        if line < self.first_line || line > self.last_line {
            return false;
        }
        self.check.as_deref().map_or(true, |check| {
            check.eq_ignore_ascii_case(&violation.check) || check.eq_ignore_ascii_case(&violation.code)
        })
    }
}

/// Collects the violations of one file from all checks.
#[derive(Debug, Default)]
pub struct ViolationAggregator {
    collected: Vec<(usize, Violation)>,
}

impl ViolationAggregator {
    /// Creates an empty aggregator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds one violation from the check registered at position `order`.
    pub fn push(&mut self, order: usize, violation: Violation) {
        self.collected.push((order, violation));
    }

    /// Adds the violations of the check registered at position `order`.
    pub fn extend(&mut self, order: usize, violations: impl IntoIterator<Item = Violation>) {
        self.collected
            .extend(violations.into_iter().map(|v| (order, v)));
    }

    /// Number of collected violations before filtering.
    #[must_use]
    pub fn len(&self) -> usize {
        self.collected.len()
    }

    /// Returns true when nothing was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.collected.is_empty()
    }

    /// Produces the report order.
    ///
    /// Drops `ignore` severity and suppressed violations, sorts by
    /// `(line, column, registration order)` and keeps only the first of any
    /// violations sharing `(line, column, key)`.
    #[must_use]
    pub fn into_ordered(self, suppressions: &[SuppressionRegion]) -> Vec<Violation> {
        let mut kept: Vec<(usize, Violation)> = self
            .collected
            .into_iter()
            .filter(|(_, v)| v.severity != Severity::Ignore)
            .filter(|(_, v)| !suppressions.iter().any(|s| s.suppresses(v)))
            .collect();

        kept.sort_by_key(|(order, v)| (v.line(), v.column(), *order));
        let mut seen = HashSet::new();
        kept.into_iter()
            .map(|(_, v)| v)
            .filter(|v| seen.insert((v.line(), v.column(), v.key.clone())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;
    use std::path::PathBuf;

    fn violation(check: &str, line: usize, column: usize, key: &str) -> Violation {
        Violation {
            code: format!("{}-code", check.to_uppercase()),
            check: check.to_string(),
            severity: Severity::Error,
            location: Location::new(PathBuf::from("A.java"), line, column),
            key: key.to_string(),
            args: Vec::new(),
            message: key.to_string(),
            token_type: None,
        }
    }

    fn positions(violations: &[Violation]) -> Vec<(usize, usize, &str)> {
        violations
            .iter()
            .map(|v| (v.line(), v.column(), v.check.as_str()))
            .collect()
    }

    #[test]
    fn sorts_by_position_then_registration() {
        let mut agg = ViolationAggregator::new();
        agg.push(1, violation("b", 3, 1, "k"));
        agg.push(0, violation("a", 3, 1, "other"));
        agg.push(1, violation("b", 1, 9, "k"));
        agg.push(0, violation("a", 2, 4, "k"));

        let ordered = agg.into_ordered(&[]);
        assert_eq!(
            positions(&ordered),
            vec![(1, 9, "b"), (2, 4, "a"), (3, 1, "a"), (3, 1, "b")]
        );
    }

    #[test]
    fn dedup_keeps_first_of_same_position_and_key() {
        let mut agg = ViolationAggregator::new();
        agg.push(0, violation("a", 5, 2, "dup"));
        agg.push(0, violation("a", 5, 2, "dup"));
        agg.push(0, violation("a", 5, 2, "distinct"));
        agg.push(0, violation("a", 5, 3, "dup"));
        agg.push(1, violation("b", 5, 2, "dup"));
        assert_eq!(agg.len(), 5);

        let ordered = agg.into_ordered(&[]);
        assert_eq!(
            positions(&ordered),
            vec![(5, 2, "a"), (5, 2, "a"), (5, 3, "a")]
        );
        assert_eq!(ordered[0].key, "dup");
        assert_eq!(ordered[1].key, "distinct");
    }

    #[test]
    fn drops_ignore_severity() {
        let mut agg = ViolationAggregator::new();
        let mut ignored = violation("a", 1, 1, "k");
        ignored.severity = Severity::Ignore;
        agg.push(0, ignored);
        assert!(agg.into_ordered(&[]).is_empty());
    }

    #[test]
    fn suppression_matches_lines_and_check() {
        let region = SuppressionRegion::for_check(8, 12, "Throws-Count");
        assert!(region.suppresses(&violation("throws-count", 10, 1, "k")));
        assert!(!region.suppresses(&violation("throws-count", 13, 1, "k")));
        assert!(!region.suppresses(&violation("type-name", 10, 1, "k")));

        let by_code = SuppressionRegion::for_check(1, 1, "type-name-code");
        assert!(by_code.suppresses(&violation("type-name", 1, 1, "k")));
        assert!(SuppressionRegion::all(1, 2).suppresses(&violation("x", 2, 5, "k")));
    }

    #[test]
    fn suppressed_violations_are_removed() {
        let mut agg = ViolationAggregator::new();
        agg.push(0, violation("throws-count", 10, 1, "k"));
        agg.push(1, violation("type-name", 10, 1, "k2"));
        let ordered = agg.into_ordered(&[SuppressionRegion::for_check(8, 12, "throws-count")]);
        assert_eq!(positions(&ordered), vec![(10, 1, "type-name")]);
    }
}
