//! Comment-based suppression markers.
//!
//! Supports regions like:
//! ```text
//! // jstyle:off throws-count, type-name
//! ...
//! // jstyle:on throws-count, type-name
//! ```
//! A marker without names switches every check. A region left open runs to
//! the end of the file.

use crate::aggregator::SuppressionRegion;
use crate::comments::CommentIndex;
use std::collections::{BTreeMap, HashSet};

/// Direction of a marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Suppression starts.
    Off,
    /// Suppression ends.
    On,
}

/// Parsed suppression marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerDirective {
    /// Whether the marker opens or closes a region.
    pub kind: MarkerKind,
    /// Check names; empty means all checks.
    pub checks: HashSet<String>,
}

/// Marker texts recognised inside comments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentMarkers {
    off: String,
    on: String,
}

impl Default for CommentMarkers {
    fn default() -> Self {
        Self::new("jstyle:off", "jstyle:on")
    }
}

impl CommentMarkers {
    /// Creates markers with custom texts.
    #[must_use]
    pub fn new(off: impl Into<String>, on: impl Into<String>) -> Self {
        Self {
            off: off.into(),
            on: on.into(),
        }
    }

    /// Parses a marker from the content of a comment.
    #[must_use]
    pub fn parse(&self, comment_content: &str) -> Option<MarkerDirective> {
        let content = comment_content.trim().trim_start_matches('*').trim();

        let (kind, rest) = if let Some(rest) = content.strip_prefix(self.off.as_str()) {
            (MarkerKind::Off, rest)
        } else if let Some(rest) = content.strip_prefix(self.on.as_str()) {
            (MarkerKind::On, rest)
        } else {
            return None;
        };

        // "jstyle:offset" is not a marker.
        if rest.chars().next().is_some_and(|c| !c.is_whitespace()) {
            return None;
        }

        let checks = rest
            .split(',')
            .map(|s| s.trim().to_ascii_lowercase())
            .filter(|s| !s.is_empty())
            .collect();

        Some(MarkerDirective { kind, checks })
    }

    /// Turns the markers found in `comments` into suppression regions.
    #[must_use]
    pub fn regions(&self, comments: &CommentIndex<'_>, last_line: usize) -> Vec<SuppressionRegion> {
        let mut open: BTreeMap<Option<String>, usize> = BTreeMap::new();
        let mut regions = Vec::new();

        for comment in comments.iter() {
            let Some(directive) = self.parse(comment.content()) else {
                continue;
            };
            let line = comment.start_line;
            let keys: Vec<Option<String>> = if directive.checks.is_empty() {
                vec![None]
            } else {
                let mut names: Vec<_> = directive.checks.into_iter().collect();
                names.sort();
                names.into_iter().map(Some).collect()
            };

            match directive.kind {
                MarkerKind::Off => {
                    for key in keys {
                        open.entry(key).or_insert(line);
                    }
                }
                MarkerKind::On if keys == [None] => {
                    for (check, start) in std::mem::take(&mut open) {
                        regions.push(region(start, line, check));
                    }
                }
                MarkerKind::On => {
                    for key in keys {
                        if let Some(start) = open.remove(&key) {
                            regions.push(region(start, line, key));
                        }
                    }
                }
            }
        }

        for (check, start) in open {
            regions.push(region(start, last_line.max(start), check));
        }
        regions
    }
}

fn region(first_line: usize, last_line: usize, check: Option<String>) -> SuppressionRegion {
    SuppressionRegion {
        first_line,
        last_line,
        check,
    }
}
