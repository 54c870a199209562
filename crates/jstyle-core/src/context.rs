//! Context handed to checks during a walk.

use crate::comments::CommentIndex;
use crate::contents::FileContents;
use crate::message::{render, MessageArg};
use crate::tree::Node;
use crate::types::{Location, Severity, Violation};
use std::path::Path;

/// Identity of the check a context logs for.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Reporter<'a> {
    pub name: &'a str,
    pub code: &'a str,
    pub severity: Severity,
    pub messages: &'static [(&'static str, &'static str)],
}

/// Read access to the file being walked and a private violation buffer.
///
/// Every check gets its own buffer: violations logged here are invisible to
/// other checks.
pub struct CheckContext<'a> {
    contents: &'a FileContents,
    comments: &'a CommentIndex<'a>,
    tab_width: usize,
    reporter: Reporter<'a>,
    sink: &'a mut Vec<Violation>,
}

impl<'a> CheckContext<'a> {
    pub(crate) fn new(
        contents: &'a FileContents,
        comments: &'a CommentIndex<'a>,
        tab_width: usize,
        reporter: Reporter<'a>,
        sink: &'a mut Vec<Violation>,
    ) -> Self {
        Self {
            contents,
            comments,
            tab_width,
            reporter,
            sink,
        }
    }

    /// Raw file contents.
    #[must_use]
    pub fn contents(&self) -> &'a FileContents {
        self.contents
    }

    /// Path of the file.
    #[must_use]
    pub fn path(&self) -> &'a Path {
        self.contents.path()
    }

    /// Text of a 1-based line, empty when out of range.
    #[must_use]
    pub fn line(&self, line: usize) -> &'a str {
        self.contents.line(line).unwrap_or_default()
    }

    /// Tab width used for column reporting.
    #[must_use]
    pub fn tab_width(&self) -> usize {
        self.tab_width
    }

    /// Comment index of the file.
    #[must_use]
    pub fn comments(&self) -> &'a CommentIndex<'a> {
        self.comments
    }

    /// Logs a violation at the start of `node`.
    pub fn log(&mut self, node: Node<'_>, key: &str, args: Vec<MessageArg>) {
        let length = if node.end_line() == node.line() {
            self.contents.offset_of(node.end_line(), node.end_column())
                .saturating_sub(self.contents.offset_of(node.line(), node.column()))
        } else {
            0
        };
        let mut violation = self.violation(node.line(), node.column(), length, key, args);
        violation.token_type = Some(node.token_type());
        self.sink.push(violation);
    }

    /// Logs a violation at a 1-based line and 0-based character column.
    pub fn log_at(&mut self, line: usize, column: usize, key: &str, args: Vec<MessageArg>) {
        let violation = self.violation(line, column, 0, key, args);
        self.sink.push(violation);
    }

    fn violation(
        &self,
        line: usize,
        column: usize,
        length: usize,
        key: &str,
        args: Vec<MessageArg>,
    ) -> Violation {
        let template = self
            .reporter
            .messages
            .iter()
            .find(|(k, _)| *k == key)
            .map_or(key, |(_, t)| *t);
        let location = Location::new(
            self.contents.path().to_path_buf(),
            line,
            self.contents.reporting_column(line, column, self.tab_width),
        )
        .with_span(self.contents.offset_of(line, column), length);

        Violation {
            code: self.reporter.code.to_string(),
            check: self.reporter.name.to_string(),
            severity: self.reporter.severity,
            location,
            key: key.to_string(),
            message: render(template, &args),
            args,
            token_type: None,
        }
    }
}
