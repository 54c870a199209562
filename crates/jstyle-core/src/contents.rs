//! Raw, line-indexed view of a source file.

use std::ops::Range;
use std::path::{Path, PathBuf};

/// Default tab width used for column reporting.
pub const DEFAULT_TAB_WIDTH: usize = 8;

/// The text of one file split into lines.
///
/// Lines are numbered from 1 and end at `\n`, the same breaks the parser
/// counts rows by. A `\r` before the `\n` is not part of the line text; a lone
/// `\r` does not end a line.
#[derive(Debug, Clone)]
pub struct FileContents {
    path: PathBuf,
    text: String,
    lines: Vec<Range<usize>>,
}

impl FileContents {
    /// Splits `text` into lines.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = split_lines(&text);
        Self {
            path: path.into(),
            text,
            lines,
        }
    }

    /// Path the contents were read from.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Entire file text.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Text of the 1-based line `line`.
    #[must_use]
    pub fn line(&self, line: usize) -> Option<&str> {
        let range = self.lines.get(line.checked_sub(1)?)?;
        Some(&self.text[range.clone()])
    }

    /// All lines in order.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|r| &self.text[r.clone()])
    }

    /// Returns true if the line is empty or whitespace only.
    /// Lines outside the file count as blank.
    #[must_use]
    pub fn line_is_blank(&self, line: usize) -> bool {
        self.line(line).map_or(true, |l| l.trim().is_empty())
    }

    /// Returns true if the line holds nothing but a `//` comment.
    #[must_use]
    pub fn line_is_comment(&self, line: usize) -> bool {
        self.line(line)
            .is_some_and(|l| l.trim_start().starts_with("//"))
    }

    /// Byte offset in [`text`](Self::text) of a 1-based line and 0-based
    /// character column. Out-of-range positions clamp to the line or file end.
    #[must_use]
    pub fn offset_of(&self, line: usize, column: usize) -> usize {
        let Some(range) = line.checked_sub(1).and_then(|i| self.lines.get(i)) else {
            return self.text.len();
        };
        let line_text = &self.text[range.clone()];
        let within = line_text
            .char_indices()
            .nth(column)
            .map_or(line_text.len(), |(i, _)| i);
        range.start + within
    }

    /// 1-based reporting column for a 0-based character column, with tabs
    /// expanded to `tab_width` stops.
    #[must_use]
    pub fn reporting_column(&self, line: usize, column: usize, tab_width: usize) -> usize {
        self.line(line)
            .map_or(column, |text| expanded_width(text, column, tab_width))
            + 1
    }
}

/// Display width of the first `chars` characters of `line` when tabs advance
/// to the next multiple of `tab_width`.
#[must_use]
pub fn expanded_width(line: &str, chars: usize, tab_width: usize) -> usize {
    let mut width = 0;
    for c in line.chars().take(chars) {
        if c == '\t' && tab_width > 0 {
            width += tab_width - width % tab_width;
        } else {
            width += 1;
        }
    }
    // Columns past the end of the line still advance one per character.
    width + chars.saturating_sub(line.chars().count())
}

fn split_lines(text: &str) -> Vec<Range<usize>> {
    let bytes = text.as_bytes();
    let mut lines = Vec::new();
    let mut start = 0;
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'\n' {
            let end = if i > start && bytes[i - 1] == b'\r' { i - 1 } else { i };
            lines.push(start..end);
            start = i + 1;
        }
    }
    if start < bytes.len() {
        lines.push(start..bytes.len());
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_newlines_and_drops_carriage_returns() {
        let contents = FileContents::new("A.java", "a\r\nb\nc\r\nd");
        let lines: Vec<_> = contents.lines().collect();
        assert_eq!(lines, vec!["a", "b", "c", "d"]);
        assert_eq!(contents.line(2), Some("b"));
        assert_eq!(contents.line(0), None);
        assert_eq!(contents.line(5), None);
    }

    #[test]
    fn lone_carriage_return_stays_on_its_line() {
        let contents = FileContents::new("A.java", "int a;\rint b;\nint c;");
        assert_eq!(contents.line_count(), 2);
        assert_eq!(contents.line(1), Some("int a;\rint b;"));
        assert_eq!(contents.line(2), Some("int c;"));
        assert_eq!(contents.offset_of(2, 0), "int a;\rint b;\n".len());
    }

    #[test]
    fn trailing_newline_adds_no_line() {
        let contents = FileContents::new("A.java", "class A {}\n");
        assert_eq!(contents.line_count(), 1);
        assert_eq!(FileContents::new("A.java", "").line_count(), 0);
    }

    #[test]
    fn blank_and_comment_lines() {
        let contents = FileContents::new("A.java", "  \n  // note\nint x;");
        assert!(contents.line_is_blank(1));
        assert!(contents.line_is_comment(2));
        assert!(!contents.line_is_comment(3));
        assert!(contents.line_is_blank(10));
    }

    #[test]
    fn expands_tabs_to_stops() {
        assert_eq!(expanded_width("\tx", 1, 8), 8);
        assert_eq!(expanded_width("ab\tx", 3, 4), 4);
        assert_eq!(expanded_width("abc", 2, 8), 2);

        let contents = FileContents::new("A.java", "\tint x;");
        assert_eq!(contents.reporting_column(1, 1, 8), 9);
        assert_eq!(contents.reporting_column(1, 0, 8), 1);
    }

    #[test]
    fn offsets_count_characters() {
        let contents = FileContents::new("A.java", "é = 1;\nx");
        assert_eq!(contents.offset_of(1, 1), 2);
        assert_eq!(contents.offset_of(2, 0), "é = 1;\n".len());
        assert_eq!(contents.offset_of(9, 0), contents.text().len());
    }
}
