//! Comment spans and the per-file comment index.
//!
//! Comments are not tree nodes. Parsers report them as a flat list of
//! [`CommentSpan`]s and the walker builds one [`CommentIndex`] per file, which
//! every check then queries by position.

use crate::contents::FileContents;
use crate::token::TokenType;
use crate::tree::Node;
use serde::Serialize;
use std::collections::BTreeMap;

/// Comment flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentKind {
    /// `// ...` up to the end of the line.
    Line,
    /// `/* ... */`, possibly spanning several lines.
    Block,
}

/// Position and text of one comment.
///
/// Lines are 1-based and columns 0-based in characters; `end_column` is the
/// column of the last character (inclusive).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommentSpan {
    /// Line of the opening delimiter.
    pub start_line: usize,
    /// Column of the opening delimiter.
    pub start_column: usize,
    /// Line of the last character.
    pub end_line: usize,
    /// Column of the last character.
    pub end_column: usize,
    /// Line or block.
    pub kind: CommentKind,
    /// Full text including delimiters.
    pub text: String,
}

impl CommentSpan {
    /// Creates a `//` comment occupying the rest of `line` from `column`.
    #[must_use]
    pub fn line(line: usize, column: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        let len = text.chars().count();
        Self {
            start_line: line,
            start_column: column,
            end_line: line,
            end_column: column + len.saturating_sub(1),
            kind: CommentKind::Line,
            text,
        }
    }

    /// Creates a `/* */` comment; the end position is derived from the text.
    #[must_use]
    pub fn block(line: usize, column: usize, text: impl Into<String>) -> Self {
        let text = text.into();
        let extra_lines = text.matches('\n').count();
        let last = text.rsplit('\n').next().unwrap_or_default();
        let last_len = last.trim_end_matches('\r').chars().count();
        let end_column = if extra_lines == 0 {
            column + last_len.saturating_sub(1)
        } else {
            last_len.saturating_sub(1)
        };
        Self {
            start_line: line,
            start_column: column,
            end_line: line + extra_lines,
            end_column,
            kind: CommentKind::Block,
            text,
        }
    }

    /// Returns true if the comment covers more than one line.
    #[must_use]
    pub fn is_multiline(&self) -> bool {
        self.end_line > self.start_line
    }

    /// Returns true for `/** ... */` documentation comments.
    #[must_use]
    pub fn is_javadoc(&self) -> bool {
        self.kind == CommentKind::Block && self.text.starts_with("/**") && self.text != "/**/"
    }

    /// Comment text without its delimiters.
    #[must_use]
    pub fn content(&self) -> &str {
        match self.kind {
            CommentKind::Line => self.text.strip_prefix("//").unwrap_or(&self.text),
            CommentKind::Block => {
                let inner = self.text.strip_prefix("/*").unwrap_or(&self.text);
                inner.strip_suffix("*/").unwrap_or(inner)
            }
        }
    }

    fn starts_before(&self, line: usize, column: usize) -> bool {
        (self.start_line, self.start_column) < (line, column)
    }

    fn ends_before(&self, line: usize, column: usize) -> bool {
        (self.end_line, self.end_column) < (line, column)
    }
}

/// Position lookups over the comments of one file.
#[derive(Debug)]
pub struct CommentIndex<'a> {
    contents: &'a FileContents,
    comments: Vec<CommentSpan>,
    line_comments: BTreeMap<usize, usize>,
    block_comments: BTreeMap<usize, Vec<usize>>,
    by_end: BTreeMap<(usize, usize), usize>,
    javadocs_by_end: BTreeMap<usize, usize>,
}

impl<'a> CommentIndex<'a> {
    /// Indexes `comments` in one pass. The list need not be sorted.
    #[must_use]
    pub fn new(contents: &'a FileContents, mut comments: Vec<CommentSpan>) -> Self {
        comments.sort_by_key(|c| (c.start_line, c.start_column));
        let mut line_comments = BTreeMap::new();
        let mut block_comments: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        let mut by_end = BTreeMap::new();
        let mut javadocs_by_end = BTreeMap::new();

        for (i, comment) in comments.iter().enumerate() {
            by_end.insert((comment.end_line, comment.end_column), i);
            match comment.kind {
                CommentKind::Line => {
                    line_comments.entry(comment.start_line).or_insert(i);
                }
                CommentKind::Block => {
                    block_comments.entry(comment.start_line).or_default().push(i);
                    if comment.is_javadoc() {
                        javadocs_by_end.insert(comment.end_line, i);
                    }
                }
            }
        }

        Self {
            contents,
            comments,
            line_comments,
            block_comments,
            by_end,
            javadocs_by_end,
        }
    }

    /// An index with no comments.
    #[must_use]
    pub fn empty(contents: &'a FileContents) -> Self {
        Self::new(contents, Vec::new())
    }

    /// All comments in document order.
    pub fn iter(&self) -> impl Iterator<Item = &CommentSpan> {
        self.comments.iter()
    }

    /// Number of comments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.comments.len()
    }

    /// Returns true when the file has no comments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.comments.is_empty()
    }

    /// The `//` comment starting on `line`, if any.
    #[must_use]
    pub fn line_comment_on(&self, line: usize) -> Option<&CommentSpan> {
        self.line_comments.get(&line).map(|&i| &self.comments[i])
    }

    /// Block comments starting on `line`, left to right.
    pub fn block_comments_on(&self, line: usize) -> impl Iterator<Item = &CommentSpan> {
        self.block_comments
            .get(&line)
            .into_iter()
            .flatten()
            .map(|&i| &self.comments[i])
    }

    /// The comment trailing code on `line` at or after `after_column`.
    ///
    /// A `//` comment always qualifies. Otherwise the last block comment
    /// starting on the line qualifies when it spans several lines, or when
    /// nothing but whitespace and `;` follows it on the line.
    #[must_use]
    pub fn trailing_comment(&self, line: usize, after_column: usize) -> Option<&CommentSpan> {
        if let Some(comment) = self.line_comment_on(line) {
            if comment.start_column >= after_column {
                return Some(comment);
            }
        }
        let comment = self
            .block_comments_on(line)
            .filter(|c| c.start_column >= after_column)
            .last()?;
        (comment.is_multiline() || self.rest_is_blank(comment)).then_some(comment)
    }

    /// The comment trailing `node`.
    ///
    /// For the content of a text block the lookup happens on the line of the
    /// closing delimiter, never inside the block itself.
    #[must_use]
    pub fn trailing_comment_after(&self, node: Node<'_>) -> Option<&CommentSpan> {
        let anchor = if node.token_type() == TokenType::TextBlockContent {
            node.next_sibling().unwrap_or(node)
        } else {
            node
        };
        self.trailing_comment(anchor.end_line(), anchor.end_column())
    }

    /// The nearest comment ending before the position with only whitespace
    /// in between.
    #[must_use]
    pub fn leading_comment(&self, line: usize, column: usize) -> Option<&CommentSpan> {
        let (_, &i) = self.by_end.range(..(line, column)).next_back()?;
        let comment = &self.comments[i];
        self.gap_is_blank(comment, line, column).then_some(comment)
    }

    /// Returns true if any comment overlaps the inclusive range.
    #[must_use]
    pub fn has_intersection(
        &self,
        start_line: usize,
        start_column: usize,
        end_line: usize,
        end_column: usize,
    ) -> bool {
        self.comments.iter().any(|c| {
            !c.ends_before(start_line, start_column)
                && c.starts_before(end_line, end_column + 1)
        })
    }

    /// The Javadoc comment attached to a declaration on `line`: the one ending
    /// on the nearest preceding line that is neither blank nor a `//` comment.
    #[must_use]
    pub fn javadoc_before(&self, line: usize) -> Option<&CommentSpan> {
        let mut candidate = line.checked_sub(1)?;
        while candidate > 0
            && (self.contents.line_is_blank(candidate) || self.contents.line_is_comment(candidate))
        {
            candidate -= 1;
        }
        self.javadocs_by_end
            .get(&candidate)
            .map(|&i| &self.comments[i])
    }

    fn rest_is_blank(&self, comment: &CommentSpan) -> bool {
        self.contents.line(comment.end_line).map_or(true, |text| {
            text.chars()
                .skip(comment.end_column + 1)
                .all(|c| c.is_whitespace() || c == ';')
        })
    }

    fn gap_is_blank(&self, comment: &CommentSpan, line: usize, column: usize) -> bool {
        let blank = |s: &str| s.chars().all(char::is_whitespace);
        let line_text = |l: usize| self.contents.line(l).unwrap_or_default();

        if comment.end_line == line {
            let between: String = line_text(line)
                .chars()
                .skip(comment.end_column + 1)
                .take(column.saturating_sub(comment.end_column + 1))
                .collect();
            return blank(&between);
        }
        let tail: String = line_text(comment.end_line)
            .chars()
            .skip(comment.end_column + 1)
            .collect();
        let head: String = line_text(line).chars().take(column).collect();
        blank(&tail)
            && blank(&head)
            && (comment.end_line + 1..line).all(|l| self.contents.line_is_blank(l))
    }
}
