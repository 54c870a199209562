//! The interface between the engine and language front ends.

use crate::comments::CommentSpan;
use crate::contents::FileContents;
use crate::token::TokenType;
use crate::tree::{Tree, TreeError};

/// Output of a successful parse.
#[derive(Debug)]
pub struct ParsedFile {
    /// Token tree rooted at `COMPILATION_UNIT`.
    pub tree: Tree,
    /// All comments of the file, in any order.
    pub comments: Vec<CommentSpan>,
}

/// A file the parser could not turn into a tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The source is not syntactically valid.
    #[error("syntax error at {line}:{column}: {message}")]
    Syntax {
        /// 1-based line of the first error.
        line: usize,
        /// 0-based column of the first error.
        column: usize,
        /// Description of the problem.
        message: String,
    },

    /// The front end produced a malformed tree.
    #[error("malformed token tree: {0}")]
    Tree(#[from] TreeError),

    /// The front end could not be initialised.
    #[error("parser setup failed: {0}")]
    Setup(String),
}

/// A language front end producing token trees.
///
/// Implementations must be usable from several threads at once; any mutable
/// parser state is created per call to [`parse`](Self::parse).
pub trait SourceParser: Send + Sync {
    /// Language name (e.g., "java").
    fn language(&self) -> &'static str;

    /// File extensions handled, without the dot.
    fn extensions(&self) -> &'static [&'static str];

    /// Every token type this parser can emit. Configured token sets must stay
    /// inside it.
    fn token_universe(&self) -> &'static [TokenType];

    /// Parses one file.
    ///
    /// # Errors
    ///
    /// Returns a [`ParseError`] for invalid input.
    fn parse(&self, contents: &FileContents) -> Result<ParsedFile, ParseError>;

    /// Returns true if this parser handles the path's extension.
    fn handles(&self, path: &std::path::Path) -> bool {
        path.extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| self.extensions().contains(&ext))
    }
}
