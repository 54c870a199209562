//! # jstyle-java
//!
//! Tree-sitter based Java front end for jstyle.
//!
//! [`JavaParser`] implements [`jstyle_core::SourceParser`]: it parses a file
//! with `tree-sitter-java`, rejects sources containing syntax errors, and
//! converts the concrete syntax tree into a [`jstyle_core::Tree`] using the
//! checkstyle token vocabulary. Comments are reported separately so checks
//! can correlate them with tokens.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod comments;
mod convert;
mod parser;

pub use parser::JavaParser;
