//! # jstyle-core
//!
//! Core framework for style checking over token trees.
//!
//! This crate provides the language-neutral engine:
//!
//! - [`Tree`] and [`Node`], an arena-backed token tree with parent and
//!   sibling navigation
//! - [`Check`], the contract every style check implements
//! - [`TreeWalker`], which drives configured checks over one tree
//! - [`CommentIndex`] for correlating comments with tokens
//! - [`ViolationAggregator`] for ordering, deduplicating and suppressing
//!   findings
//! - [`Analyzer`] for running a validated check set across files in parallel
//!
//! ## Example
//!
//! ```ignore
//! use jstyle_core::{Analyzer, CheckSettings, Severity};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .parser(JavaParser::new())
//!     .registry(builtin_registry())
//!     .checks(vec![CheckSettings::named("throws-count").option("max", "2")])
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! print!("{}", result.format_test_report(Severity::Error));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod aggregator;
mod analyzer;
mod check;
mod comments;
mod config;
mod contents;
mod context;
mod message;
mod options;
mod parser;
mod registry;
mod suppressions;
mod token;
mod tree;
mod types;
mod walker;

/// Helpers shared by check implementations.
pub mod utils;

pub use aggregator::{SuppressionRegion, ViolationAggregator};
pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use check::{Check, CheckBox, CheckError};
pub use comments::{CommentIndex, CommentKind, CommentSpan};
pub use config::{
    AnalyzerConfig, CheckConfig, Config, ConfigError, SuppressionCommentConfig,
    SuppressionConfig,
};
pub use contents::{expanded_width, FileContents, DEFAULT_TAB_WIDTH};
pub use context::CheckContext;
pub use message::{render, MessageArg};
pub use options::{CheckOptions, OptionError};
pub use parser::{ParseError, ParsedFile, SourceParser};
pub use registry::{CheckDescriptor, CheckFactory, CheckPlan, CheckRegistry, CheckSettings};
pub use suppressions::{parse_line_ranges, SuppressionFilter};
pub use token::{parse_token_list, TokenType, UnknownTokenType};
pub use tree::{Children, Node, NodeId, Span, Tree, TreeBuilder, TreeError};
pub use types::{
    FileError, FileFailure, FileReport, LintResult, Location, Severity, Violation,
    ViolationDiagnostic,
};
pub use walker::{ConfiguredCheck, TreeWalker};
