//! Check reporting comments that match a to-do marker.
//!
//! # Configuration
//!
//! - `format`: Pattern searched for in comment text (default: `TODO:`)
//!
//! Works on the comment index alone and visits no tokens.

use jstyle_core::utils::PatternMatcher;
use jstyle_core::{
    args, Check, CheckBox, CheckContext, CheckError, CheckOptions, Node, OptionError, Severity,
    TokenType,
};

/// Check code for todo-comment.
pub const CODE: &str = "JS012";

/// Check name for todo-comment.
pub const NAME: &str = "todo-comment";

/// Message key.
pub const MSG_KEY: &str = "todo.match";

/// Reports to-do comments.
#[derive(Debug, Clone)]
pub struct TodoComment {
    /// Pattern searched for in comment text.
    pub format: PatternMatcher,
}

impl TodoComment {
    /// Builds the check from configured options.
    ///
    /// # Errors
    ///
    /// Fails when `format` does not compile.
    pub fn create(options: &mut CheckOptions) -> Result<CheckBox, OptionError> {
        Ok(Box::new(Self {
            format: PatternMatcher::from_options(options, "format", "TODO:")?,
        }))
    }
}

impl Check for TodoComment {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Reports comments matching a to-do pattern"
    }

    fn default_severity(&self) -> Severity {
        Severity::Info
    }

    fn default_tokens(&self) -> &'static [TokenType] {
        &[]
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[(MSG_KEY, "Comment matches to-do format '{0}'.")]
    }

    fn reset_for_file(&mut self) {}

    fn begin_tree(&mut self, _root: Node<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        let matching: Vec<(usize, usize)> = ctx
            .comments()
            .iter()
            .filter(|comment| comment.content().lines().any(|l| self.format.matches(l)))
            .map(|comment| (comment.start_line, comment.start_column))
            .collect();
        for (line, column) in matching {
            ctx.log_at(line, column, MSG_KEY, args![self.format.as_str()]);
        }
        Ok(())
    }
}
