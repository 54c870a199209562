//! The check contract.

use crate::context::CheckContext;
use crate::token::TokenType;
use crate::tree::Node;
use crate::types::Severity;

/// A pluggable unit of style analysis driven by the [`TreeWalker`](crate::TreeWalker).
///
/// A check declares the token types it is interested in and receives
/// `visit_token` / `leave_token` callbacks for every node of those types,
/// bracketed by `begin_tree` and `finish_tree` once per file. Any state kept
/// between callbacks belongs to the file being walked and must be cleared in
/// [`reset_for_file`](Self::reset_for_file), which the walker calls before
/// every file, including after a previous file failed half way.
///
/// # Example
///
/// ```ignore
/// use jstyle_core::{args, Check, CheckContext, CheckError, Node, TokenType};
///
/// pub struct NoEmptyStatement;
///
/// impl Check for NoEmptyStatement {
///     fn name(&self) -> &'static str { "no-empty-statement" }
///     fn code(&self) -> &'static str { "X001" }
///     fn default_tokens(&self) -> &'static [TokenType] { &[TokenType::EmptyStat] }
///     fn messages(&self) -> &'static [(&'static str, &'static str)] {
///         &[("empty.statement", "Empty statement.")]
///     }
///     fn reset_for_file(&mut self) {}
///
///     fn visit_token(&mut self, node: Node<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
///         ctx.log(node, "empty.statement", args![]);
///         Ok(())
///     }
/// }
/// ```
#[allow(unused_variables)]
pub trait Check: Send {
    /// Returns the kebab-case name of this check (e.g., "throws-count").
    fn name(&self) -> &'static str;

    /// Returns the check code (e.g., "JS001").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this check enforces.
    fn description(&self) -> &'static str {
        ""
    }

    /// Severity used when the configuration does not set one.
    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    /// Token types visited when the configuration does not list `tokens`.
    fn default_tokens(&self) -> &'static [TokenType];

    /// Token types a configuration may select.
    fn acceptable_tokens(&self) -> &'static [TokenType] {
        self.default_tokens()
    }

    /// Token types visited regardless of configuration.
    fn required_tokens(&self) -> &'static [TokenType] {
        &[]
    }

    /// Message templates by key. Templates use `{0}`, `{1}`, ... placeholders.
    fn messages(&self) -> &'static [(&'static str, &'static str)];

    /// Clears all per-file state.
    fn reset_for_file(&mut self);

    /// Called once per file before any node is visited.
    ///
    /// # Errors
    ///
    /// A returned error aborts the file.
    fn begin_tree(&mut self, root: Node<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        Ok(())
    }

    /// Called when entering a node of a registered type.
    ///
    /// # Errors
    ///
    /// A returned error aborts the file.
    fn visit_token(&mut self, node: Node<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        Ok(())
    }

    /// Called after all descendants of a registered node were visited.
    ///
    /// # Errors
    ///
    /// A returned error aborts the file.
    fn leave_token(&mut self, node: Node<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        Ok(())
    }

    /// Called once per file after the traversal.
    ///
    /// # Errors
    ///
    /// A returned error aborts the file.
    fn finish_tree(&mut self, root: Node<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        Ok(())
    }
}

/// Type alias for boxed Check trait objects.
pub type CheckBox = Box<dyn Check>;

/// An internal failure of a check. Aborts the current file only.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct CheckError {
    /// What went wrong.
    pub message: String,
}

impl CheckError {
    /// Creates a new check error.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Error for a tree whose shape the check cannot handle.
    #[must_use]
    pub fn unexpected(node: Node<'_>) -> Self {
        Self::new(format!("unexpected {} node", node.token_type()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestCheck;

    impl Check for TestCheck {
        fn name(&self) -> &'static str {
            "test-check"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn default_tokens(&self) -> &'static [TokenType] {
            &[TokenType::ClassDef]
        }
        fn messages(&self) -> &'static [(&'static str, &'static str)] {
            &[("test", "Test violation.")]
        }
        fn reset_for_file(&mut self) {}
    }

    #[test]
    fn test_check_defaults() {
        let check = TestCheck;
        assert_eq!(check.name(), "test-check");
        assert_eq!(check.default_severity(), Severity::Error);
        assert_eq!(check.acceptable_tokens(), &[TokenType::ClassDef]);
        assert!(check.required_tokens().is_empty());
        assert_eq!(check.description(), "");
    }
}
