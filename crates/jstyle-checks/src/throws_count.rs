//! Check limiting the number of exceptions in a `throws` clause.
//!
//! # Rationale
//!
//! A long `throws` list pushes error handling onto every caller. Wrapping
//! related failures into a common exception keeps signatures readable.
//!
//! # Configuration
//!
//! - `max`: Maximum number of declared exceptions (default: 1)
//! - `ignore_private_methods`: Skip private methods (default: true)
//!
//! Methods annotated with `@Override` are skipped; their clause follows the
//! overridden declaration.

use jstyle_core::utils::{has_annotation, Modifiers};
use jstyle_core::{
    args, Check, CheckBox, CheckContext, CheckError, CheckOptions, Node, OptionError, TokenType,
};

/// Check code for throws-count.
pub const CODE: &str = "JS001";

/// Check name for throws-count.
pub const NAME: &str = "throws-count";

/// Message key.
pub const MSG_KEY: &str = "throws.count";

/// Limits the number of exceptions declared by a method.
#[derive(Debug, Clone)]
pub struct ThrowsCount {
    /// Maximum number of declared exceptions.
    pub max: usize,
    /// Skip private methods.
    pub ignore_private_methods: bool,
}

impl Default for ThrowsCount {
    fn default() -> Self {
        Self::new()
    }
}

impl ThrowsCount {
    /// Creates a new check with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max: 1,
            ignore_private_methods: true,
        }
    }

    /// Sets the maximum number of declared exceptions.
    #[must_use]
    pub fn max(mut self, max: usize) -> Self {
        self.max = max;
        self
    }

    /// Sets whether private methods are skipped.
    #[must_use]
    pub fn ignore_private_methods(mut self, ignore: bool) -> Self {
        self.ignore_private_methods = ignore;
        self
    }

    /// Builds the check from configured options.
    ///
    /// # Errors
    ///
    /// Fails on malformed option values.
    pub fn create(options: &mut CheckOptions) -> Result<CheckBox, OptionError> {
        Ok(Box::new(
            Self::new()
                .max(options.usize("max", 1)?)
                .ignore_private_methods(options.bool("ignore_private_methods", true)?),
        ))
    }

    fn is_skipped(&self, method: Node<'_>) -> bool {
        has_annotation(method, "Override")
            || (self.ignore_private_methods && Modifiers::of(method).is_private())
    }
}

impl Check for ThrowsCount {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Limits the number of exceptions declared in a throws clause"
    }

    fn default_tokens(&self) -> &'static [TokenType] {
        &[TokenType::LiteralThrows]
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[(MSG_KEY, "Throws count is {0} (max allowed is {1}).")]
    }

    fn reset_for_file(&mut self) {}

    fn visit_token(&mut self, node: Node<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        let method = node.parent().ok_or_else(|| CheckError::unexpected(node))?;
        if self.is_skipped(method) {
            return Ok(());
        }
        // exception types alternate with commas
        let count = (node.child_count() + 1) / 2;
        if count > self.max {
            ctx.log(node, MSG_KEY, args![count, self.max]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{run, run_with};
    use jstyle_core::{CheckSettings, MessageArg};

    const SOURCE: &str = "\
class A {
    void one() throws X {}
    void three() throws X, Y, Z {}
    private void hidden() throws X, Y {}
    @Override
    public void inherited() throws X, Y {}
}
";

    #[test]
    fn reports_clauses_over_the_limit() {
        let violations = run(NAME, SOURCE);
        assert_eq!(violations.len(), 1);
        let v = &violations[0];
        assert_eq!((v.line(), v.column()), (3, 18));
        assert_eq!(v.args, vec![MessageArg::Int(3), MessageArg::Int(1)]);
        assert_eq!(v.message, "Throws count is 3 (max allowed is 1).");
    }

    #[test]
    fn private_methods_checked_when_configured() {
        let settings = CheckSettings::named(NAME)
            .option("max", "1")
            .option("ignore_private_methods", "false");
        let lines: Vec<_> = run_with(settings, SOURCE).iter().map(|v| v.line()).collect();
        assert_eq!(lines, vec![3, 4]);
    }

    #[test]
    fn higher_max_allows_more() {
        let settings = CheckSettings::named(NAME).option("max", "3");
        assert!(run_with(settings, SOURCE).is_empty());
    }
}
