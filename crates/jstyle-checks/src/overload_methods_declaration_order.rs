//! Check that overloaded methods are declared next to each other.
//!
//! # Rationale
//!
//! Overloads are variations of one operation. Splitting them across a type
//! body hides the full set from a reader looking at any one of them.
//!
//! A body is checked once all of its members have been visited.

use jstyle_core::{
    args, Check, CheckBox, CheckContext, CheckError, CheckOptions, Node, OptionError, TokenType,
};
use std::collections::HashMap;

/// Check code for overload-methods-declaration-order.
pub const CODE: &str = "JS011";

/// Check name for overload-methods-declaration-order.
pub const NAME: &str = "overload-methods-declaration-order";

/// Message key.
pub const MSG_KEY: &str = "overload.methods.declaration";

/// Reports overloads separated by other members.
#[derive(Debug, Clone, Default)]
pub struct OverloadMethodsDeclarationOrder;

impl OverloadMethodsDeclarationOrder {
    /// Creates a new check.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Builds the check; it takes no options.
    ///
    /// # Errors
    ///
    /// Never fails.
    pub fn create(_options: &mut CheckOptions) -> Result<CheckBox, OptionError> {
        Ok(Box::new(Self::new()))
    }
}

impl Check for OverloadMethodsDeclarationOrder {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires overloaded methods to be declared next to each other"
    }

    fn default_tokens(&self) -> &'static [TokenType] {
        &[TokenType::ObjBlock]
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[(
            MSG_KEY,
            "All overloaded methods should be placed next to each other. \
             Previous overloaded method located at line '{0}'.",
        )]
    }

    fn reset_for_file(&mut self) {}

    fn leave_token(&mut self, node: Node<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        // name -> (member index, line) of the latest overload seen
        let mut seen: HashMap<&str, (usize, usize)> = HashMap::new();
        for (index, member) in node.children().enumerate() {
            if member.token_type() != TokenType::MethodDef {
                continue;
            }
            let name = member
                .find_first_token(TokenType::Ident)
                .ok_or_else(|| CheckError::unexpected(member))?
                .text();
            if let Some(&(previous_index, previous_line)) = seen.get(name) {
                if index - previous_index > 1 {
                    ctx.log(member, MSG_KEY, args![previous_line]);
                }
            }
            seen.insert(name, (index, member.line()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::run;
    use jstyle_core::MessageArg;

    #[test]
    fn separated_overloads_reported() {
        let source = "\
class A {
    void foo(int i) {}
    void foo(String s) {}
    void bar() {}
    void foo(long l) {}
    int field;
    void foo(double d) {}
}
";
        let violations = run(NAME, source);
        let found: Vec<_> = violations
            .iter()
            .map(|v| (v.line(), v.args.clone()))
            .collect();
        assert_eq!(
            found,
            vec![
                (5, vec![MessageArg::Int(3)]),
                (7, vec![MessageArg::Int(5)]),
            ]
        );
        assert_eq!(
            violations[0].message,
            "All overloaded methods should be placed next to each other. \
             Previous overloaded method located at line '3'."
        );
    }

    #[test]
    fn adjacent_overloads_and_nested_bodies_pass() {
        let source = "\
class A {
    void foo() {}
    void foo(int i) {}
    class B {
        void foo() {}
    }
    void bar() {}
}
";
        assert!(run(NAME, source).is_empty());
    }
}
