//! Check that nested types come after the other members of a type.
//!
//! # Rationale
//!
//! Readers expect a type's own state and behavior first. Fields, methods,
//! constructors and initializers declared after a nested type are easy to
//! miss.

use jstyle_core::utils::scope::in_code_block;
use jstyle_core::{
    args, Check, CheckBox, CheckContext, CheckError, CheckOptions, Node, OptionError, TokenType,
};

/// Check code for inner-type-last.
pub const CODE: &str = "JS005";

/// Check name for inner-type-last.
pub const NAME: &str = "inner-type-last";

/// Message key.
pub const MSG_KEY: &str = "arrangement.members.before.inner";

/// Member kinds that must precede nested types.
const MEMBERS: &[TokenType] = &[
    TokenType::VariableDef,
    TokenType::MethodDef,
    TokenType::CtorDef,
    TokenType::CompactCtorDef,
    TokenType::StaticInit,
    TokenType::InstanceInit,
];

/// Reports members declared after a nested type.
#[derive(Debug, Clone, Default)]
pub struct InnerTypeLast;

impl InnerTypeLast {
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

impl Check for InnerTypeLast {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires nested types to be declared after fields, methods and constructors"
    }

    fn default_tokens(&self) -> &'static [TokenType] {
        &[
            TokenType::ClassDef,
            TokenType::InterfaceDef,
            TokenType::RecordDef,
        ]
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[(MSG_KEY, "Fields and methods should be before inner classes.")]
    }

    fn reset_for_file(&mut self) {}

    fn visit_token(&mut self, node: Node<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        let top_level = node
            .parent()
            .map_or(true, |p| p.token_type() == TokenType::CompilationUnit);
        if top_level || in_code_block(node) {
            return Ok(());
        }
        let mut sibling = node.next_sibling();
        while let Some(member) = sibling {
            if MEMBERS.contains(&member.token_type()) {
                ctx.log(member, MSG_KEY, args![]);
            }
            sibling = member.next_sibling();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::run;

    fn positions(source: &str) -> Vec<(usize, usize)> {
        run(NAME, source)
            .iter()
            .map(|v| (v.line(), v.column()))
            .collect()
    }

    #[test]
    fn members_after_nested_type() {
        let source = "\
class Outer {
    int before;
    class Inner {}
    int after;
    Outer() {}
    void m() {}
    static {}
}
";
        assert_eq!(positions(source), vec![(4, 5), (5, 5), (6, 5), (7, 5)]);
    }

    #[test]
    fn repeated_nested_types_report_once() {
        let source = "\
class Outer {
    interface First {}
    record Second(int x) {}
    void m() {}
}
";
        let violations = run(NAME, source);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line(), 4);
        assert_eq!(
            violations[0].message,
            "Fields and methods should be before inner classes."
        );
    }

    #[test]
    fn ordered_members_and_local_classes_pass() {
        let source = "\
class Outer {
    int field;
    void m() {
        class Local {}
        int x = 0;
    }
    class Inner {}
    enum Kind { A }
}
class Second {}
";
        assert!(positions(source).is_empty());
    }
}
