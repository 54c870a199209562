//! Check that method names follow a naming pattern.
//!
//! # Configuration
//!
//! - `format`: Pattern method names must match (default: `^[a-z][a-zA-Z0-9]*$`)
//! - `allow_class_name`: Allow a method named like its enclosing class
//!   (default: false)
//! - `apply_to_public`, `apply_to_protected`, `apply_to_package`,
//!   `apply_to_private`: Access levels the pattern applies to (default: true)
//!
//! The pattern is not applied to methods annotated with `@Override`; their
//! name is fixed by the overridden declaration.

use jstyle_core::utils::scope::declared_access;
use jstyle_core::utils::{has_annotation, AccessModifier, PatternMatcher};
use jstyle_core::{
    args, Check, CheckBox, CheckContext, CheckError, CheckOptions, Node, OptionError, TokenType,
};

/// Check code for method-name.
pub const CODE: &str = "JS009";

/// Check name for method-name.
pub const NAME: &str = "method-name";

/// Message key for a name not matching the pattern.
pub const MSG_INVALID_PATTERN: &str = "name.invalidPattern";

/// Message key for a method named like its class.
pub const MSG_EQUALS_CLASS_NAME: &str = "method.name.equals.class.name";

/// Default method name pattern.
pub const DEFAULT_FORMAT: &str = "^[a-z][a-zA-Z0-9]*$";

/// Requires method names to match a pattern.
#[derive(Debug, Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct MethodName {
    /// Pattern method names must match.
    pub format: PatternMatcher,
    /// Allow a method named like its enclosing class.
    pub allow_class_name: bool,
    /// Check public methods.
    pub apply_to_public: bool,
    /// Check protected methods.
    pub apply_to_protected: bool,
    /// Check package-private methods.
    pub apply_to_package: bool,
    /// Check private methods.
    pub apply_to_private: bool,
}

impl MethodName {
    /// Builds the check from configured options.
    ///
    /// # Errors
    ///
    /// Fails when `format` does not compile or a flag is malformed.
    pub fn create(options: &mut CheckOptions) -> Result<CheckBox, OptionError> {
        Ok(Box::new(Self {
            format: PatternMatcher::from_options(options, "format", DEFAULT_FORMAT)?,
            allow_class_name: options.bool("allow_class_name", false)?,
            apply_to_public: options.bool("apply_to_public", true)?,
            apply_to_protected: options.bool("apply_to_protected", true)?,
            apply_to_package: options.bool("apply_to_package", true)?,
            apply_to_private: options.bool("apply_to_private", true)?,
        }))
    }

    fn applies_to(&self, method: Node<'_>) -> bool {
        match declared_access(method) {
            AccessModifier::Public => self.apply_to_public,
            AccessModifier::Protected => self.apply_to_protected,
            AccessModifier::Package => self.apply_to_package,
            AccessModifier::Private => self.apply_to_private,
        }
    }
}

impl Check for MethodName {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires method names to match a pattern and differ from the class name"
    }

    fn default_tokens(&self) -> &'static [TokenType] {
        &[TokenType::MethodDef]
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[
            (MSG_INVALID_PATTERN, "Name '{0}' must match pattern '{1}'."),
            (
                MSG_EQUALS_CLASS_NAME,
                "Method Name '{0}' must not equal the enclosing class name.",
            ),
        ]
    }

    fn reset_for_file(&mut self) {}

    fn visit_token(&mut self, node: Node<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        let ident = node
            .find_first_token(TokenType::Ident)
            .ok_or_else(|| CheckError::unexpected(node))?;
        let name = ident.text();

        if !has_annotation(node, "Override")
            && self.applies_to(node)
            && !self.format.matches(name)
        {
            ctx.log(ident, MSG_INVALID_PATTERN, args![name, self.format.as_str()]);
        }

        if !self.allow_class_name {
            // method, then body, then the class or `new` expression
            let owner = node.parent().and_then(Node::parent);
            let owner_name = owner
                .and_then(|o| o.find_first_token(TokenType::Ident))
                .map(Node::text);
            if owner_name == Some(name) {
                ctx.log(ident, MSG_EQUALS_CLASS_NAME, args![name]);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{run, run_with};
    use jstyle_core::CheckSettings;

    const SOURCE: &str = "\
class Widget {
    void render() {}
    void Draw() {}
    private void do_it() {}
    @Override
    public String ToString() { return \"\"; }
    void Widget() {}
}
";

    fn keys(settings: CheckSettings) -> Vec<(usize, String)> {
        run_with(settings, SOURCE)
            .into_iter()
            .map(|v| (v.line(), v.key))
            .collect()
    }

    #[test]
    fn reports_pattern_and_class_name() {
        let violations = run(NAME, SOURCE);
        let found: Vec<_> = violations
            .iter()
            .map(|v| (v.line(), v.column(), v.key.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                (3, 10, MSG_INVALID_PATTERN),
                (4, 18, MSG_INVALID_PATTERN),
                (7, 10, MSG_INVALID_PATTERN),
                (7, 10, MSG_EQUALS_CLASS_NAME),
            ]
        );
        assert_eq!(
            violations[3].message,
            "Method Name 'Widget' must not equal the enclosing class name."
        );
    }

    #[test]
    fn class_name_allowed_when_configured() {
        let settings = CheckSettings::named(NAME).option("allow_class_name", "true");
        assert!(!keys(settings)
            .iter()
            .any(|(_, key)| key == MSG_EQUALS_CLASS_NAME));
    }

    #[test]
    fn access_filters() {
        let settings = CheckSettings::named(NAME)
            .option("apply_to_package", "false")
            .option("allow_class_name", "true");
        assert_eq!(keys(settings), vec![(4, MSG_INVALID_PATTERN.to_string())]);
    }

    #[test]
    fn anonymous_class_type_name_compared() {
        let source = "\
class A {
    Runnable r = new Runnable() {
        public void Runnable() {}
        public void run() {}
    };
}
";
        let settings = CheckSettings::named(NAME).option("format", ".*");
        let violations = run_with(settings, source);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].line(), 3);
    }
}
