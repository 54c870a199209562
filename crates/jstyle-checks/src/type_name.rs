//! Check that type names follow a naming pattern.
//!
//! # Configuration
//!
//! - `format`: Pattern type names must match (default: `^[A-Z][a-zA-Z0-9]*$`)
//!
//! Applies to classes, interfaces, enums, records and annotation types.

use jstyle_core::utils::PatternMatcher;
use jstyle_core::{
    args, Check, CheckBox, CheckContext, CheckError, CheckOptions, Node, OptionError, TokenType,
};

/// Check code for type-name.
pub const CODE: &str = "JS008";

/// Check name for type-name.
pub const NAME: &str = "type-name";

/// Message key.
pub const MSG_INVALID_PATTERN: &str = "name.invalidPattern";

/// Default type name pattern.
pub const DEFAULT_FORMAT: &str = "^[A-Z][a-zA-Z0-9]*$";

/// Requires type names to match a pattern.
#[derive(Debug, Clone)]
pub struct TypeName {
    /// Pattern type names must match.
    pub format: PatternMatcher,
}

impl TypeName {
    /// Builds the check from configured options.
    ///
    /// # Errors
    ///
    /// Fails when `format` does not compile.
    pub fn create(options: &mut CheckOptions) -> Result<CheckBox, OptionError> {
        Ok(Box::new(Self {
            format: PatternMatcher::from_options(options, "format", DEFAULT_FORMAT)?,
        }))
    }
}

impl Check for TypeName {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires type names to match a pattern"
    }

    fn default_tokens(&self) -> &'static [TokenType] {
        &[
            TokenType::ClassDef,
            TokenType::InterfaceDef,
            TokenType::EnumDef,
            TokenType::AnnotationDef,
            TokenType::RecordDef,
        ]
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[(MSG_INVALID_PATTERN, "Name '{0}' must match pattern '{1}'.")]
    }

    fn reset_for_file(&mut self) {}

    fn visit_token(&mut self, node: Node<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        let ident = node
            .find_first_token(TokenType::Ident)
            .ok_or_else(|| CheckError::unexpected(node))?;
        if !self.format.matches(ident.text()) {
            ctx.log(
                ident,
                MSG_INVALID_PATTERN,
                args![ident.text(), self.format.as_str()],
            );
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
class good_name {}
interface Api {}
enum lower { A }
record Point(int x) {}
@interface my_marker {}
";

    #[test]
    fn reports_at_the_identifier() {
        let violations = run(NAME, SOURCE);
        let found: Vec<_> = violations
            .iter()
            .map(|v| (v.line(), v.column(), v.message.as_str()))
            .collect();
        assert_eq!(
            found,
            vec![
                (1, 7, "Name 'good_name' must match pattern '^[A-Z][a-zA-Z0-9]*$'."),
                (3, 6, "Name 'lower' must match pattern '^[A-Z][a-zA-Z0-9]*$'."),
                (5, 12, "Name 'my_marker' must match pattern '^[A-Z][a-zA-Z0-9]*$'."),
            ]
        );
    }

    #[test]
    fn custom_format_and_tokens() {
        let settings = CheckSettings::named(NAME)
            .option("format", "^[a-z_]+$")
            .tokens(vec![TokenType::ClassDef]);
        assert!(run_with(settings, SOURCE).is_empty());
    }
}
