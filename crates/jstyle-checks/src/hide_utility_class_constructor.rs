//! Check that utility classes do not expose a constructor.
//!
//! # Rationale
//!
//! A class holding only static members is never meant to be instantiated.
//! A public or default constructor invites `new Util()` calls that do
//! nothing useful.
//!
//! # Configuration
//!
//! - `ignore_annotated_by`: Comma separated annotation names; annotated
//!   classes are skipped (default: none)

use jstyle_core::utils::names::last_segment;
use jstyle_core::utils::{has_annotation, Modifiers};
use jstyle_core::{
    args, Check, CheckBox, CheckContext, CheckError, CheckOptions, Node, OptionError, TokenType,
};

/// Check code for hide-utility-class-constructor.
pub const CODE: &str = "JS004";

/// Check name for hide-utility-class-constructor.
pub const NAME: &str = "hide-utility-class-constructor";

/// Message key.
pub const MSG_KEY: &str = "hide.utility.class";

/// Facts gathered from the direct members of a class body.
#[derive(Debug, Default)]
#[allow(clippy::struct_excessive_bools)]
struct Members {
    non_static: bool,
    non_private_static: bool,
    declares_ctor: bool,
    public_ctor: bool,
}

impl Members {
    fn of(body: Node<'_>) -> Self {
        let mut members = Self::default();
        for member in body.children() {
            match member.token_type() {
                TokenType::MethodDef | TokenType::VariableDef => {
                    let modifiers = Modifiers::of(member);
                    if !modifiers.is_static() {
                        members.non_static = true;
                    } else if !modifiers.is_private() {
                        members.non_private_static = true;
                    }
                }
                TokenType::CtorDef => {
                    members.declares_ctor = true;
                    let modifiers = Modifiers::of(member);
                    // package-private counts as public here
                    if !modifiers.is_private() && !modifiers.is_protected() {
                        members.public_ctor = true;
                    }
                }
                _ => {}
            }
        }
        members
    }

    fn is_utility(&self) -> bool {
        !self.non_static && self.non_private_static
    }

    fn has_accessible_ctor(&self) -> bool {
        !self.declares_ctor || self.public_ctor
    }
}

/// Reports utility classes with a public or default constructor.
#[derive(Debug, Clone, Default)]
pub struct HideUtilityClassConstructor {
    /// Annotations that exempt a class.
    pub ignore_annotated_by: Vec<String>,
}

impl HideUtilityClassConstructor {
    /// Creates a new check with no ignored annotations.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the annotations that exempt a class.
    #[must_use]
    pub fn ignore_annotated_by(mut self, names: Vec<String>) -> Self {
        self.ignore_annotated_by = names;
        self
    }

    /// Builds the check from configured options.
    ///
    /// # Errors
    ///
    /// Never fails; the signature matches the factory contract.
    pub fn create(options: &mut CheckOptions) -> Result<CheckBox, OptionError> {
        Ok(Box::new(
            Self::new().ignore_annotated_by(options.list("ignore_annotated_by")),
        ))
    }

    fn is_ignored(&self, class: Node<'_>) -> bool {
        self.ignore_annotated_by
            .iter()
            .any(|name| has_annotation(class, last_segment(name)))
    }
}

impl Check for HideUtilityClassConstructor {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids public or default constructors in utility classes"
    }

    fn default_tokens(&self) -> &'static [TokenType] {
        &[TokenType::ClassDef]
    }

    fn messages(&self) -> &'static [(&'static str, &'static str)] {
        &[(
            MSG_KEY,
            "Utility classes should not have a public or default constructor.",
        )]
    }

    fn reset_for_file(&mut self) {}

    fn visit_token(&mut self, node: Node<'_>, ctx: &mut CheckContext<'_>) -> Result<(), CheckError> {
        let modifiers = Modifiers::of(node);
        if modifiers.is_abstract() || self.is_ignored(node) {
            return Ok(());
        }
        let body = node
            .find_first_token(TokenType::ObjBlock)
            .ok_or_else(|| CheckError::unexpected(node))?;
        let members = Members::of(body);
        let extends_object = node.find_first_token(TokenType::ExtendsClause).is_none();

        if extends_object
            && members.is_utility()
            && members.has_accessible_ctor()
            && !modifiers.is_static()
        {
            ctx.log(node, MSG_KEY, args![]);
        }
        Ok(())
    }
}
