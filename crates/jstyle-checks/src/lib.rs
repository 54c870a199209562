//! # jstyle-checks
//!
//! Built-in Java style checks for jstyle.
//!
//! Each check is a token visitor registered under a kebab-case name and a
//! short code. [`builtin_registry`] returns a registry holding all of them.
//!
//! ## Available Checks
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | JS001 | `throws-count` | Limits the number of exceptions in a `throws` clause |
//! | JS002 | `avoid-escaped-unicode` | Forbids unicode escapes in literals |
//! | JS003 | `final-class` | Requires classes with only private constructors to be final |
//! | JS004 | `hide-utility-class-constructor` | Forbids public constructors on utility classes |
//! | JS005 | `inner-type-last` | Requires nested types after all other members |
//! | JS006 | `method-count` | Limits method counts per access level |
//! | JS007 | `return-count` | Limits return statements per method and lambda |
//! | JS008 | `type-name` | Requires type names to match a pattern |
//! | JS009 | `method-name` | Requires method names to match a pattern |
//! | JS010 | `left-curly` | Enforces left brace placement |
//! | JS011 | `overload-methods-declaration-order` | Keeps overloads together |
//! | JS012 | `todo-comment` | Reports to-do comments |
//!
//! ## Usage
//!
//! ```ignore
//! use jstyle_checks::builtin_registry;
//! use jstyle_core::{Analyzer, CheckSettings};
//! use jstyle_java::JavaParser;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .parser(JavaParser::new())
//!     .registry(builtin_registry())
//!     .checks(vec![CheckSettings::named("throws-count").option("max", "2")])
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod avoid_escaped_unicode;
pub mod final_class;
pub mod hide_utility_class_constructor;
pub mod inner_type_last;
pub mod left_curly;
pub mod method_count;
pub mod method_name;
pub mod overload_methods_declaration_order;
mod presets;
pub mod return_count;
pub mod throws_count;
pub mod todo_comment;
pub mod type_name;

pub use avoid_escaped_unicode::AvoidEscapedUnicode;
pub use final_class::FinalClass;
pub use hide_utility_class_constructor::HideUtilityClassConstructor;
pub use inner_type_last::InnerTypeLast;
pub use left_curly::{LeftCurly, LeftCurlyOption};
pub use method_count::MethodCount;
pub use method_name::MethodName;
pub use overload_methods_declaration_order::OverloadMethodsDeclarationOrder;
pub use presets::{all_checks, minimal_checks, recommended_checks, strict_checks, Preset};
pub use return_count::ReturnCount;
pub use throws_count::ThrowsCount;
pub use todo_comment::TodoComment;
pub use type_name::TypeName;

/// Re-export core types for convenience.
pub use jstyle_core::{Check, CheckRegistry, CheckSettings, Severity, Violation};

/// Returns a registry holding every built-in check, in code order.
#[must_use]
pub fn builtin_registry() -> CheckRegistry {
    let mut registry = CheckRegistry::new();
    registry
        .register(ThrowsCount::create)
        .register(AvoidEscapedUnicode::create)
        .register(FinalClass::create)
        .register(HideUtilityClassConstructor::create)
        .register(InnerTypeLast::create)
        .register(MethodCount::create)
        .register(ReturnCount::create)
        .register(TypeName::create)
        .register(MethodName::create)
        .register(LeftCurly::create)
        .register(OverloadMethodsDeclarationOrder::create)
        .register(TodoComment::create);
    tracing::debug!("Registered {} built-in checks", registry.len());
    registry
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_lists_every_check() {
        let registry = builtin_registry();
        let listing: Vec<String> = registry
            .iter()
            .map(|d| format!("{} {} {}", d.code, d.name, d.default_severity))
            .collect();
        insta::assert_yaml_snapshot!(listing, @r###"
        - JS001 throws-count error
        - JS002 avoid-escaped-unicode error
        - JS003 final-class error
        - JS004 hide-utility-class-constructor error
        - JS005 inner-type-last error
        - JS006 method-count error
        - JS007 return-count error
        - JS008 type-name error
        - JS009 method-name error
        - JS010 left-curly error
        - JS011 overload-methods-declaration-order error
        - JS012 todo-comment info
        "###);
    }

    #[test]
    fn lookup_by_code_or_name() {
        let registry = builtin_registry();
        assert_eq!(registry.get("js010").map(|d| d.name), Some("left-curly"));
        assert_eq!(registry.get("Final-Class").map(|d| d.code), Some("JS003"));
        assert!(registry.get("no-such-check").is_none());
    }
}
