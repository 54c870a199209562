//! Check presets for common configurations.

use crate::{
    avoid_escaped_unicode, final_class, hide_utility_class_constructor, inner_type_last,
    left_curly, method_count, method_name, overload_methods_declaration_order, return_count,
    throws_count, todo_comment, type_name,
};
use jstyle_core::{CheckSettings, ConfigError};
use std::fmt;
use std::str::FromStr;

/// Preset configurations for jstyle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Recommended checks with sensible defaults.
    Recommended,
    /// Every check, with tighter limits.
    Strict,
    /// Naming and brace checks for gradual adoption.
    Minimal,
}

impl Preset {
    /// Returns the check settings for this preset.
    #[must_use]
    pub fn checks(self) -> Vec<CheckSettings> {
        match self {
            Self::Recommended => recommended_checks(),
            Self::Strict => strict_checks(),
            Self::Minimal => minimal_checks(),
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "recommended" => Ok(Self::Recommended),
            "strict" => Ok(Self::Strict),
            "minimal" => Ok(Self::Minimal),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Recommended => "recommended",
            Self::Strict => "strict",
            Self::Minimal => "minimal",
        })
    }
}

/// Returns the recommended set of checks.
///
/// Includes:
/// - `throws-count` (JS001)
/// - `avoid-escaped-unicode` (JS002)
/// - `final-class` (JS003)
/// - `hide-utility-class-constructor` (JS004)
/// - `type-name` (JS008), `method-name` (JS009)
/// - `left-curly` (JS010)
/// - `overload-methods-declaration-order` (JS011)
#[must_use]
pub fn recommended_checks() -> Vec<CheckSettings> {
    [
        throws_count::NAME,
        avoid_escaped_unicode::NAME,
        final_class::NAME,
        hide_utility_class_constructor::NAME,
        type_name::NAME,
        method_name::NAME,
        left_curly::NAME,
        overload_methods_declaration_order::NAME,
    ]
    .into_iter()
    .map(CheckSettings::named)
    .collect()
}

/// Returns the strict set of checks.
///
/// Every check, with private methods counted by `throws-count` and lower
/// method limits.
#[must_use]
pub fn strict_checks() -> Vec<CheckSettings> {
    all_checks()
        .into_iter()
        .map(|settings| {
            if settings.name == throws_count::NAME {
                settings.option("ignore_private_methods", "false")
            } else if settings.name == method_count::NAME {
                settings.option("max_total", "50")
            } else {
                settings
            }
        })
        .collect()
}

/// Returns the minimal set of checks.
#[must_use]
pub fn minimal_checks() -> Vec<CheckSettings> {
    [type_name::NAME, method_name::NAME, left_curly::NAME]
        .into_iter()
        .map(CheckSettings::named)
        .collect()
}

/// Returns every built-in check with default options.
#[must_use]
pub fn all_checks() -> Vec<CheckSettings> {
    [
        throws_count::NAME,
        avoid_escaped_unicode::NAME,
        final_class::NAME,
        hide_utility_class_constructor::NAME,
        inner_type_last::NAME,
        method_count::NAME,
        return_count::NAME,
        type_name::NAME,
        method_name::NAME,
        left_curly::NAME,
        overload_methods_declaration_order::NAME,
        todo_comment::NAME,
    ]
    .into_iter()
    .map(CheckSettings::named)
    .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builtin_registry;
    use jstyle_core::TokenType;

    #[test]
    fn presets_resolve_against_builtin_registry() {
        let registry = builtin_registry();
        for preset in [Preset::Recommended, Preset::Strict, Preset::Minimal] {
            let plan = registry.plan(&preset.checks(), TokenType::ALL);
            assert!(plan.is_ok(), "{preset}: {:?}", plan.err());
        }
        assert_eq!(all_checks().len(), registry.len());
    }

    #[test]
    fn parses_preset_names() {
        assert_eq!("Strict".parse::<Preset>().unwrap(), Preset::Strict);
        assert!(matches!(
            "lenient".parse::<Preset>(),
            Err(ConfigError::UnknownPreset(name)) if name == "lenient"
        ));
    }
}
