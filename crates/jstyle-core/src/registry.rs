//! Check registry and validated check plans.
//!
//! The registry maps check names and codes to factories. Resolving a
//! configuration against it happens once, before any file is read, and yields
//! a [`CheckPlan`]: every option parsed, every token validated. Worker
//! threads instantiate their own [`TreeWalker`] from the plan.

use crate::check::CheckBox;
use crate::config::ConfigError;
use crate::options::{CheckOptions, OptionError};
use crate::token::TokenType;
use crate::types::Severity;
use crate::walker::{ConfiguredCheck, TreeWalker};
use indexmap::IndexMap;
use std::collections::BTreeMap;
use tracing::debug;

/// Builds a check from its options.
pub type CheckFactory = fn(&mut CheckOptions) -> Result<CheckBox, OptionError>;

/// Registry metadata for one check.
#[derive(Clone, Copy)]
pub struct CheckDescriptor {
    /// Kebab-case name.
    pub name: &'static str,
    /// Short code.
    pub code: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Severity when not configured.
    pub default_severity: Severity,
    /// Builds an instance.
    pub factory: CheckFactory,
}

impl std::fmt::Debug for CheckDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CheckDescriptor")
            .field("name", &self.name)
            .field("code", &self.code)
            .field("default_severity", &self.default_severity)
            .finish_non_exhaustive()
    }
}

/// Configuration of one check before resolution.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CheckSettings {
    /// Check name or code.
    pub name: String,
    /// Severity override.
    pub severity: Option<Severity>,
    /// Token selection replacing the defaults.
    pub tokens: Option<Vec<TokenType>>,
    /// Check-specific options.
    pub options: BTreeMap<String, String>,
}

impl CheckSettings {
    /// Settings with defaults only.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Adds an option.
    #[must_use]
    pub fn option(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Sets the severity.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = Some(severity);
        self
    }

    /// Sets the token selection.
    #[must_use]
    pub fn tokens(mut self, tokens: Vec<TokenType>) -> Self {
        self.tokens = Some(tokens);
        self
    }
}

/// Name and code lookup of available checks.
#[derive(Debug, Clone, Default)]
pub struct CheckRegistry {
    checks: IndexMap<&'static str, CheckDescriptor>,
}

impl CheckRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a check factory. Metadata is read from a default instance;
    /// a factory that cannot build one with default options is skipped.
    pub fn register(&mut self, factory: CheckFactory) -> &mut Self {
        match factory(&mut CheckOptions::empty("")) {
            Ok(check) => {
                self.checks.insert(
                    check.name(),
                    CheckDescriptor {
                        name: check.name(),
                        code: check.code(),
                        description: check.description(),
                        default_severity: check.default_severity(),
                        factory,
                    },
                );
            }
            Err(e) => tracing::warn!("Skipping check with invalid defaults: {e}"),
        }
        self
    }

    /// Looks up a check by name or code, ignoring case.
    #[must_use]
    pub fn get(&self, name_or_code: &str) -> Option<&CheckDescriptor> {
        self.checks.get(name_or_code).or_else(|| {
            self.checks.values().find(|d| {
                d.name.eq_ignore_ascii_case(name_or_code) || d.code.eq_ignore_ascii_case(name_or_code)
            })
        })
    }

    /// All checks in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &CheckDescriptor> {
        self.checks.values()
    }

    /// Number of registered checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.checks.len()
    }

    /// Returns true when no check is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.checks.is_empty()
    }

    /// Resolves configured checks into a validated plan.
    ///
    /// # Errors
    ///
    /// Fails on unknown checks, invalid or unknown options, and tokens that
    /// are not acceptable to their check or not produced by the parser.
    pub fn plan(
        &self,
        settings: &[CheckSettings],
        universe: &'static [TokenType],
    ) -> Result<CheckPlan, ConfigError> {
        let mut entries = Vec::with_capacity(settings.len());
        for setting in settings {
            let descriptor = self
                .get(&setting.name)
                .ok_or_else(|| ConfigError::UnknownCheck(setting.name.clone()))?;
            debug!("Planning check {} ({})", descriptor.name, descriptor.code);
            entries.push(PlannedCheck {
                descriptor: *descriptor,
                severity: setting.severity,
                tokens: setting.tokens.clone(),
                options: setting.options.clone(),
            });
        }

        let plan = CheckPlan { entries, universe };
        // Constructing one walker parses every option and validates every token.
        plan.instantiate()?;
        Ok(plan)
    }
}

#[derive(Debug, Clone)]
struct PlannedCheck {
    descriptor: CheckDescriptor,
    severity: Option<Severity>,
    tokens: Option<Vec<TokenType>>,
    options: BTreeMap<String, String>,
}

impl PlannedCheck {
    fn build(&self) -> Result<ConfiguredCheck, ConfigError> {
        let mut options = CheckOptions::new(self.descriptor.name, self.options.clone());
        let check = (self.descriptor.factory)(&mut options)?;
        options.finish()?;

        let mut configured = ConfiguredCheck::new(check);
        if let Some(severity) = self.severity {
            configured = configured.with_severity(severity);
        }
        if let Some(tokens) = &self.tokens {
            configured = configured.with_tokens(tokens.clone());
        }
        Ok(configured)
    }
}

/// A validated, ordered list of checks ready to be instantiated per thread.
#[derive(Debug, Clone)]
pub struct CheckPlan {
    entries: Vec<PlannedCheck>,
    universe: &'static [TokenType],
}

impl CheckPlan {
    /// Builds a fresh walker with new check instances.
    ///
    /// # Errors
    ///
    /// Only fails for plans that bypassed [`CheckRegistry::plan`] validation.
    pub fn instantiate(&self) -> Result<TreeWalker, ConfigError> {
        let checks = self
            .entries
            .iter()
            .map(PlannedCheck::build)
            .collect::<Result<Vec<_>, _>>()?;
        TreeWalker::new(checks, self.universe)
    }

    /// Names of the planned checks in order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.descriptor.name)
    }

    /// Number of planned checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true for a plan without checks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::check::Check;

    struct Limit {
        max: usize,
    }

    impl Check for Limit {
        fn name(&self) -> &'static str {
            "limit"
        }
        fn code(&self) -> &'static str {
            "T010"
        }
        fn description(&self) -> &'static str {
            "Limits things"
        }
        fn default_tokens(&self) -> &'static [TokenType] {
            &[TokenType::MethodDef]
        }
        fn acceptable_tokens(&self) -> &'static [TokenType] {
            &[TokenType::MethodDef, TokenType::CtorDef]
        }
        fn messages(&self) -> &'static [(&'static str, &'static str)] {
            &[]
        }
        fn reset_for_file(&mut self) {
            let _ = self.max;
        }
    }

    fn limit_factory(options: &mut CheckOptions) -> Result<CheckBox, OptionError> {
        Ok(Box::new(Limit {
            max: options.usize("max", 1)?,
        }))
    }

    const UNIVERSE: &[TokenType] = &[TokenType::CompilationUnit, TokenType::MethodDef];

    fn registry() -> CheckRegistry {
        let mut registry = CheckRegistry::new();
        registry.register(limit_factory);
        registry
    }

    #[test]
    fn looks_up_by_name_or_code() {
        let registry = registry();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("limit").map(|d| d.code), Some("T010"));
        assert_eq!(registry.get("t010").map(|d| d.name), Some("limit"));
        assert_eq!(registry.get("LIMIT").map(|d| d.description), Some("Limits things"));
        assert!(registry.get("nope").is_none());
    }

    #[test]
    fn plan_validates_options_and_tokens() {
        let registry = registry();
        let plan = registry
            .plan(&[CheckSettings::named("limit").option("max", "3")], UNIVERSE)
            .unwrap();
        assert_eq!(plan.names().collect::<Vec<_>>(), vec!["limit"]);
        assert_eq!(plan.instantiate().unwrap().check_count(), 1);

        let err = registry
            .plan(&[CheckSettings::named("limit").option("max", "x")], UNIVERSE)
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOption { .. }));

        let err = registry
            .plan(&[CheckSettings::named("limit").option("maximum", "3")], UNIVERSE)
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownOption { ref key, .. } if key == "maximum"));

        let err = registry
            .plan(&[CheckSettings::named("missing")], UNIVERSE)
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownCheck(_)));
    }

    #[test]
    fn plan_rejects_tokens_outside_parser_universe() {
        let err = registry()
            .plan(
                &[CheckSettings::named("limit").tokens(vec![TokenType::CtorDef])],
                UNIVERSE,
            )
            .unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedToken { .. }));

        let err = registry()
            .plan(
                &[CheckSettings::named("limit").tokens(vec![TokenType::ClassDef])],
                UNIVERSE,
            )
            .unwrap_err();
        assert!(matches!(err, ConfigError::IllegalToken { .. }));
    }
}
