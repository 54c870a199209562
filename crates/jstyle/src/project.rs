//! Resolution of presets, thresholds and checks from a [`Config`].
//!
//! An explicit argument wins over the configuration file, which wins over
//! the defaults (`recommended` preset, `error` threshold).

use jstyle_checks::{builtin_registry, Preset};
use jstyle_core::{Analyzer, AnalyzerBuilder, CheckSettings, Config, ConfigError, Severity};
use jstyle_java::JavaParser;
use tracing::debug;

/// Resolves the effective preset: explicit argument > config > recommended.
///
/// # Errors
///
/// Returns [`ConfigError::UnknownPreset`] for an unknown name.
pub fn resolve_preset(explicit: Option<&str>, config: &Config) -> Result<Preset, ConfigError> {
    explicit
        .or(config.preset.as_deref())
        .map_or(Ok(Preset::Recommended), str::parse)
}

/// Resolves the failing threshold: explicit argument > config > error.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidSeverity`] for an unknown name.
pub fn resolve_fail_on(explicit: Option<&str>, config: &Config) -> Result<Severity, ConfigError> {
    match explicit {
        Some(name) => name
            .parse()
            .map_err(|_| ConfigError::InvalidSeverity(name.to_string())),
        None => config.fail_on(),
    }
}

/// Checks to run: the `[[checks]]` tables when present, the preset otherwise.
///
/// # Errors
///
/// Fails on an unknown preset or an unknown token name in a check table.
pub fn resolve_checks(config: &Config) -> Result<Vec<CheckSettings>, ConfigError> {
    if config.checks.is_empty() {
        let preset = resolve_preset(None, config)?;
        debug!("No checks configured, using preset `{preset}`");
        Ok(preset.checks())
    } else {
        config.check_settings()
    }
}

/// Returns a builder wired with the Java parser, the built-in checks and the
/// checks resolved from `config`.
///
/// # Errors
///
/// Fails when the checks cannot be resolved.
pub fn analyzer_builder(config: Config) -> Result<AnalyzerBuilder, ConfigError> {
    let checks = resolve_checks(&config)?;
    Ok(Analyzer::builder()
        .parser(JavaParser::new())
        .registry(builtin_registry())
        .checks(checks)
        .config(config))
}

/// Builds an analyzer running exactly `checks` with otherwise default settings.
///
/// # Errors
///
/// Fails on unknown checks or invalid options.
pub fn analyzer_with(checks: Vec<CheckSettings>) -> Result<Analyzer, jstyle_core::AnalyzerError> {
    Analyzer::builder()
        .parser(JavaParser::new())
        .registry(builtin_registry())
        .checks(checks)
        .build()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(toml: &str) -> Config {
        Config::parse(toml).unwrap()
    }

    #[test]
    fn resolve_preset_defaults_to_recommended() {
        assert_eq!(
            resolve_preset(None, &Config::default()).unwrap(),
            Preset::Recommended
        );
    }

    #[test]
    fn explicit_preset_takes_precedence() {
        let config = config("preset = \"minimal\"");
        assert_eq!(resolve_preset(None, &config).unwrap(), Preset::Minimal);
        assert_eq!(
            resolve_preset(Some("strict"), &config).unwrap(),
            Preset::Strict
        );
    }

    #[test]
    fn unknown_preset_is_an_error() {
        let err = resolve_preset(Some("nonexistent"), &Config::default()).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownPreset(_)));
    }

    #[test]
    fn resolve_fail_on_precedence() {
        let config = config("fail_on = \"info\"");
        assert_eq!(resolve_fail_on(None, &Config::default()).unwrap(), Severity::Error);
        assert_eq!(resolve_fail_on(None, &config).unwrap(), Severity::Info);
        assert_eq!(
            resolve_fail_on(Some("error"), &config).unwrap(),
            Severity::Error
        );
        assert!(matches!(
            resolve_fail_on(Some("critical"), &config),
            Err(ConfigError::InvalidSeverity(_))
        ));
    }

    #[test]
    fn check_tables_replace_the_preset() {
        let config = config(
            r#"
preset = "strict"

[[checks]]
name = "throws-count"
max = 2
"#,
        );
        let checks = resolve_checks(&config).unwrap();
        assert_eq!(checks.len(), 1);
        assert_eq!(checks[0].name, "throws-count");
        assert_eq!(checks[0].options.get("max").map(String::as_str), Some("2"));
    }

    #[test]
    fn preset_used_without_check_tables() {
        let checks = resolve_checks(&config("preset = \"minimal\"")).unwrap();
        let names: Vec<_> = checks.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["type-name", "method-name", "left-curly"]);
    }

    #[test]
    fn builder_plans_preset_checks() {
        let analyzer = analyzer_builder(config("preset = \"strict\""))
            .unwrap()
            .root(".")
            .build()
            .unwrap();
        assert_eq!(analyzer.check_count(), 12);
    }
}
