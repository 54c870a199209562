//! Check command implementation.

use anyhow::{Context, Result};
use jstyle::checks::builtin_registry;
use jstyle::{CheckSettings, Config};
use std::path::Path;

use crate::OutputFormat;

/// Arguments of the check command.
pub struct CheckArgs {
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated check names or codes to run instead of the configured set.
    pub checks: Option<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Failing severity overriding the config.
    pub fail_on: Option<String>,
}

/// Runs the check command. Returns true when the run failed.
pub fn run(path: &Path, config: Config, args: CheckArgs) -> Result<bool> {
    let fail_on = jstyle::resolve_fail_on(args.fail_on.as_deref(), &config)?;
    let configured = jstyle::resolve_checks(&config)?;

    let mut builder = jstyle::analyzer_builder(config)?;
    if let Some(filter) = &args.checks {
        builder = builder.checks(select_checks(filter, &configured));
    }

    let single_file = path.is_file();
    let root = if single_file {
        path.parent().unwrap_or(Path::new("."))
    } else {
        path
    };
    let analyzer = builder
        .root(root)
        .excludes(args.exclude)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with {} checks",
        path.display(),
        analyzer.check_count()
    );
    tracing::debug!(
        "Checks: {}",
        analyzer.check_names().collect::<Vec<_>>().join(", ")
    );

    let result = if single_file {
        analyzer.analyze_paths(&[path.to_path_buf()])
    } else {
        analyzer.analyze()
    }
    .context("Analysis failed")?;

    super::output::print(&result, args.format, analyzer.root())?;

    Ok(result.has_violations_at(fail_on) || result.has_failures())
}

/// Picks the named checks, keeping options from the configured entry of the
/// same check. Unknown names are left for the planner to reject.
fn select_checks(filter: &str, configured: &[CheckSettings]) -> Vec<CheckSettings> {
    let registry = builtin_registry();
    let canonical = |name: &str| registry.get(name).map(|d| d.name);

    filter
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| {
            let wanted = canonical(name);
            configured
                .iter()
                .find(|c| wanted.is_some() && canonical(&c.name) == wanted)
                .cloned()
                .unwrap_or_else(|| CheckSettings::named(name))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn args(checks: Option<&str>, fail_on: Option<&str>) -> CheckArgs {
        CheckArgs {
            format: OutputFormat::Compact,
            checks: checks.map(str::to_string),
            exclude: Vec::new(),
            fail_on: fail_on.map(str::to_string),
        }
    }

    #[test]
    fn filter_keeps_configured_options() {
        let configured = vec![CheckSettings::named("throws-count").option("max", "4")];
        let selected = select_checks("JS001, type-name,,bogus", &configured);
        assert_eq!(
            selected,
            vec![
                CheckSettings::named("throws-count").option("max", "4"),
                CheckSettings::named("type-name"),
                CheckSettings::named("bogus"),
            ]
        );
    }

    #[test]
    fn violations_fail_the_run_at_threshold() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.java"), "class a {\n    // TODO: rename\n}\n").unwrap();

        let failed = run(tmp.path(), Config::default(), args(Some("todo-comment"), None));
        assert!(!failed.unwrap(), "info is below the default threshold");

        let failed = run(
            tmp.path(),
            Config::default(),
            args(Some("todo-comment"), Some("info")),
        );
        assert!(failed.unwrap());

        let failed = run(tmp.path(), Config::default(), args(Some("type-name"), None));
        assert!(failed.unwrap());
    }

    #[test]
    fn config_file_selects_checks_and_threshold() {
        let tmp = TempDir::new().unwrap();
        let config = tmp.path().join("jstyle.toml");
        fs::write(
            &config,
            "fail_on = \"warning\"\n\n[[checks]]\nname = \"todo-comment\"\nseverity = \"warning\"\n",
        )
        .unwrap();
        let file = tmp.path().join("A.java");
        fs::write(&file, "class A {\n    // TODO: rename\n}\n").unwrap();

        let config = Config::from_file(&config).unwrap();
        assert!(run(&file, config, args(None, None)).unwrap());
    }

    #[test]
    fn unknown_check_is_a_config_error() {
        let tmp = TempDir::new().unwrap();
        let err = run(tmp.path(), Config::default(), args(Some("bogus"), None)).unwrap_err();
        assert!(crate::is_config_error(&err), "{err:#}");
    }
}
