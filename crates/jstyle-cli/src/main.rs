//! jstyle CLI tool.
//!
//! Usage:
//! ```bash
//! jstyle check [OPTIONS] [PATH]
//! jstyle list-checks
//! jstyle init
//! ```
//!
//! Exit status: 0 when clean, 1 when violations at or above the failing
//! severity were found or a file could not be checked, 2 on configuration
//! errors.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use jstyle::{AnalyzerError, ConfigError};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod commands;

/// Checkstyle-like style checker for Java sources
#[derive(Parser)]
#[command(name = "jstyle")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to configuration file
    #[arg(short, long, global = true, env = "JSTYLE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run style checks
    Check {
        /// Path to analyze (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,

        /// Only run specific checks, by name or code (comma-separated)
        #[arg(long)]
        checks: Option<String>,

        /// Exclude patterns (can be specified multiple times)
        #[arg(short, long)]
        exclude: Vec<String>,

        /// Lowest severity that fails the run (default: from config, else error)
        #[arg(long)]
        fail_on: Option<String>,
    },

    /// List available checks and presets
    ListChecks,

    /// Initialize configuration file
    Init {
        /// Overwrite existing config
        #[arg(long)]
        force: bool,

        /// Preset written to the new config
        #[arg(long, default_value = "recommended")]
        preset: String,
    },
}

/// Output format for lint results.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output.
    #[default]
    Text,
    /// JSON output.
    Json,
    /// One-line-per-violation compact format.
    Compact,
    /// Rich diagnostics with source excerpts.
    Pretty,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e:#}");
            if is_config_error(&e) {
                ExitCode::from(2)
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Check {
            path,
            format,
            checks,
            exclude,
            fail_on,
        } => {
            let loaded = jstyle::ConfigSearch::new()
                .explicit(cli.config.as_deref())
                .load(&path)
                .context("Failed to load config")?;
            let args = commands::check::CheckArgs {
                format,
                checks,
                exclude,
                fail_on,
            };
            let failed = commands::check::run(&path, loaded.config, args)?;
            Ok(if failed {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            })
        }
        Commands::ListChecks => {
            commands::list_checks::run();
            Ok(ExitCode::SUCCESS)
        }
        Commands::Init { force, preset } => {
            let dir = std::env::current_dir()?;
            commands::init::run(&dir, &preset, force)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Configuration problems exit with status 2 instead of 1.
fn is_config_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause.is::<ConfigError>()
            || matches!(
                cause.downcast_ref::<AnalyzerError>(),
                Some(AnalyzerError::Config(_) | AnalyzerError::Glob(_) | AnalyzerError::MissingParser)
            )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_errors_are_detected_through_context() {
        let err = Err::<(), _>(ConfigError::UnknownCheck("nope".into()))
            .context("Failed to build analyzer")
            .unwrap_err();
        assert!(is_config_error(&err));

        let err = Err::<(), _>(AnalyzerError::from(ConfigError::UnknownPreset("x".into())))
            .context("Failed to build analyzer")
            .unwrap_err();
        assert!(is_config_error(&err));

        let err = anyhow::anyhow!("Analysis failed");
        assert!(!is_config_error(&err));
    }

    #[test]
    fn unreadable_explicit_config_exits_as_config_error() {
        let err = jstyle::ConfigSearch::new()
            .explicit(Some(std::path::Path::new("/nonexistent/jstyle.toml")))
            .load(std::path::Path::new("."))
            .context("Failed to load config")
            .unwrap_err();
        assert!(is_config_error(&err));
    }

    #[test]
    fn parses_check_arguments() {
        let cli = Cli::try_parse_from([
            "jstyle",
            "check",
            "src",
            "--format",
            "compact",
            "--checks",
            "JS001,left-curly",
            "--exclude",
            "**/gen/**",
            "--fail-on",
            "warning",
        ])
        .unwrap();
        let Commands::Check {
            path,
            format,
            checks,
            exclude,
            fail_on,
        } = cli.command
        else {
            panic!("expected check");
        };
        assert_eq!(path, PathBuf::from("src"));
        assert_eq!(format, OutputFormat::Compact);
        assert_eq!(checks.as_deref(), Some("JS001,left-curly"));
        assert_eq!(exclude, vec!["**/gen/**".to_string()]);
        assert_eq!(fail_on.as_deref(), Some("warning"));
    }
}
