//! Shared output formatting for lint results.

use anyhow::Result;
use jstyle::{LintResult, Severity, ViolationDiagnostic};
use miette::{NamedSource, Report};
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat, root: &Path) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Pretty => print_pretty(result, root),
    }
    Ok(())
}

fn severity_indicator(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
        Severity::Info => "\x1b[34minfo\x1b[0m",
        Severity::Ignore => "ignore",
    }
}

fn print_text(result: &LintResult) {
    for violation in result.violations() {
        println!(
            "{} {} at {}:{}:{}",
            violation.code,
            violation.check,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        println!(
            "  {}: {}",
            severity_indicator(violation.severity),
            violation.message
        );
        println!();
    }
    print_failures(result);
    print_summary(result);
}

fn print_failures(result: &LintResult) {
    for failure in &result.failures {
        println!(
            "\x1b[31mfailed\x1b[0m {}: {}",
            failure.path.display(),
            failure.error
        );
    }
}

fn print_summary(result: &LintResult) {
    let (errors, warnings, infos) = result.count_by_severity();

    let summary_color = if errors > 0 || result.has_failures() {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s){}\x1b[0m",
        summary_color,
        errors,
        warnings,
        infos,
        result.files_checked,
        if result.has_failures() {
            format!(", {} file(s) failed", result.failures.len())
        } else {
            String::new()
        }
    );
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in result.violations() {
        println!("{violation}");
    }
    for failure in &result.failures {
        println!("{}: failed: {}", failure.path.display(), failure.error);
    }
}

fn print_pretty(result: &LintResult, root: &Path) {
    for report in &result.reports {
        if report.violations.is_empty() {
            continue;
        }
        let name = report.path.display().to_string();
        let text = match std::fs::read_to_string(root.join(&report.path)) {
            Ok(text) => Some(text),
            Err(e) => {
                tracing::warn!("Cannot reread {name}: {e}");
                None
            }
        };
        for violation in &report.violations {
            let diagnostic = Report::new(ViolationDiagnostic::from(violation));
            let diagnostic = match &text {
                Some(text) => diagnostic.with_source_code(NamedSource::new(&name, text.clone())),
                None => diagnostic,
            };
            eprintln!("{diagnostic:?}");
        }
    }
    print_failures(result);
    print_summary(result);
}
