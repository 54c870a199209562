//! Init command implementation.

use anyhow::{bail, Result};
use jstyle::checks::Preset;
use std::path::Path;

const CONFIG_NAME: &str = "jstyle.toml";

const DEFAULT_CONFIG: &str = r#"# jstyle configuration

# Checks to run when no [[checks]] tables are listed:
# "recommended", "strict" or "minimal"
preset = "{preset}"

# Lowest severity that fails the run: "error", "warning" or "info"
fail_on = "error"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src/main/java"

# Glob patterns to exclude from analysis
exclude = [
    "**/build/**",
    "**/target/**",
    "**/generated/**",
]

# Respect .gitignore files
respect_gitignore = true

# Columns are reported with tabs expanded to this width
tab_width = 8

[suppression_comments]
enabled = true
off = "jstyle:off"
on = "jstyle:on"

# Listing checks replaces the preset. Options other than name, severity
# and tokens are passed to the check.
#
# [[checks]]
# name = "throws-count"
# severity = "warning"
# max = 2
#
# [[checks]]
# name = "left-curly"
# option = "nl"
#
# [[suppressions]]
# files = "**/legacy/**"
# checks = "method-count"
# lines = "1-200"
"#;

/// Renders the default configuration for `preset`.
///
/// # Errors
///
/// Fails on an unknown preset name.
pub fn render(preset: &str) -> Result<String> {
    let preset: Preset = preset.parse()?;
    Ok(DEFAULT_CONFIG.replace("{preset}", &preset.to_string()))
}

/// Runs the init command, writing `jstyle.toml` into `dir`.
pub fn run(dir: &Path, preset: &str, force: bool) -> Result<()> {
    let config_path = dir.join(CONFIG_NAME);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, render(preset)?)?;

    println!("Created {CONFIG_NAME}");
    println!("\nNext steps:");
    println!("  1. Edit {CONFIG_NAME} to configure checks");
    println!("  2. Run: jstyle check");

    Ok(())
}
