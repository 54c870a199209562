//! List checks command implementation.

use jstyle::checks::builtin_registry;

/// Runs the list-checks command.
pub fn run() {
    println!("Available checks:\n");
    println!("{:<8} {:<36} {:<9} Description", "Code", "Name", "Severity");
    println!("{}", "-".repeat(100));

    for check in builtin_registry().iter() {
        println!(
            "{:<8} {:<36} {:<9} {}",
            check.code, check.name, check.default_severity, check.description
        );
    }

    println!("\nPresets (used when no [[checks]] are configured):");
    println!("  recommended  - JS001-JS004, JS008-JS011 (default)");
    println!("  strict       - All checks, private methods counted by throws-count");
    println!("  minimal      - JS008, JS009, JS010 (for gradual adoption)");

    println!("\nUse --checks to run specific checks, e.g.:");
    println!("  jstyle check --checks throws-count,left-curly");
    println!("  jstyle check --checks JS001,JS010");
}
