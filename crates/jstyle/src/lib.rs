//! # jstyle
//!
//! Checkstyle-like style checker for Java source.
//!
//! This is the facade crate: it re-exports the engine from `jstyle-core`, the
//! Java front end and the built-in checks, and wires them together.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use jstyle::Config;
//!
//! let config = Config::parse(r#"
//! [[checks]]
//! name = "throws-count"
//! max = 2
//! "#)?;
//!
//! let analyzer = jstyle::analyzer_builder(config)?.root("./src").build()?;
//! let result = analyzer.analyze()?;
//! for violation in result.violations() {
//!     println!("{}", violation.format());
//! }
//! ```
//!
//! ## Suppressions
//!
//! Violations can be suppressed by `[[suppressions]]` line ranges in the
//! configuration, by `// jstyle:off` ... `// jstyle:on` comment pairs, and by
//! `@SuppressWarnings("jstyle:<check-name>")` on a declaration:
//!
//! ```java
//! @SuppressWarnings("jstyle:throws-count")
//! void load() throws IOException, SQLException {}
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

// Re-export core types and traits
pub use jstyle_core::*;

pub use jstyle_java::JavaParser;

/// Built-in checks and presets.
pub mod checks {
    pub use jstyle_checks::*;
}

mod discovery;
mod project;

pub use discovery::{
    user_config_dir, ConfigOrigin, ConfigSearch, LoadedConfig, CONFIG_DIR_ENV, CONFIG_FILE_NAMES,
};
pub use project::{
    analyzer_builder, analyzer_with, resolve_checks, resolve_fail_on, resolve_preset,
};
