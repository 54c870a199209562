//! Locating `jstyle.toml` for a checked path.
//!
//! A Java project usually keeps its configuration at the repository root
//! while checks run on `src/main/java/...`, so the project lookup climbs from
//! the checked directory through its ancestors. The climb stops at the first
//! directory holding `.git`; past that point a config belongs to some other
//! project. The user config directory is the last resort.

use jstyle_core::{Config, ConfigError};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Project config file names, checked in order within each directory.
pub const CONFIG_FILE_NAMES: &[&str] = &["jstyle.toml", ".jstyle.toml"];

const USER_CONFIG_NAME: &str = "config.toml";

/// Environment variable overriding the user config directory.
pub const CONFIG_DIR_ENV: &str = "JSTYLE_CONFIG_DIR";

/// Where a configuration file was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigOrigin {
    /// Named explicitly (`--config`); not checked for existence.
    Explicit(PathBuf),
    /// Found beside the checked path or in one of its ancestors.
    Project(PathBuf),
    /// `config.toml` in the user config directory.
    User(PathBuf),
}

impl ConfigOrigin {
    /// Path of the config file.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::User(p) => p,
        }
    }
}

/// A parsed configuration and the file it came from, if any.
#[derive(Debug, Default)]
pub struct LoadedConfig {
    /// The configuration; defaults when no file was found.
    pub config: Config,
    /// Origin of the file.
    pub origin: Option<ConfigOrigin>,
}

/// User config directory: `$JSTYLE_CONFIG_DIR`, else `~/.jstyle`.
#[must_use]
pub fn user_config_dir() -> Option<PathBuf> {
    match std::env::var_os(CONFIG_DIR_ENV) {
        Some(dir) => Some(PathBuf::from(dir)),
        None => home::home_dir().map(|h| h.join(".jstyle")),
    }
}

/// Search for the configuration that applies to a checked path.
///
/// ```rust,ignore
/// let loaded = jstyle::ConfigSearch::new()
///     .explicit(Some(Path::new("ci/jstyle.toml")))
///     .load(Path::new("src/main/java"))?;
/// ```
#[derive(Debug, Clone)]
pub struct ConfigSearch {
    explicit: Option<PathBuf>,
    user_dir: Option<PathBuf>,
}

impl Default for ConfigSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigSearch {
    /// A search falling back to [`user_config_dir`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            explicit: None,
            user_dir: user_config_dir(),
        }
    }

    /// Uses `path` instead of searching, when given.
    #[must_use]
    pub fn explicit(mut self, path: Option<&Path>) -> Self {
        self.explicit = path.map(Path::to_path_buf);
        self
    }

    /// Overrides the user config directory; `None` disables the fallback.
    #[must_use]
    pub fn user_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.user_dir = dir;
        self
    }

    /// Finds the config file for `target`, a directory or a single file.
    #[must_use]
    pub fn find(&self, target: &Path) -> Option<ConfigOrigin> {
        if let Some(path) = &self.explicit {
            return Some(ConfigOrigin::Explicit(path.clone()));
        }
        if let Some(found) = find_in_project(target) {
            return Some(ConfigOrigin::Project(found));
        }
        self.user_dir
            .as_ref()
            .map(|dir| dir.join(USER_CONFIG_NAME))
            .filter(|candidate| candidate.is_file())
            .map(ConfigOrigin::User)
    }

    /// Finds and parses the config for `target`. Without a file the
    /// configuration is the default one.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be read or parsed.
    pub fn load(&self, target: &Path) -> Result<LoadedConfig, ConfigError> {
        let Some(origin) = self.find(target) else {
            debug!("No config file found, using defaults");
            return Ok(LoadedConfig::default());
        };
        match &origin {
            ConfigOrigin::User(path) => info!("Using user config: {}", path.display()),
            other => debug!("Using config: {}", other.path().display()),
        }
        let config = Config::from_file(origin.path())?;
        Ok(LoadedConfig {
            config,
            origin: Some(origin),
        })
    }
}

fn find_in_project(target: &Path) -> Option<PathBuf> {
    let start = if target.is_file() {
        target.parent().unwrap_or(Path::new("."))
    } else {
        target
    };
    let start = if start.as_os_str().is_empty() {
        Path::new(".")
    } else {
        start
    };
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());

    for dir in start.ancestors() {
        let found = CONFIG_FILE_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file());
        if found.is_some() {
            return found;
        }
        if dir.join(".git").exists() {
            debug!("Stopped config search at repository root {}", dir.display());
            break;
        }
    }
    None
}
