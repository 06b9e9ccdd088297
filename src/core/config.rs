//! Configuration management.
//!
//! Reads the optional `config.toml`, merges it with command-line overrides and
//! resolves the result into an immutable [`Settings`] value that every
//! component receives at construction.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::core::constants;
use crate::error::{ConfigError, Result};

/// On-disk configuration (`~/.config/passkeep/config.toml`).
///
/// Every field is optional; missing values fall back to detected defaults.
#[derive(Debug, Default, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ConfigFile {
    /// Password store root directory.
    pub store: Option<PathBuf>,
    /// Path to the gpg executable.
    pub gpg: Option<PathBuf>,
    /// Path to the git executable.
    pub git: Option<PathBuf>,
    /// Commit changes to git. Detected from `<store>/.git` when unset.
    pub use_git: Option<bool>,
    /// A WebDAV backend syncs the store instead of git commits.
    pub use_webdav: bool,
    /// Pull before re-encrypting.
    pub auto_pull: bool,
    /// Push after re-encrypting.
    pub auto_push: bool,
    /// Stage a freshly created `.gpg-id` on init.
    pub add_gpg_id: Option<bool>,
}

impl ConfigFile {
    /// Default config path inside the platform config directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_FILE))
    }

    /// Load a config file. A missing file yields the empty configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadFile` or `ConfigError::Parse` when the file
    /// exists but cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }
        debug!(path = %path.display(), "loading config");
        let contents = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        let config: Self = toml::from_str(&contents).map_err(ConfigError::Parse)?;
        Ok(config)
    }
}

/// Values that take precedence over the config file (CLI flags and their
/// environment variables).
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub store: Option<PathBuf>,
    pub gpg: Option<PathBuf>,
    pub git: Option<PathBuf>,
    pub no_git: bool,
    pub pull: bool,
    pub push: bool,
}

/// Resolved, immutable settings shared by all components.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Password store root.
    pub store: PathBuf,
    /// gpg executable; `None` when not found.
    pub gpg: Option<PathBuf>,
    /// git executable; `None` when not found.
    pub git: Option<PathBuf>,
    pub use_git: bool,
    pub use_webdav: bool,
    pub auto_pull: bool,
    pub auto_push: bool,
    pub add_gpg_id: bool,
}

impl Settings {
    /// Settings for `store` with git disabled and gpg looked up on `PATH`.
    pub fn new(store: impl Into<PathBuf>) -> Self {
        Self {
            store: store.into(),
            gpg: find_gpg(),
            git: None,
            use_git: false,
            use_webdav: false,
            auto_pull: false,
            auto_push: false,
            add_gpg_id: true,
        }
    }

    /// Resolve settings from a config file and overrides.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::NoHomeDir` when no store is configured and the
    /// home directory cannot be determined.
    pub fn resolve(file: ConfigFile, overrides: Overrides) -> Result<Self> {
        let store = match overrides.store.or(file.store) {
            Some(store) => store,
            None => dirs::home_dir()
                .ok_or(ConfigError::NoHomeDir)?
                .join(constants::DEFAULT_STORE_DIR),
        };

        let gpg = overrides.gpg.or(file.gpg).or_else(find_gpg);
        let git = overrides
            .git
            .or(file.git)
            .or_else(|| which::which("git").ok());

        let use_git = !overrides.no_git
            && file.use_git.unwrap_or_else(|| store.join(".git").exists());

        let settings = Self {
            store,
            gpg,
            git,
            use_git,
            use_webdav: file.use_webdav,
            auto_pull: overrides.pull || file.auto_pull,
            auto_push: overrides.push || file.auto_push,
            add_gpg_id: file.add_gpg_id.unwrap_or(true),
        };
        debug!(
            store = %settings.store.display(),
            use_git = settings.use_git,
            auto_pull = settings.auto_pull,
            auto_push = settings.auto_push,
            "settings resolved"
        );
        Ok(settings)
    }

    /// Git is switched on and an executable is available.
    pub fn git_enabled(&self) -> bool {
        self.use_git && self.git.is_some()
    }

    /// Mutations are recorded as git commits (git enabled and no WebDAV
    /// backend superseding it).
    pub fn commits_enabled(&self) -> bool {
        self.git_enabled() && !self.use_webdav
    }

    /// The gpg executable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ToolNotFound` when gpg is not configured.
    pub fn gpg(&self) -> Result<&Path> {
        self.gpg
            .as_deref()
            .ok_or_else(|| ConfigError::ToolNotFound("gpg").into())
    }

    /// The git executable.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ToolNotFound` when git is not configured.
    pub fn git(&self) -> Result<&Path> {
        self.git
            .as_deref()
            .ok_or_else(|| ConfigError::ToolNotFound("git").into())
    }
}

fn find_gpg() -> Option<PathBuf> {
    which::which("gpg").or_else(|_| which::which("gpg2")).ok()
}
