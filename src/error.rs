//! Error types.
//!
//! A top-level [`Error`] wraps one enum per concern so callers can match on
//! the failure class while `?` keeps working across module boundaries.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error for every passkeep operation.
#[derive(Error, Debug)]
pub enum Error {
    /// No usable `.gpg-id` declaration covers the target path.
    #[error("could not read encryption key to use, .gpg-id file missing or invalid for {}", path.display())]
    AccessControlMissing { path: PathBuf },

    /// Store initialization selected no key with a secret counterpart.
    #[error("none of the selected keys have a secret key available; you will not be able to decrypt newly added passwords")]
    NoSecretKeyAvailable,

    /// Entry name is not a plain store-relative path.
    #[error("invalid entry '{name}': {reason}")]
    InvalidEntry { name: String, reason: &'static str },

    #[error("{0} is not in the password store")]
    EntryNotFound(String),

    /// A key selector is empty, too short, or matches several keys.
    #[error("invalid key id '{selector}': {reason}")]
    InvalidKeySelector { selector: String, reason: String },

    /// The `.gpg-id` file could not be opened for writing.
    #[error("failed to open {} for writing: {source}", path.display())]
    DeclarationWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Exec(#[from] ExecError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to encode JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Settings and configuration file errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required external program is not configured and not on `PATH`.
    #[error("{0} executable not found; install it or set its path in the config")]
    ToolNotFound(&'static str),

    #[error("password store not found at {}", .0.display())]
    StoreNotFound(PathBuf),

    #[error("unable to determine home directory")]
    NoHomeDir,
}

/// External process execution errors.
#[derive(Error, Debug)]
pub enum ExecError {
    #[error("failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write to child stdin: {0}")]
    Stdin(#[source] std::io::Error),

    #[error("failed to wait for child process: {0}")]
    Wait(#[source] std::io::Error),

    #[error("failed to start command runtime: {0}")]
    Runtime(#[source] std::io::Error),

    /// The runner's worker has shut down and can no longer accept jobs.
    #[error("command runner is closed")]
    RunnerClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
