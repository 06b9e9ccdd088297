//! Version history.
//!
//! Thin sequencing layer over the runner for the git operations the store
//! needs. Async variants return the dispatched job id; blocking variants are
//! used by the re-encryption walk and never fail on a non-zero exit.

use std::path::Path;

use tracing::debug;

use crate::core::config::Settings;
use crate::core::constants::COMMIT_TOOL;
use crate::core::exec::{run_lenient, Invocation, JobKind, Output, Runner};
use crate::core::types::JobId;
use crate::error::Result;

/// Commit message for a newly created entry.
///
/// The leading quotation mark is part of the historical message format and
/// is kept so existing histories stay uniform.
pub fn add_message(path: &str) -> String {
    format!("\"Add for {} using {}.", path, COMMIT_TOOL)
}

/// Commit message for an overwritten or re-encrypted entry.
pub fn edit_message(path: &str) -> String {
    format!("Edit for {} using {}.", path, COMMIT_TOOL)
}

/// Commit message for a removed entry or directory.
pub fn remove_message(path: &str) -> String {
    format!("Remove for {} using {}.", path, COMMIT_TOOL)
}

/// Commit message for a new access-control declaration.
pub fn added_message(path: &str) -> String {
    format!("Added {} using {}.", path, COMMIT_TOOL)
}

/// git operations against the store's working copy.
pub struct VersionSync<'a> {
    settings: &'a Settings,
    runner: &'a dyn Runner,
}

impl<'a> VersionSync<'a> {
    pub fn new(settings: &'a Settings, runner: &'a dyn Runner) -> Self {
        Self { settings, runner }
    }

    fn invocation<I, S>(&self, args: I) -> Result<Invocation>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Ok(Invocation::new(self.settings.git()?, args).current_dir(&self.settings.store))
    }

    fn dispatch<I, S>(&self, kind: JobKind, args: I) -> Result<JobId>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invocation = self.invocation(args)?;
        debug!(%kind, command = %invocation.command_line(), "git");
        self.runner.dispatch(kind, invocation)
    }

    fn blocking<I, S>(&self, args: I) -> Result<Output>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let invocation = self.invocation(args)?;
        debug!(command = %invocation.command_line(), "git (blocking)");
        Ok(run_lenient(self.runner, invocation))
    }

    /// `git init <store>`.
    pub fn init(&self) -> Result<JobId> {
        let store = self.settings.store.display().to_string();
        self.dispatch(JobKind::GitInit, ["init".to_string(), store])
    }

    /// `git pull`.
    pub fn pull(&self) -> Result<JobId> {
        self.dispatch(JobKind::GitPull, ["pull"])
    }

    /// `git pull`, waiting for it to finish.
    pub fn pull_blocking(&self) -> Result<Output> {
        self.blocking(["pull"])
    }

    /// `git push`.
    pub fn push(&self) -> Result<JobId> {
        self.dispatch(JobKind::GitPush, ["push"])
    }

    /// `git push`, waiting for it to finish.
    pub fn push_blocking(&self) -> Result<Output> {
        self.blocking(["push"])
    }

    /// `git add <path>`.
    pub fn add(&self, path: &Path) -> Result<JobId> {
        self.dispatch(JobKind::GitAdd, ["add".to_string(), path_arg(path)])
    }

    /// `git add <path>`, waiting for it to finish.
    pub fn add_blocking(&self, path: &Path) -> Result<Output> {
        self.blocking(["add".to_string(), path_arg(path)])
    }

    /// `git commit -m <message> -- <path>`.
    pub fn commit(&self, path: &Path, message: &str) -> Result<JobId> {
        self.dispatch(
            JobKind::GitCommit,
            [
                "commit".to_string(),
                "-m".to_string(),
                message.to_string(),
                "--".to_string(),
                path_arg(path),
            ],
        )
    }

    /// `git commit <path> -m <message>`, waiting for it to finish.
    pub fn commit_blocking(&self, path: &Path, message: &str) -> Result<Output> {
        self.blocking([
            "commit".to_string(),
            path_arg(path),
            "-m".to_string(),
            message.to_string(),
        ])
    }

    /// `git rm -f <path>` or `git rm -rf <path>`.
    pub fn remove(&self, path: &Path, recursive: bool) -> Result<JobId> {
        let flag = if recursive { "-rf" } else { "-f" };
        self.dispatch(
            JobKind::GitRm,
            ["rm".to_string(), flag.to_string(), path_arg(path)],
        )
    }
}

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}
