//! Command-line interface.

pub mod completions;
pub mod entries;
pub mod git;
pub mod init;
pub mod keys;
pub mod output;
pub mod reencrypt;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing::{debug, warn};

use crate::core::config::{ConfigFile, Overrides, Settings};
use crate::core::exec::{Completion, Completions, SystemRunner};
use crate::core::types::JobId;
use crate::error::{ConfigError, Result};

/// Passkeep - a password store that keeps entries encrypted for their declared recipients.
#[derive(Parser)]
#[command(
    name = "passkeep",
    about = "A pass-compatible password store with recipient-drift re-encryption",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(flatten)]
    pub store: StoreArgs,
}

/// Store selection and tool overrides shared by every command.
#[derive(Args, Debug, Default, Clone)]
pub struct StoreArgs {
    /// Password store directory
    #[arg(long, global = true, env = "PASSWORD_STORE_DIR")]
    pub store: Option<PathBuf>,

    /// gpg executable
    #[arg(long, global = true, env = "PASSKEEP_GPG")]
    pub gpg: Option<PathBuf>,

    /// git executable
    #[arg(long = "git-bin", global = true, env = "PASSKEEP_GIT")]
    pub git: Option<PathBuf>,

    /// Config file
    #[arg(long, global = true, env = "PASSKEEP_CONFIG")]
    pub config: Option<PathBuf>,

    /// Do not record changes in git
    #[arg(long, global = true)]
    pub no_git: bool,

    /// git pull before re-encrypting
    #[arg(long, global = true)]
    pub pull: bool,

    /// git push after re-encrypting
    #[arg(long, global = true)]
    pub push: bool,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Declare the recipients of a store directory and re-encrypt its entries
    Init {
        /// Key ids (long id, fingerprint or suffix) to declare
        #[arg(required = true)]
        keys: Vec<String>,
        /// Directory inside the store (defaults to the store root)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Insert a new entry, reading the secret from a prompt or stdin
    Insert {
        /// Entry name (e.g., web/github)
        name: String,
        /// Overwrite an existing entry
        #[arg(short, long)]
        force: bool,
    },

    /// Decrypt and print an entry
    Show {
        /// Entry name
        name: String,
    },

    /// Remove an entry or directory
    Rm {
        /// Entry or directory name
        name: String,
        /// Remove a directory and everything beneath it
        #[arg(short, long)]
        recursive: bool,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },

    /// Re-encrypt entries whose recipients differ from their .gpg-id
    Reencrypt {
        /// Directory inside the store (defaults to the store root)
        dir: Option<PathBuf>,
        /// Only report drifted entries
        #[arg(long)]
        dry_run: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// List entries
    Ls {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run git operations on the store
    Git {
        #[command(subcommand)]
        action: GitAction,
    },

    /// List keys available as recipients
    Keys,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Supported shells for completions.
#[derive(clap::ValueEnum, Clone, Debug)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

/// Git subcommands.
#[derive(Subcommand)]
pub enum GitAction {
    /// Create a git repository in the store
    Init,
    /// Fetch and merge remote changes
    Pull,
    /// Push local commits
    Push,
}

/// Resolved settings plus a running command runner.
pub struct Session {
    pub settings: Settings,
    pub runner: SystemRunner,
    completions: Completions,
}

impl Session {
    /// Resolve settings and start the runner.
    ///
    /// # Errors
    ///
    /// Returns config errors, or `ExecError::Runtime` if the runner fails to start.
    pub fn open(args: &StoreArgs) -> Result<Self> {
        let settings = resolve_settings(args)?;
        let (runner, completions) = SystemRunner::start()?;
        Ok(Self {
            settings,
            runner,
            completions,
        })
    }

    /// Fail unless the store directory exists.
    pub fn require_store(&self) -> Result<()> {
        if self.settings.store.is_dir() {
            Ok(())
        } else {
            Err(ConfigError::StoreNotFound(self.settings.store.clone()).into())
        }
    }

    /// Wait for `jobs`, warning about each one that did not exit cleanly.
    ///
    /// Returns the completions in job order.
    pub fn settle(&mut self, jobs: &[JobId]) -> Vec<Completion> {
        let completions = self.completions.wait_all(jobs);
        for completion in &completions {
            report_completion(completion);
        }
        completions
    }
}

fn report_completion(completion: &Completion) {
    match &completion.result {
        Ok(out) if out.success() => {
            debug!(id = completion.id, kind = %completion.kind, "job finished");
        }
        Ok(out) => {
            warn!(id = completion.id, kind = %completion.kind, exit_code = out.exit_code, "job failed");
            output::warn(&format!(
                "{} exited with status {}",
                completion.kind, out.exit_code
            ));
            let stderr = out.stderr_text();
            let stderr = stderr.trim();
            if !stderr.is_empty() {
                output::detail(stderr);
            }
        }
        Err(e) => {
            output::warn(&format!("{} could not run: {}", completion.kind, e));
        }
    }
}

/// Merge the config file with command-line overrides.
pub fn resolve_settings(args: &StoreArgs) -> Result<Settings> {
    let file = match args.config.clone().or_else(ConfigFile::default_path) {
        Some(path) => ConfigFile::load(&path)?,
        None => ConfigFile::default(),
    };
    let overrides = Overrides {
        store: args.store.clone(),
        gpg: args.gpg.clone(),
        git: args.git.clone(),
        no_git: args.no_git,
        pull: args.pull,
        push: args.push,
    };
    Settings::resolve(file, overrides)
}

/// Execute a command.
pub fn execute(command: Command, store: &StoreArgs) -> Result<()> {
    match command {
        Command::Init { keys, path } => {
            init::execute(&mut Session::open(store)?, &keys, path.as_deref())
        }
        Command::Insert { name, force } => {
            entries::insert(&mut Session::open(store)?, &name, force)
        }
        Command::Show { name } => entries::show(&mut Session::open(store)?, &name),
        Command::Rm {
            name,
            recursive,
            yes,
        } => entries::rm(&mut Session::open(store)?, &name, recursive, yes),
        Command::Reencrypt { dir, dry_run, json } => {
            reencrypt::execute(&Session::open(store)?, dir.as_deref(), dry_run, json)
        }
        Command::Ls { json } => entries::list(&Session::open(store)?, json),
        Command::Git { action } => git::execute(&mut Session::open(store)?, action),
        Command::Keys => keys::execute(&Session::open(store)?),
        Command::Completions { shell } => completions::execute(shell),
    }
}
