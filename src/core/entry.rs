//! Entry lifecycle.
//!
//! Create, overwrite, show and delete entries, and initialize a store
//! directory with a new `.gpg-id`. Single-shot operations are dispatched
//! asynchronously; callers follow their job ids on the completion channel.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};

use crate::core::acl::Resolver;
use crate::core::config::Settings;
use crate::core::constants;
use crate::core::domain::{UserInfo, WalkReport};
use crate::core::exec::{Invocation, JobKind, Output, Runner};
use crate::core::git::{self, VersionSync};
use crate::core::gpg;
use crate::core::inspect::GpgInspector;
use crate::core::reencrypt::Reencryptor;
use crate::core::store::Store;
use crate::core::types::JobId;
use crate::error::{Error, Result};

/// Result of initializing a store directory.
#[derive(Debug)]
pub struct InitOutcome {
    /// The `.gpg-id` file written.
    pub declaration: PathBuf,
    /// Dispatched git jobs (stage and commit of the declaration).
    pub jobs: Vec<JobId>,
    /// Re-encryption of the existing entries beneath the directory.
    pub walk: WalkReport,
}

/// Direct secret lifecycle operations.
pub struct EntryMutator<'a> {
    settings: &'a Settings,
    runner: &'a dyn Runner,
    store: Store,
    resolver: Resolver,
}

impl<'a> EntryMutator<'a> {
    pub fn new(settings: &'a Settings, runner: &'a dyn Runner) -> Self {
        Self {
            settings,
            runner,
            store: Store::new(&settings.store),
            resolver: Resolver::new(&settings.store),
        }
    }

    fn git(&self) -> VersionSync<'a> {
        VersionSync::new(self.settings, self.runner)
    }

    /// Encrypt `plaintext` into entry `name` for its declared recipients.
    ///
    /// # Returns
    ///
    /// Ids of the dispatched jobs: encryption, then staging (new entries
    /// only) and commit when commits are enabled.
    ///
    /// # Errors
    ///
    /// Returns `Error::AccessControlMissing` before anything is spawned when
    /// no usable `.gpg-id` covers the entry.
    pub fn create(&self, name: &str, plaintext: &[u8], overwrite: bool) -> Result<Vec<JobId>> {
        let path = self.store.ciphertext_path(name)?;
        let recipients = self.resolver.resolve(&path);
        if recipients.is_empty() {
            error!(entry = %name, "cannot edit, no usable .gpg-id");
            return Err(Error::AccessControlMissing { path });
        }
        let gpg = self.settings.gpg()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        debug!(entry = %name, overwrite, recipients = %recipients, "encrypting entry");
        let invocation = Invocation::new(
            gpg,
            gpg::encrypt_args(&path, &recipients.sorted(), overwrite),
        )
        .input(plaintext)
        .current_dir(&self.settings.store);
        let mut jobs = vec![self.runner.dispatch(JobKind::Insert, invocation)?];

        if self.settings.commits_enabled() {
            let git = self.git();
            if !overwrite {
                jobs.push(git.add(&path)?);
            }
            let entry = self.store.entry_name(&path);
            let message = if overwrite {
                git::edit_message(&entry)
            } else {
                git::add_message(&entry)
            };
            jobs.push(git.commit(&path, &message)?);
        }
        Ok(jobs)
    }

    /// Decrypt entry `name`; the plaintext arrives as the job's stdout.
    pub fn show(&self, name: &str) -> Result<JobId> {
        let invocation = self.show_invocation(name)?;
        self.runner.dispatch(JobKind::Show, invocation)
    }

    /// Decrypt entry `name` and wait for the result.
    ///
    /// A non-zero exit is returned as part of the output, not as an error.
    pub fn show_blocking(&self, name: &str) -> Result<Output> {
        let invocation = self.show_invocation(name)?;
        self.runner.run_blocking(invocation)
    }

    fn show_invocation(&self, name: &str) -> Result<Invocation> {
        let path = self.store.ciphertext_path(name)?;
        Ok(Invocation::new(self.settings.gpg()?, gpg::decrypt_args(&path))
            .current_dir(&self.settings.store))
    }

    /// Delete entry `name`, or the directory `name` with everything in it.
    ///
    /// With git enabled the removal goes through `git rm` and is committed;
    /// otherwise the files are removed directly.
    pub fn delete(&self, name: &str, is_dir: bool) -> Result<Vec<JobId>> {
        let target = if is_dir {
            self.store.dir_path(name)?
        } else {
            self.store.ciphertext_path(name)?
        };

        if self.settings.git_enabled() {
            let git = self.git();
            let entry = self.store.entry_name(&target);
            let jobs = vec![
                git.remove(&target, is_dir)?,
                git.commit(&target, &git::remove_message(&entry))?,
            ];
            return Ok(jobs);
        }

        let removed = if is_dir {
            fs::remove_dir_all(&target)
        } else {
            fs::remove_file(&target)
        };
        match removed {
            Ok(()) => info!(target = %target.display(), "removed"),
            Err(e) => warn!(target = %target.display(), error = %e, "remove failed"),
        }
        Ok(Vec::new())
    }

    /// Declare `users` as recipients of `dir` and converge its entries.
    ///
    /// The declaration lists every enabled user. It is written before the
    /// secret-key check, so a failed check leaves it on disk uncommitted.
    ///
    /// # Errors
    ///
    /// Returns `Error::DeclarationWrite` if `.gpg-id` cannot be written and
    /// `Error::NoSecretKeyAvailable` if no enabled user has a secret key.
    pub fn initialize_store(&self, dir: &Path, users: &[UserInfo]) -> Result<InitOutcome> {
        let dir = self.store.resolve_dir(dir);
        let declaration = dir.join(constants::GPG_ID_FILE);
        let stage = self.settings.add_gpg_id && !declaration.is_file();

        let contents: String = users
            .iter()
            .filter(|u| u.enabled)
            .map(|u| format!("{}\n", u.key_id))
            .collect();
        fs::create_dir_all(&dir)
            .and_then(|()| fs::write(&declaration, contents))
            .map_err(|source| Error::DeclarationWrite {
                path: declaration.clone(),
                source,
            })?;
        info!(declaration = %declaration.display(), "wrote .gpg-id");

        if !users.iter().any(|u| u.enabled && u.have_secret) {
            error!("none of the selected keys have a secret key available");
            return Err(Error::NoSecretKeyAvailable);
        }

        let mut jobs = Vec::new();
        if self.settings.commits_enabled() {
            let git = self.git();
            if stage {
                jobs.push(git.add(&declaration)?);
            }
            let message = git::added_message(&self.store.entry_name(&declaration));
            jobs.push(git.commit(&declaration, &message)?);
        }

        let inspector = GpgInspector::new(self.settings, self.runner);
        let walk = Reencryptor::new(self.settings, self.runner, &inspector).run(&dir)?;

        Ok(InitOutcome {
            declaration,
            jobs,
            walk,
        })
    }
}
