//! Re-encryption engine.
//!
//! Walks a subtree of the store, compares the recipients each entry is
//! actually encrypted for with its declared recipients, and re-encrypts the
//! entries that drifted. Every step is a blocking call and entries are
//! handled strictly one after another: decrypt, encrypt and commit of one
//! entry finish before the next entry is inspected.
//!
//! Failure policy:
//! - an entry that cannot be decrypted is recorded and skipped
//! - a missing declaration at encryption time aborts the whole walk
//! - non-zero exits of gpg/git are recorded as advisories only

use std::path::{Path, PathBuf};

use tracing::{debug, error, info, warn};
use zeroize::Zeroizing;

use crate::core::acl::Resolver;
use crate::core::config::Settings;
use crate::core::constants;
use crate::core::domain::{Advisory, Drift, WalkReport};
use crate::core::exec::{run_lenient, Invocation, Output, Runner};
use crate::core::git::{self, VersionSync};
use crate::core::gpg;
use crate::core::inspect::RecipientInspector;
use crate::core::store::Store;
use crate::core::types::RecipientId;
use crate::error::{Error, Result};

/// Drives drift detection and correction over a store subtree.
pub struct Reencryptor<'a> {
    settings: &'a Settings,
    runner: &'a dyn Runner,
    inspector: &'a dyn RecipientInspector,
    store: Store,
    resolver: Resolver,
}

impl<'a> Reencryptor<'a> {
    pub fn new(
        settings: &'a Settings,
        runner: &'a dyn Runner,
        inspector: &'a dyn RecipientInspector,
    ) -> Self {
        Self {
            settings,
            runner,
            inspector,
            store: Store::new(&settings.store),
            resolver: Resolver::new(&settings.store),
        }
    }

    /// Re-encrypt every drifted entry beneath `dir`.
    ///
    /// Pulls first and pushes afterwards when configured; neither outcome
    /// stops the walk, not even a git executable that cannot be found.
    ///
    /// # Errors
    ///
    /// Returns `Error::AccessControlMissing` when a drifted entry has no
    /// usable declaration, `ConfigError::ToolNotFound` when gpg is missing,
    /// or `Error::Io` if the subtree cannot be listed.
    pub fn run(&self, dir: &Path) -> Result<WalkReport> {
        let dir = self.store.resolve_dir(dir);
        self.settings.gpg()?;
        info!(dir = %dir.display(), "re-encrypting");

        let git = VersionSync::new(self.settings, self.runner);
        let mut report = WalkReport::default();

        if self.settings.auto_pull {
            debug!("updating password store before re-encrypting");
            let output = sync_output("git pull", git.pull_blocking());
            note(&mut report, "git pull", &output);
            report.pulled = true;
        }

        let (scanned, converged) = self.walk(&dir, |path, _actual, _declared| {
            self.reencrypt_entry(path, &git, &mut report)
        })?;
        report.scanned = scanned;
        report.converged = converged;

        if self.settings.auto_push {
            debug!("updating password store after re-encrypting");
            let output = sync_output("git push", git.push_blocking());
            note(&mut report, "git push", &output);
            report.pushed = true;
        }

        info!(
            scanned = report.scanned,
            reencrypted = report.reencrypted.len(),
            failed = report.failed.len(),
            advisories = report.advisories.len(),
            "re-encryption finished"
        );
        Ok(report)
    }

    /// Entries beneath `dir` whose actual recipients differ from their
    /// declaration. Nothing is decrypted or written.
    pub fn drift(&self, dir: &Path) -> Result<Vec<Drift>> {
        let dir = self.store.resolve_dir(dir);
        self.settings.gpg()?;
        let mut drifted = Vec::new();
        self.walk(&dir, |path, actual, declared| {
            drifted.push(Drift {
                entry: self.store.entry_name(path),
                actual,
                declared: declared.to_vec(),
            });
            Ok(())
        })?;
        Ok(drifted)
    }

    /// Visit entries in directory-grouped order and call `on_drift` for each
    /// mismatch. Returns (scanned, converged).
    fn walk<F>(&self, dir: &Path, mut on_drift: F) -> Result<(usize, usize)>
    where
        F: FnMut(&Path, Vec<RecipientId>, &[RecipientId]) -> Result<()>,
    {
        let entries = self.store.entries(dir)?;
        let mut current_dir: Option<PathBuf> = None;
        let mut declared: Vec<RecipientId> = Vec::new();
        let mut converged = 0;

        for path in &entries {
            let parent = path.parent().map(Path::to_path_buf);
            if parent != current_dir {
                declared = self.resolver.resolve(path).sorted();
                current_dir = parent;
            }

            let mut actual = self.inspector.actual_recipients(path);
            actual.sort();
            if actual == declared {
                converged += 1;
                continue;
            }

            debug!(
                entry = %self.store.entry_name(path),
                ?actual,
                ?declared,
                "recipients drifted"
            );
            on_drift(path, actual, &declared)?;
        }
        Ok((entries.len(), converged))
    }

    fn reencrypt_entry(&self, path: &Path, git: &VersionSync<'_>, report: &mut WalkReport) -> Result<()> {
        let name = self.store.entry_name(path);
        let gpg = self.settings.gpg()?;

        let decrypted = run_lenient(
            self.runner,
            Invocation::new(gpg, gpg::decrypt_args(path)).current_dir(&self.settings.store),
        );
        let Some(plaintext) = usable_plaintext(decrypted) else {
            warn!(entry = %name, "decrypt error on re-encrypt, leaving entry untouched");
            report.failed.push(name);
            return Ok(());
        };

        let recipients = self.resolver.resolve(path);
        if recipients.is_empty() {
            error!(entry = %name, "no usable .gpg-id, aborting re-encryption");
            return Err(Error::AccessControlMissing {
                path: path.to_path_buf(),
            });
        }

        debug!(entry = %name, recipients = %recipients, "re-encrypting entry");
        let encrypt = Invocation::new(gpg, gpg::encrypt_args(path, &recipients.sorted(), true))
            .input(plaintext.as_slice())
            .current_dir(&self.settings.store);
        let output = run_lenient(self.runner, encrypt);
        note(report, "gpg --encrypt", &output);

        if self.settings.commits_enabled() {
            let output = git.add_blocking(path)?;
            note(report, "git add", &output);
            let output = git.commit_blocking(path, &git::edit_message(&name))?;
            note(report, "git commit", &output);
        }

        report.reencrypted.push(name);
        Ok(())
    }
}

/// Decrypted bytes fit for re-encryption, normalized to end in a newline.
///
/// Empty output and the decryption-failed placeholder both mean failure.
/// The bytes are never decoded, so secrets in any encoding survive.
fn usable_plaintext(output: Output) -> Option<Zeroizing<Vec<u8>>> {
    let mut plaintext = output.stdout;
    if plaintext.is_empty() || plaintext.as_slice() == constants::DECRYPT_FAILED.as_bytes() {
        return None;
    }
    if plaintext.last() != Some(&b'\n') {
        plaintext.push(b'\n');
    }
    Some(plaintext)
}

/// Outcome of a pull or push; an error (git missing, spawn failure) becomes
/// exit code `-1` so it is reported like any other failed sync.
fn sync_output(command: &str, result: Result<Output>) -> Output {
    result.unwrap_or_else(|e| {
        warn!(command, error = %e, "sync could not be run");
        Output {
            exit_code: -1,
            stderr: e.to_string().into_bytes(),
            ..Output::default()
        }
    })
}

fn note(report: &mut WalkReport, command: &str, output: &Output) {
    if !output.success() {
        warn!(command, exit_code = output.exit_code, "command exited non-zero");
        report.advisories.push(Advisory {
            command: command.to_string(),
            exit_code: output.exit_code,
        });
    }
}
