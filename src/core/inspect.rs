//! Recipient inspection.
//!
//! Determines which keys a ciphertext was actually encrypted for by reading
//! gpg's verbose `--list-only` diagnostics. The diagnostics are free text,
//! so parsing is a heuristic: a line counts when its fifth whitespace
//! separated field is a long key id (16 characters). Lines in any other
//! shape are ignored without error.

use std::path::Path;

use tracing::{trace, warn};

use crate::core::config::Settings;
use crate::core::constants;
use crate::core::exec::{run_lenient, Invocation, Runner};
use crate::core::gpg;
use crate::core::types::RecipientId;

/// Source of the recipients a ciphertext is encrypted for.
pub trait RecipientInspector {
    /// Sorted recipient ids of `ciphertext`. Unknown or unreadable input
    /// yields an empty list.
    fn actual_recipients(&self, ciphertext: &Path) -> Vec<RecipientId>;
}

/// Inspector running `gpg --list-only`.
pub struct GpgInspector<'a> {
    settings: &'a Settings,
    runner: &'a dyn Runner,
}

impl<'a> GpgInspector<'a> {
    pub fn new(settings: &'a Settings, runner: &'a dyn Runner) -> Self {
        Self { settings, runner }
    }
}

impl RecipientInspector for GpgInspector<'_> {
    fn actual_recipients(&self, ciphertext: &Path) -> Vec<RecipientId> {
        let gpg = match self.settings.gpg() {
            Ok(gpg) => gpg,
            Err(e) => {
                warn!(error = %e, "cannot inspect recipients");
                return Vec::new();
            }
        };
        let invocation =
            Invocation::new(gpg, gpg::inspect_args(ciphertext)).current_dir(&self.settings.store);
        // --list-only exits non-zero when no secret key matches; the listing
        // is still complete.
        let output = run_lenient(self.runner, invocation);
        let recipients = parse_recipients(&output.combined());
        trace!(entry = %ciphertext.display(), ?recipients, "inspected recipients");
        recipients
    }
}

/// Extract recipient key ids from gpg diagnostic text, sorted.
pub fn parse_recipients(text: &str) -> Vec<RecipientId> {
    let mut ids: Vec<RecipientId> = text
        .lines()
        .filter_map(|line| line.split_whitespace().nth(4))
        .filter(|field| field.chars().count() == constants::LONG_KEY_ID_LEN)
        .map(str::to_string)
        .collect();
    ids.sort();
    ids
}
