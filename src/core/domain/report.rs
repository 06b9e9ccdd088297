//! Re-encryption walk results.

use serde::Serialize;

use crate::core::types::{EntryName, RecipientId};

/// A command that ran but exited non-zero.
///
/// Advisory only: the walk carries on and the next walk re-inspects the
/// entry anyway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Advisory {
    pub command: String,
    pub exit_code: i32,
}

/// An entry whose actual recipients differ from its declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Drift {
    pub entry: EntryName,
    pub actual: Vec<RecipientId>,
    pub declared: Vec<RecipientId>,
}

/// Outcome of a re-encryption walk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WalkReport {
    /// Entries inspected.
    pub scanned: usize,
    /// Entries already matching their declaration.
    pub converged: usize,
    /// Entries re-encrypted, in walk order.
    pub reencrypted: Vec<EntryName>,
    /// Entries that could not be decrypted and were left untouched.
    pub failed: Vec<EntryName>,
    /// Non-zero exits of gpg/git calls that were tolerated.
    pub advisories: Vec<Advisory>,
    pub pulled: bool,
    pub pushed: bool,
}

impl WalkReport {
    /// Nothing had to change.
    pub fn is_converged(&self) -> bool {
        self.reencrypted.is_empty() && self.failed.is_empty()
    }
}
