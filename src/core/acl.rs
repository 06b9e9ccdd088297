//! Access-control resolution.
//!
//! Every directory may carry a `.gpg-id` declaration listing the recipients
//! of the entries beneath it. Directories without one inherit the nearest
//! ancestor's declaration, up to the store root.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::core::constants;
use crate::core::domain::Recipients;

/// Resolves the declared recipients of an entry.
#[derive(Debug, Clone)]
pub struct Resolver {
    root: PathBuf,
}

impl Resolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Declared recipients for the entry at `ciphertext`, in file order.
    ///
    /// Searches the entry's directory and its ancestors, never above the
    /// store root. The nearest declaration wins even when it lists no
    /// usable identifiers, in which case the result is empty and the caller
    /// must refuse to write.
    pub fn resolve(&self, ciphertext: &Path) -> Recipients {
        match self.declaration_for(ciphertext) {
            Some(path) => read_declaration(&path),
            None => {
                debug!(entry = %ciphertext.display(), "no .gpg-id found");
                Recipients::default()
            }
        }
    }

    /// Path of the declaration governing `ciphertext`, if any.
    pub fn declaration_for(&self, ciphertext: &Path) -> Option<PathBuf> {
        let mut dir = ciphertext.parent();
        while let Some(current) = dir {
            let candidate = current.join(constants::GPG_ID_FILE);
            if candidate.is_file() {
                return Some(candidate);
            }
            if current == self.root || !current.starts_with(&self.root) {
                break;
            }
            dir = current.parent();
        }
        None
    }
}

fn read_declaration(path: &Path) -> Recipients {
    match fs::read_to_string(path) {
        Ok(contents) => {
            let recipients = Recipients::parse(&contents);
            debug!(
                declaration = %path.display(),
                recipients = recipients.len(),
                "resolved recipients"
            );
            recipients
        }
        Err(e) => {
            warn!(declaration = %path.display(), error = %e, "unreadable .gpg-id");
            Recipients::default()
        }
    }
}
