//! Init command - declare the recipients of a store directory.

use std::path::Path;

use tracing::info;

use crate::cli::{output, reencrypt, Session};
use crate::core::entry::EntryMutator;
use crate::core::keys::KeyRing;
use crate::error::Result;

/// Write `.gpg-id` for `keys` and converge the entries beneath it.
pub fn execute(session: &mut Session, keys: &[String], path: Option<&Path>) -> Result<()> {
    let dir = path.unwrap_or_else(|| Path::new(""));
    let users = KeyRing::new(&session.settings, &session.runner).candidates(keys)?;
    for user in users.iter().filter(|u| u.enabled && !u.have_secret) {
        output::warn(&format!("no secret key for {}", output::key(&user.key_id)));
    }

    let outcome =
        EntryMutator::new(&session.settings, &session.runner).initialize_store(dir, &users)?;
    session.settle(&outcome.jobs);

    info!(declaration = %outcome.declaration.display(), "store initialized");
    output::success(&format!(
        "declared {} recipients in {}",
        users.iter().filter(|u| u.enabled).count(),
        output::path(outcome.declaration.display())
    ));
    if outcome.walk.scanned > 0 {
        reencrypt::print_report(&outcome.walk);
    }
    Ok(())
}
