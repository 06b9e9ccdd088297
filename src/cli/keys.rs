//! Keys command - list keyring entries usable as recipients.

use crate::cli::{output, Session};
use crate::core::keys::KeyRing;
use crate::error::Result;

/// Print public keys, marking those with a secret key.
pub fn execute(session: &Session) -> Result<()> {
    let users = KeyRing::new(&session.settings, &session.runner).users()?;
    if users.is_empty() {
        output::dimmed("no keys in keyring");
        return Ok(());
    }

    output::section(&format!("{} keys", users.len()));
    for user in &users {
        let marker = if user.have_secret { "sec" } else { "pub" };
        output::list_item(&format!("{} {}  {}", marker, output::key(&user.key_id), user.name));
    }
    Ok(())
}
