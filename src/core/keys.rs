//! Keyring listing.
//!
//! Reads gpg's machine-readable key listing to offer recipients when a store
//! directory is initialized.

use tracing::{debug, warn};

use crate::core::config::Settings;
use crate::core::domain::UserInfo;
use crate::core::exec::{Invocation, Runner};
use crate::core::gpg;
use crate::core::types::RecipientId;
use crate::error::{Error, Result};

/// Shortest selector accepted; shorter ids collide too easily.
const MIN_SELECTOR_DIGITS: usize = 8;

/// Keys known to the local gpg keyring.
pub struct KeyRing<'a> {
    settings: &'a Settings,
    runner: &'a dyn Runner,
}

impl<'a> KeyRing<'a> {
    pub fn new(settings: &'a Settings, runner: &'a dyn Runner) -> Self {
        Self { settings, runner }
    }

    fn listing(&self, secret: bool) -> Result<Vec<UserInfo>> {
        let invocation = Invocation::new(self.settings.gpg()?, gpg::list_keys_args(secret));
        let output = self.runner.run_blocking(invocation)?;
        if !output.success() {
            warn!(exit_code = output.exit_code, secret, "gpg key listing failed");
        }
        Ok(parse_key_listing(&output.stdout_text()))
    }

    /// Public keys, flagged with whether their secret key is present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ToolNotFound` without gpg, or `ExecError` if it
    /// cannot be run.
    pub fn users(&self) -> Result<Vec<UserInfo>> {
        let secret: Vec<RecipientId> = self
            .listing(true)?
            .into_iter()
            .map(|u| u.key_id)
            .collect();
        let users: Vec<UserInfo> = self
            .listing(false)?
            .into_iter()
            .map(|u| {
                let have_secret = secret.contains(&u.key_id);
                u.with_secret(have_secret)
            })
            .collect();
        debug!(keys = users.len(), secret = secret.len(), "listed keyring");
        Ok(users)
    }

    /// Keyring users with `selected` enabled.
    ///
    /// Selected ids missing from the keyring are still returned, enabled and
    /// without a secret key.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidKeySelector` for a selector that is empty, not
    /// hex, shorter than 8 digits, or matches more than one key.
    pub fn candidates(&self, selected: &[String]) -> Result<Vec<UserInfo>> {
        select(self.users()?, selected)
    }
}

/// Enable the users matching `selected`, appending ids that match nobody.
///
/// A selector of up to 16 hex digits matches the long key ids ending in it;
/// a longer one (a fingerprint) matches the key id it ends with. Case and a
/// leading `0x` are ignored.
///
/// # Errors
///
/// Returns `Error::InvalidKeySelector` for an empty, non-hex or short
/// selector, and for one that matches more than one key.
pub fn select(mut users: Vec<UserInfo>, selected: &[String]) -> Result<Vec<UserInfo>> {
    for wanted in selected {
        let normalized = normalize_selector(wanted)?;
        let matches: Vec<usize> = users
            .iter()
            .enumerate()
            .filter(|(_, user)| selector_matches(&normalized, &user.key_id))
            .map(|(i, _)| i)
            .collect();

        match matches.as_slice() {
            [] => {
                warn!(key = %wanted, "key not found in keyring");
                users.push(UserInfo::new(wanted.trim(), "").enabled(true));
            }
            [only] => users[*only].enabled = true,
            many => {
                return Err(Error::InvalidKeySelector {
                    selector: wanted.clone(),
                    reason: format!("matches {} keys", many.len()),
                });
            }
        }
    }
    Ok(users)
}

fn normalize_selector(wanted: &str) -> Result<String> {
    let invalid = |reason: &str| Error::InvalidKeySelector {
        selector: wanted.to_string(),
        reason: reason.to_string(),
    };
    let trimmed = wanted.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() {
        return Err(invalid("empty key id"));
    }
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(invalid("not a hexadecimal key id"));
    }
    if digits.len() < MIN_SELECTOR_DIGITS {
        return Err(invalid("key ids need at least 8 hex digits"));
    }
    Ok(digits.to_ascii_uppercase())
}

fn selector_matches(selector: &str, key_id: &str) -> bool {
    let key = key_id.to_ascii_uppercase();
    key.ends_with(selector) || (selector.len() > key.len() && selector.ends_with(&key))
}

/// Parse `gpg --with-colons` output into one entry per primary key.
///
/// `pub` and `sec` records start a key (field 5 is the long key id); the
/// first `uid` record after it supplies the name (field 10).
pub fn parse_key_listing(text: &str) -> Vec<UserInfo> {
    let mut users: Vec<UserInfo> = Vec::new();
    let mut named = true;
    for line in text.lines() {
        let fields: Vec<&str> = line.split(':').collect();
        match fields.first().copied() {
            Some("pub") | Some("sec") => {
                if let Some(id) = fields.get(4).filter(|id| !id.is_empty()) {
                    users.push(UserInfo::new(*id, ""));
                    named = false;
                }
            }
            Some("uid") if !named => {
                if let (Some(user), Some(name)) = (users.last_mut(), fields.get(9)) {
                    user.name = unescape(name);
                    named = true;
                }
            }
            _ => {}
        }
    }
    users
}

// Colon listings escape ':' and other specials as \xNN.
fn unescape(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut rest = field;
    while let Some(pos) = rest.find("\\x") {
        out.push_str(&rest[..pos]);
        let hex = rest.get(pos + 2..pos + 4);
        match hex.and_then(|h| u8::from_str_radix(h, 16).ok()) {
            Some(byte) => {
                out.push(char::from(byte));
                rest = &rest[pos + 4..];
            }
            None => {
                out.push_str("\\x");
                rest = &rest[pos + 2..];
            }
        }
    }
    out.push_str(rest);
    out
}
