//! Store initialization candidates.

use serde::Serialize;

use crate::core::types::RecipientId;

/// A key offered as recipient when initializing a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserInfo {
    /// Long key id written to `.gpg-id`.
    pub key_id: RecipientId,
    /// Primary user id, if known.
    pub name: String,
    /// Selected as a recipient.
    pub enabled: bool,
    /// The matching secret key is in the local keyring.
    pub have_secret: bool,
}

impl UserInfo {
    pub fn new(key_id: impl Into<RecipientId>, name: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            name: name.into(),
            enabled: false,
            have_secret: false,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn with_secret(mut self, have_secret: bool) -> Self {
        self.have_secret = have_secret;
        self
    }
}
