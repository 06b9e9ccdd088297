//! Recipient sets.
//!
//! Declared recipients keep file order for display; every comparison and
//! every encryption argument list uses the sorted form.

use std::fmt;

use serde::Serialize;

use crate::core::types::RecipientId;

/// Recipient identifiers as read from a `.gpg-id` declaration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Recipients(Vec<RecipientId>);

impl Recipients {
    pub fn new(ids: Vec<RecipientId>) -> Self {
        Self(ids)
    }

    /// Parse declaration contents: one identifier per line, blank lines dropped.
    pub fn parse(contents: &str) -> Self {
        Self(
            contents
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    /// No usable identifiers.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Identifiers in file order.
    pub fn as_slice(&self) -> &[RecipientId] {
        &self.0
    }

    /// Identifiers sorted for comparison and encryption.
    pub fn sorted(&self) -> Vec<RecipientId> {
        let mut ids = self.0.clone();
        ids.sort();
        ids
    }
}

impl fmt::Display for Recipients {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(", "))
    }
}
