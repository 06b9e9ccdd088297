//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

/// A gpg recipient identifier (long key id, fingerprint or email).
///
/// Compared by exact string equality.
pub type RecipientId = String;

/// A store-relative entry name without the `.gpg` extension (e.g. `web/github`).
pub type EntryName = String;

/// Correlation token for an asynchronously dispatched command.
pub type JobId = u64;
