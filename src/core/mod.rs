//! Core library components.
//!
//! Store layout, access-control resolution, gpg/git command construction and
//! the re-encryption engine. Nothing here prints; the CLI layer owns output.

pub mod acl;
pub mod config;
pub mod constants;
pub mod domain;
pub mod entry;
pub mod exec;
pub mod git;
pub mod gpg;
pub mod inspect;
pub mod keys;
pub mod reencrypt;
pub mod store;
pub mod types;
