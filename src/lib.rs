//! Passkeep - a pass-compatible password store that keeps every entry
//! encrypted for exactly the recipients its directory declares.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── init          # Declare recipients and converge a directory
//! │   ├── entries       # insert, show, rm, ls
//! │   ├── reencrypt     # Drift report and re-encryption
//! │   ├── git           # git init/pull/push
//! │   ├── keys          # Keyring listing
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── config        # config.toml and resolved Settings
//!     ├── exec/         # Command runner
//!     │   ├── mod       # Runner trait, jobs and completions
//!     │   └── system    # tokio-backed process runner
//!     ├── acl           # .gpg-id resolution
//!     ├── inspect       # Actual recipients of a ciphertext
//!     ├── reencrypt     # Drift detection and correction
//!     ├── entry         # Create, show, delete, initialize
//!     ├── git           # Version history
//!     ├── keys          # gpg keyring listing
//!     └── store         # Entry names and ciphertext paths
//! ```
//!
//! # Features
//!
//! - Standard `pass` layout: one `.gpg` file per entry, `.gpg-id` per directory
//! - Re-encryption of entries whose recipients drifted from the declaration
//! - Optional git history with one commit per change
//! - gpg and git are driven as external programs

pub mod cli;
pub mod core;
pub mod error;
