//! Constants used throughout passkeep.
//!
//! Centralizes file names, tool conventions and magic strings.

/// Access-control declaration file name, one per directory.
pub const GPG_ID_FILE: &str = ".gpg-id";

/// Extension of ciphertext files, without the leading dot.
pub const CIPHERTEXT_EXT: &str = "gpg";

/// Placeholder standing in for plaintext when decryption produced nothing.
pub const DECRYPT_FAILED: &str = "Could not decrypt";

/// Length of a long-form gpg key id, as printed with `--keyid-format=long`.
pub const LONG_KEY_ID_LEN: usize = 16;

/// Tool name stamped into every commit message.
pub const COMMIT_TOOL: &str = "QtPass";

/// Store directory relative to HOME when nothing else is configured.
pub const DEFAULT_STORE_DIR: &str = ".password-store";

/// Config file location relative to the platform config directory.
pub const CONFIG_FILE: &str = "passkeep/config.toml";
