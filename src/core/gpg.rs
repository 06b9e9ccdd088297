//! gpg command lines.
//!
//! The argument vectors here are the exact contracts passkeep relies on; the
//! ciphertext container format itself is gpg's business.

use std::path::Path;

use crate::core::types::RecipientId;

fn path_arg(path: &Path) -> String {
    path.display().to_string()
}

/// Decrypt `ciphertext` to stdout through the agent.
pub fn decrypt_args(ciphertext: &Path) -> Vec<String> {
    let mut args: Vec<String> = [
        "-d",
        "--quiet",
        "--yes",
        "--no-encrypt-to",
        "--batch",
        "--use-agent",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    args.push(path_arg(ciphertext));
    args
}

/// Encrypt stdin to `ciphertext` for `recipients`.
///
/// `--yes` is only passed when overwriting an existing file.
pub fn encrypt_args(ciphertext: &Path, recipients: &[RecipientId], overwrite: bool) -> Vec<String> {
    let mut args = vec![
        "--batch".to_string(),
        "-eq".to_string(),
        "--output".to_string(),
        path_arg(ciphertext),
    ];
    for recipient in recipients {
        args.push("-r".to_string());
        args.push(recipient.clone());
    }
    if overwrite {
        args.push("--yes".to_string());
    }
    args.push("-".to_string());
    args
}

/// List the key ids `ciphertext` is encrypted for, without decrypting.
pub fn inspect_args(ciphertext: &Path) -> Vec<String> {
    let mut args: Vec<String> = [
        "-v",
        "--no-secmem-warning",
        "--no-permission-warning",
        "--list-only",
        "--keyid-format=long",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    args.push(path_arg(ciphertext));
    args
}

/// List public (`secret == false`) or secret keys in colon format.
pub fn list_keys_args(secret: bool) -> Vec<String> {
    vec![
        "--with-colons".to_string(),
        "--keyid-format=long".to_string(),
        if secret {
            "--list-secret-keys".to_string()
        } else {
            "--list-keys".to_string()
        },
    ]
}
