//! Test support utilities for passkeep integration tests.
//!
//! Every test gets its own store, home and tool directory. gpg and git are
//! replaced by small shell scripts that keep "ciphertexts" as plain text
//! (`recipients:<ids>` on the first line, the secret below) and append every
//! invocation to a call log.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;

#[allow(unused_imports)]
pub use assertions::*;

use std::fs;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

pub const KEYA: &str = "AAAAAAAAAAAAAAAA";
pub const KEYB: &str = "BBBBBBBBBBBBBBBB";
pub const KEYC: &str = "CCCCCCCCCCCCCCCC";

/// Test environment with isolated temp directories.
///
/// No process-global state is mutated; the binary is configured entirely
/// through environment variables on the child command, so tests can run in
/// parallel.
pub struct Test {
    /// Password store root
    pub store: TempDir,
    /// Temporary home directory
    pub home: TempDir,
    /// Scripted gpg and git
    pub bin: TempDir,
}

impl Test {
    /// Empty store, no keys in the keyring.
    pub fn new() -> Self {
        let t = Self {
            store: TempDir::new().expect("failed to create temp store"),
            home: TempDir::new().expect("failed to create temp home"),
            bin: TempDir::new().expect("failed to create temp bin"),
        };
        tools::install(t.bin.path());
        t.keyring(&[], &[]);
        t
    }

    /// Store whose root declares `ids`, with every id in the keyring and a
    /// secret key for the first one.
    pub fn with_declaration(ids: &[&str]) -> Self {
        let t = Self::new();
        t.keyring(ids, &ids[..1]);
        t.declare("", ids);
        t
    }

    /// Replace the keyring: public keys and the subset with secret keys.
    pub fn keyring(&self, public: &[&str], secret: &[&str]) {
        let lines = |ids: &[&str]| ids.iter().map(|id| format!("{}\n", id)).collect::<String>();
        fs::write(self.bin.path().join("pub.keys"), lines(public)).expect("write pub.keys");
        fs::write(self.bin.path().join("sec.keys"), lines(secret)).expect("write sec.keys");
    }

    /// Turn the store into a (fake) git working copy.
    pub fn enable_git(&self) {
        fs::create_dir_all(self.store.path().join(".git")).expect("create .git");
    }

    /// Make the scripted `git <subcommand>` fail with exit code 1.
    pub fn fail_git(&self, subcommand: &str) {
        fs::write(self.bin.path().join(format!("fail-{}", subcommand)), "").expect("write marker");
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.store.path().join(rel)
    }

    /// Write `<dir>/.gpg-id`.
    pub fn declare(&self, dir: &str, ids: &[&str]) {
        let dir = self.path(dir);
        fs::create_dir_all(&dir).expect("create dir");
        let contents: String = ids.iter().map(|id| format!("{}\n", id)).collect();
        fs::write(dir.join(".gpg-id"), contents).expect("write .gpg-id");
    }

    /// Write entry `name` as if encrypted for `recipients`.
    pub fn seed(&self, name: &str, recipients: &[&str], secret: &str) {
        let path = self.path(&format!("{}.gpg", name));
        fs::create_dir_all(path.parent().expect("entry has a parent")).expect("create dir");
        fs::write(path, format!("recipients: {}\n{}", recipients.join(" "), secret))
            .expect("write entry");
    }

    /// Like [`Test::seed`], with a secret that need not be UTF-8.
    pub fn seed_bytes(&self, name: &str, recipients: &[&str], secret: &[u8]) {
        let path = self.path(&format!("{}.gpg", name));
        fs::create_dir_all(path.parent().expect("entry has a parent")).expect("create dir");
        let mut contents = format!("recipients: {}\n", recipients.join(" ")).into_bytes();
        contents.extend_from_slice(secret);
        fs::write(path, contents).expect("write entry");
    }

    /// Raw secret bytes of entry `name`, without the recipients line.
    pub fn secret_bytes(&self, name: &str) -> Vec<u8> {
        let contents = fs::read(self.path(&format!("{}.gpg", name))).expect("read entry");
        match contents.iter().position(|b| *b == b'\n') {
            Some(end) => contents[end + 1..].to_vec(),
            None => Vec::new(),
        }
    }

    /// Recipients and secret of entry `name`.
    pub fn entry(&self, name: &str) -> (Vec<String>, String) {
        read_entry(&self.path(&format!("{}.gpg", name)))
    }

    /// Logged tool invocations, one line each (`gpg ...` / `git ...`).
    pub fn calls(&self) -> Vec<String> {
        fs::read_to_string(self.bin.path().join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Logged calls starting with `prefix`.
    pub fn calls_with(&self, prefix: &str) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter(|c| c.starts_with(prefix))
            .collect()
    }
}

pub fn read_entry(path: &Path) -> (Vec<String>, String) {
    let bytes = fs::read(path).expect("read entry");
    let contents = String::from_utf8_lossy(&bytes);
    let (header, secret) = contents.split_once('\n').unwrap_or((&*contents, ""));
    let mut recipients: Vec<String> = header
        .trim_start_matches("recipients:")
        .split_whitespace()
        .map(str::to_string)
        .collect();
    recipients.sort();
    (recipients, secret.to_string())
}
