//! Tests for `passkeep init` command.

use crate::support::*;
use std::fs;

#[test]
fn test_init_writes_declaration_and_commits() {
    let t = Test::new();
    t.keyring(&[KEYA, KEYB], &[KEYA]);
    t.enable_git();

    let output = t.init(&[KEYA, KEYB]);
    assert_success(&output);
    assert_stdout_contains(&output, "declared 2 recipients");

    let declaration = t.path(".gpg-id");
    assert_eq!(
        fs::read_to_string(&declaration).unwrap(),
        format!("{}\n{}\n", KEYA, KEYB)
    );
    let declaration = declaration.display().to_string();
    assert_eq!(t.calls_with("git add"), [format!("git add {}", declaration)]);
    assert_eq!(
        t.calls_with("git commit"),
        [format!("git commit -m Added .gpg-id using QtPass. -- {}", declaration)]
    );
}

#[test]
fn test_init_without_secret_key_leaves_uncommitted_declaration() {
    let t = Test::new();
    t.keyring(&[KEYB], &[]);
    t.enable_git();

    let output = t.init(&[KEYB]);
    assert_failure(&output);
    assert_stderr_contains(&output, "secret key");

    assert_eq!(
        fs::read_to_string(t.path(".gpg-id")).unwrap(),
        format!("{}\n", KEYB)
    );
    assert!(t.calls_with("git").is_empty());
    assert!(t.calls_with("gpg -v").is_empty());
}

#[test]
fn test_reinit_does_not_stage_existing_declaration() {
    let t = Test::with_declaration(&[KEYA]);
    t.enable_git();

    assert_success(&t.init(&[KEYA]));
    assert!(t.calls_with("git add").is_empty());
    assert_eq!(t.calls_with("git commit").len(), 1);
}

#[test]
fn test_init_reencrypts_existing_entries() {
    let t = Test::with_declaration(&[KEYA]);
    t.keyring(&[KEYA, KEYB], &[KEYA]);
    t.seed("x", &[KEYA], "pw\n");
    t.seed("sub/y", &[KEYA], "pw2\n");

    let output = t.init(&[KEYA, KEYB]);
    assert_success(&output);
    assert_stdout_contains(&output, "re-encrypted 2 entries");

    assert_eq!(t.entry("x").0, [KEYA, KEYB]);
    assert_eq!(t.entry("sub/y").0, [KEYA, KEYB]);
}

#[test]
fn test_init_subdirectory() {
    let t = Test::new();
    t.keyring(&[KEYA, KEYB], &[KEYA]);

    assert_success(&t.run(&["init", "--path", "team", KEYA, KEYB]));

    assert!(t.path("team/.gpg-id").is_file());
    assert!(!t.path(".gpg-id").exists());
}

#[test]
fn test_init_selects_by_key_suffix() {
    let t = Test::new();
    t.keyring(&[KEYA, KEYB], &[KEYA]);

    assert_success(&t.init(&["aaaaaaaa"]));
    assert_eq!(
        fs::read_to_string(t.path(".gpg-id")).unwrap(),
        format!("{}\n", KEYA)
    );
}

#[test]
fn test_init_requires_a_key() {
    let t = Test::new();
    assert_failure(&t.run(&["init"]));
}

#[test]
fn test_init_rejects_empty_key_id() {
    let t = Test::new();
    t.keyring(&[KEYA, KEYB], &[KEYA]);

    let output = t.init(&[""]);
    assert_failure(&output);
    assert_stderr_contains(&output, "empty key id");
    assert!(!t.path(".gpg-id").exists());
}

#[test]
fn test_init_rejects_short_key_id() {
    let t = Test::new();
    t.keyring(&[KEYA, KEYB], &[KEYA]);

    let output = t.init(&["A"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "at least 8 hex digits");
    assert!(!t.path(".gpg-id").exists());
}

#[test]
fn test_init_rejects_ambiguous_key_id() {
    let t = Test::new();
    let sibling = "1111AAAAAAAAAAAA";
    t.keyring(&[KEYA, sibling], &[KEYA, sibling]);

    let output = t.init(&["AAAAAAAA"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "matches 2 keys");
    assert!(!t.path(".gpg-id").exists());
    assert!(t.calls_with("gpg -v").is_empty());
}
