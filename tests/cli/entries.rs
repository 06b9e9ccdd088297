//! Tests for insert, show, rm and ls.

use crate::support::*;

#[test]
fn test_insert_encrypts_for_sorted_declaration() {
    let t = Test::with_declaration(&[KEYB, KEYA]);

    let output = t.insert("web/github", "pw\n");
    assert_success(&output);
    assert_stdout_contains(&output, "added web/github");

    let (recipients, secret) = t.entry("web/github");
    assert_eq!(recipients, [KEYA, KEYB]);
    assert_eq!(secret, "pw\n");

    let path = t.path("web/github.gpg").display().to_string();
    assert_eq!(
        t.calls_with("gpg"),
        [format!("gpg --batch -eq --output {} -r {} -r {} -", path, KEYA, KEYB)]
    );
}

#[test]
fn test_insert_without_declaration_spawns_nothing() {
    let t = Test::new();

    let output = t.insert("x", "pw\n");
    assert_failure(&output);
    assert_stderr_contains(&output, ".gpg-id");
    assert_stderr_contains(&output, "passkeep init");
    assert!(t.calls().is_empty());
    assert!(!t.path("x.gpg").exists());
}

#[test]
fn test_insert_commits_with_git() {
    let t = Test::with_declaration(&[KEYA]);
    t.enable_git();

    assert_success(&t.insert("web/github", "pw\n"));

    let path = t.path("web/github.gpg").display().to_string();
    let git = t.calls_with("git");
    assert_eq!(
        git,
        [
            format!("git add {}", path),
            format!("git commit -m \"Add for web/github using QtPass. -- {}", path),
        ]
    );
}

#[test]
fn test_insert_existing_requires_force() {
    let t = Test::with_declaration(&[KEYA]);
    t.seed("x", &[KEYA], "old\n");

    let output = t.insert("x", "new\n");
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");
    assert_eq!(t.entry("x").1, "old\n");
}

#[test]
fn test_insert_force_overwrites_and_commits_edit() {
    let t = Test::with_declaration(&[KEYA]);
    t.seed("x", &[KEYA], "old\n");
    t.enable_git();

    let output = t.insert_force("x", "new\n");
    assert_success(&output);
    assert_stdout_contains(&output, "updated x");

    assert_eq!(t.entry("x").1, "new\n");
    assert!(t.calls_with("gpg --batch -eq").iter().all(|c| c.contains("--yes")));
    assert!(t.calls_with("git add").is_empty());
    let commits = t.calls_with("git commit");
    assert_eq!(commits.len(), 1);
    assert!(commits[0].starts_with("git commit -m Edit for x using QtPass. --"));
}

#[test]
fn test_insert_rejects_escaping_name() {
    let t = Test::with_declaration(&[KEYA]);

    let output = t.insert("../outside", "pw\n");
    assert_failure(&output);
    assert_stderr_contains(&output, "invalid entry");
    assert!(t.calls().is_empty());
}

#[test]
fn test_insert_rejects_empty_secret() {
    let t = Test::with_declaration(&[KEYA]);

    let output = t.insert("x", "");
    assert_failure(&output);
    assert_stderr_contains(&output, "secret is empty");
}

#[test]
fn test_show_prints_secret() {
    let t = Test::with_declaration(&[KEYA]);
    t.seed("web/github", &[KEYA], "hunter2\nuser: me\n");

    let output = t.show("web/github");
    assert_success(&output);
    assert_eq!(stdout(&output), "hunter2\nuser: me\n");
}

#[test]
fn test_show_missing_entry() {
    let t = Test::with_declaration(&[KEYA]);

    let output = t.show("nope");
    assert_failure(&output);
    assert_stderr_contains(&output, "not in the password store");
}

#[test]
fn test_show_without_secret_key_warns() {
    let t = Test::with_declaration(&[KEYA]);
    t.seed("x", &[KEYB], "theirs\n");

    let output = t.show("x");
    assert_success(&output);
    assert_stderr_contains(&output, "show exited with status 2");
    assert_stdout_excludes(&output, "theirs");
}

#[test]
fn test_rm_entry_without_git() {
    let t = Test::with_declaration(&[KEYA]);
    t.seed("x", &[KEYA], "pw\n");

    let output = t.rm("x", false);
    assert_success(&output);
    assert!(!t.path("x.gpg").exists());
    assert!(t.calls().is_empty());
}

#[test]
fn test_rm_directory_without_git() {
    let t = Test::with_declaration(&[KEYA]);
    t.seed("notes/a", &[KEYA], "1\n");
    t.seed("notes/deep/b", &[KEYA], "2\n");
    t.declare("notes", &[KEYA]);

    assert_success(&t.rm("notes", true));
    assert!(!t.path("notes").exists());
    assert!(t.path(".gpg-id").exists());
}

#[test]
fn test_rm_directory_with_git() {
    let t = Test::with_declaration(&[KEYA]);
    t.seed("notes/a", &[KEYA], "1\n");
    t.enable_git();

    let output = t.rm("notes", true);
    assert_success(&output);
    assert_stdout_contains(&output, "removed notes");

    let target = t.path("notes").display().to_string();
    assert_eq!(
        t.calls(),
        [
            format!("git rm -rf {}", target),
            format!("git commit -m Remove for notes using QtPass. -- {}", target),
        ]
    );
    assert!(!t.path("notes").exists());
}

#[test]
fn test_rm_file_with_git_uses_force_flag() {
    let t = Test::with_declaration(&[KEYA]);
    t.seed("x", &[KEYA], "pw\n");
    t.enable_git();

    assert_success(&t.rm("x", false));
    let path = t.path("x.gpg").display().to_string();
    assert_eq!(t.calls_with("git rm"), [format!("git rm -f {}", path)]);
}

#[test]
fn test_rm_does_not_report_removal_when_git_rm_fails() {
    let t = Test::with_declaration(&[KEYA]);
    t.seed("x", &[KEYA], "pw\n");
    t.enable_git();
    t.fail_git("rm");

    let output = t.rm("x", false);
    assert_success(&output);
    assert_stderr_contains(&output, "git rm exited with status 1");
    assert_stdout_excludes(&output, "removed");
    assert!(t.path("x.gpg").exists());
}

#[test]
fn test_rm_missing_entry() {
    let t = Test::with_declaration(&[KEYA]);

    let output = t.rm("nope", false);
    assert_failure(&output);
    assert_stderr_contains(&output, "not in the password store");
}

#[test]
fn test_ls_lists_in_walk_order() {
    let t = Test::with_declaration(&[KEYA]);
    t.seed("b", &[KEYA], "x");
    t.seed("a", &[KEYA], "x");
    t.seed("sub/z", &[KEYA], "x");
    t.seed("sub/m", &[KEYA], "x");

    let output = t.run(&["ls", "--json"]);
    assert_success(&output);
    let listing: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(listing["count"], 4);
    assert_eq!(
        listing["entries"],
        serde_json::json!(["a", "b", "sub/m", "sub/z"])
    );
}

#[test]
fn test_ls_empty_store() {
    let t = Test::with_declaration(&[KEYA]);

    let output = t.run(&["ls"]);
    assert_success(&output);
    assert_stdout_contains(&output, "store is empty");
}

#[test]
fn test_insert_and_show_keep_non_utf8_bytes() {
    let t = Test::with_declaration(&[KEYA]);

    let output = t
        .cmd()
        .args(["insert", "legacy"])
        .write_stdin(&b"caf\xe9\n"[..])
        .output()
        .expect("failed to run passkeep insert");
    assert_success(&output);
    assert_eq!(t.secret_bytes("legacy"), b"caf\xe9\n");

    let output = t.show("legacy");
    assert_success(&output);
    assert_eq!(output.stdout, b"caf\xe9\n");
}
