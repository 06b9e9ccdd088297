//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a passkeep command with correct environment variables.
    ///
    /// Returns a Command configured with:
    /// - the store, gpg and git pointed at the test's directories
    /// - HOME and the config file inside the temporary home
    /// - colors and log filters reset
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("passkeep").expect("failed to find passkeep binary");
        cmd.env("HOME", self.home.path());
        cmd.env("XDG_CONFIG_HOME", self.home.path().join(".config"));
        cmd.env("PASSKEEP_CONFIG", self.home.path().join("config.toml"));
        cmd.env("PASSWORD_STORE_DIR", self.store.path());
        cmd.env("PASSKEEP_GPG", self.bin.path().join("gpg"));
        cmd.env("PASSKEEP_GIT", self.bin.path().join("git"));
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("PASSKEEP_LOG");
        cmd.current_dir(self.home.path());
        cmd
    }

    /// Write `config.toml` in the temporary home.
    pub fn config(&self, toml: &str) {
        std::fs::write(self.home.path().join("config.toml"), toml).expect("write config");
    }

    /// Run passkeep with `args`.
    pub fn run(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(args)
            .output()
            .expect("failed to run passkeep")
    }

    /// Shortcut for `passkeep init` command.
    pub fn init(&self, keys: &[&str]) -> Output {
        let mut args = vec!["init"];
        args.extend_from_slice(keys);
        self.run(&args)
    }

    /// Shortcut for `passkeep insert`, piping `secret` on stdin.
    pub fn insert(&self, name: &str, secret: &str) -> Output {
        self.cmd()
            .args(["insert", name])
            .write_stdin(secret)
            .output()
            .expect("failed to run passkeep insert")
    }

    /// Shortcut for `passkeep insert --force`.
    pub fn insert_force(&self, name: &str, secret: &str) -> Output {
        self.cmd()
            .args(["insert", "--force", name])
            .write_stdin(secret)
            .output()
            .expect("failed to run passkeep insert --force")
    }

    /// Shortcut for `passkeep show` command.
    pub fn show(&self, name: &str) -> Output {
        self.run(&["show", name])
    }

    /// Shortcut for `passkeep rm --yes` command.
    pub fn rm(&self, name: &str, recursive: bool) -> Output {
        if recursive {
            self.run(&["rm", "--yes", "--recursive", name])
        } else {
            self.run(&["rm", "--yes", name])
        }
    }

    /// Shortcut for `passkeep reencrypt` command.
    pub fn reencrypt(&self) -> Output {
        self.run(&["reencrypt"])
    }
}
