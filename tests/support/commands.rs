//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create an envmanager command with an isolated environment.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - Current directory set to the test project directory
    /// - PATH starting with the fake tool directory
    /// - no inherited envmanager variables and no colors
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("envmanager").expect("failed to find envmanager binary");
        cmd.env("HOME", self.home.path());
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("PATH", self.path_var());
        cmd.env("NO_COLOR", "1");
        cmd.env_remove("ENVMANAGER_LOADED");
        cmd.env_remove("ENVMANAGER_CONFIG");
        cmd.env_remove("ENVMANAGER_LOG");
        cmd.env_remove("ENVMANAGER_LOG_FORMAT");
        cmd.env_remove("PASSWORD_STORE_DIR");
        cmd.current_dir(self.dir.path());
        cmd
    }

    /// Same as `cmd()` but with `ENVMANAGER_LOADED` set to `loaded`.
    pub fn cmd_loaded(&self, loaded: &str) -> Command {
        let mut cmd = self.cmd();
        cmd.env("ENVMANAGER_LOADED", loaded);
        cmd
    }

    /// Shortcut for `envmanager load` command.
    pub fn load(&self, profiles: &[&str]) -> Output {
        self.cmd()
            .arg("load")
            .args(profiles)
            .output()
            .expect("failed to run envmanager load")
    }

    /// Shortcut for `envmanager unload` command with profiles already loaded.
    pub fn unload(&self, loaded: &str, profiles: &[&str]) -> Output {
        self.cmd_loaded(loaded)
            .arg("unload")
            .args(profiles)
            .output()
            .expect("failed to run envmanager unload")
    }

    /// Shortcut for `envmanager current` command.
    pub fn current(&self, loaded: &str) -> Output {
        self.cmd_loaded(loaded)
            .arg("current")
            .output()
            .expect("failed to run envmanager current")
    }

    /// Shortcut for `envmanager config init` command.
    pub fn config_init(&self) -> Output {
        self.cmd()
            .args(["config", "init"])
            .output()
            .expect("failed to run envmanager config init")
    }

    /// Shortcut for `envmanager config add ...` commands.
    pub fn config_add(&self, args: &[&str]) -> Output {
        self.cmd()
            .args(["config", "add"])
            .args(args)
            .output()
            .expect("failed to run envmanager config add")
    }

    /// Shortcut for `envmanager debug ...` commands.
    pub fn debug(&self, args: &[&str]) -> Output {
        self.cmd()
            .arg("debug")
            .args(args)
            .output()
            .expect("failed to run envmanager debug")
    }
}
