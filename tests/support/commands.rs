//! Command helper methods for Test.

use super::Test;
use assert_cmd::Command;
use std::process::Output;

impl Test {
    /// Create a secretcrypt command with an isolated environment.
    ///
    /// Returns a Command configured with:
    /// - HOME set to the temporary home directory
    /// - SECRETCRYPT_CONFIG pointing inside it
    /// - SECRETCRYPT_LOCAL_KEY and SECRETCRYPT_LOG cleared
    /// - colors disabled
    pub fn cmd(&self) -> Command {
        #[allow(deprecated)]
        let mut cmd = Command::cargo_bin("secretcrypt").expect("failed to find secretcrypt binary");
        cmd.env("HOME", self.home.path());
        // Windows uses USERPROFILE instead of HOME for home directory
        cmd.env("USERPROFILE", self.home.path());
        cmd.env("SECRETCRYPT_CONFIG", self.config_path());
        cmd.env_remove("SECRETCRYPT_LOCAL_KEY");
        cmd.env_remove("SECRETCRYPT_LOG");
        cmd.env("NO_COLOR", "1");
        cmd.current_dir(self.home.path());
        cmd
    }

    /// Shortcut for `secretcrypt keygen`.
    pub fn keygen(&self) -> Output {
        self.cmd()
            .arg("keygen")
            .output()
            .expect("failed to run secretcrypt keygen")
    }

    /// Shortcut for `secretcrypt keygen --force`.
    pub fn keygen_force(&self) -> Output {
        self.cmd()
            .args(["keygen", "--force"])
            .output()
            .expect("failed to run secretcrypt keygen --force")
    }

    /// Shortcut for `secretcrypt encrypt local` with piped plaintext.
    pub fn encrypt_local(&self, plaintext: &str) -> Output {
        self.cmd()
            .args(["encrypt", "local"])
            .write_stdin(plaintext)
            .output()
            .expect("failed to run secretcrypt encrypt local")
    }

    /// Shortcut for `secretcrypt decrypt <secret>`.
    pub fn decrypt(&self, secret: &str) -> Output {
        self.cmd()
            .args(["decrypt", secret])
            .output()
            .expect("failed to run secretcrypt decrypt")
    }

    /// Shortcut for `secretcrypt decrypt` with the secret on stdin.
    pub fn decrypt_stdin(&self, secret: &str) -> Output {
        self.cmd()
            .arg("decrypt")
            .write_stdin(secret)
            .output()
            .expect("failed to run secretcrypt decrypt")
    }

    /// Shortcut for `secretcrypt backends`.
    pub fn backends(&self) -> Output {
        self.cmd()
            .arg("backends")
            .output()
            .expect("failed to run secretcrypt backends")
    }

    /// Encrypt locally and return the secret string.
    pub fn local_secret(&self, plaintext: &str) -> String {
        let output = self.encrypt_local(plaintext);
        super::assert_success(&output);
        super::stdout(&output).trim().to_string()
    }
}
