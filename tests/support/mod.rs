//! Test support utilities for secretcrypt integration tests.
//!
//! Provides an isolated environment and helper commands for the CLI.

#![allow(dead_code)]

pub mod assertions;
pub mod commands;
pub mod fixtures;
pub mod skip;

#[allow(unused_imports)]
pub use assertions::*;
#[allow(unused_imports)]
pub use fixtures::*;

use std::path::PathBuf;

use tempfile::TempDir;

/// Test environment with an isolated home directory.
///
/// Child processes get HOME and the config path pointed into the temp dir, so
/// tests never touch the real `~/.secretcrypt` and can run in parallel.
pub struct Test {
    /// Temporary home directory
    pub home: TempDir,
}

impl Test {
    /// Create an environment with no local key.
    pub fn new() -> Self {
        let home = TempDir::new().expect("failed to create temp home");
        Self { home }
    }

    /// Create an environment with a local key generated by `keygen`.
    pub fn with_local_key() -> Self {
        let t = Self::new();
        let output = t.keygen();
        assert!(
            output.status.success(),
            "Failed to generate key: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        t
    }

    /// Settings file location used by child processes.
    pub fn config_path(&self) -> PathBuf {
        self.home.path().join(".secretcrypt").join("config.toml")
    }

    /// Default key file location.
    pub fn key_path(&self) -> PathBuf {
        self.home.path().join(".secretcrypt").join("key")
    }

    /// Write a settings file.
    pub fn write_config(&self, contents: &str) {
        let path = self.config_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, contents).unwrap();
    }
}
