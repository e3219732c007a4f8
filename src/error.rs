//! Error types for secretcrypt.
//!
//! Each layer has its own enum; [`Error`] aggregates them so the CLI can
//! match on the failing layer when choosing a hint.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid input: {0}")]
    Input(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("prompt failed: {0}")]
    Prompt(#[from] dialoguer::Error),
}

/// Backend resolution and encrypt/decrypt failures.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("unknown backend: {0}")]
    UnknownBackend(String),

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),
}

/// Secret string and parameter token syntax errors.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("malformed parameters: {0}")]
    MalformedParameters(String),

    #[error("malformed secret: {0}")]
    MalformedSecret(String),
}

/// Configuration and key provisioning errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("no local key: set SECRETCRYPT_LOCAL_KEY or create {}", path.display())]
    MissingLocalKey { path: PathBuf },

    #[error("invalid local key: {0}")]
    InvalidLocalKey(String),

    #[error("key file already exists: {} (use --force to overwrite)", path.display())]
    KeyFileExists { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("backend registered twice: {0}")]
    DuplicateBackend(String),

    #[error("unable to determine home directory")]
    NoHomeDir,
}

/// Failures reported by a key-management service.
///
/// Messages carry key identifiers at most, never key material.
#[derive(Error, Debug)]
pub enum KmsError {
    #[error("access denied to key {0}")]
    AccessDenied(String),

    #[error("key not found: {0}")]
    KeyNotFound(String),

    #[error("wrapped key rejected by service")]
    InvalidCiphertext,

    #[error("{0}")]
    Unavailable(String),

    #[error("service error: {0}")]
    Service(String),
}

pub type Result<T> = std::result::Result<T, Error>;
