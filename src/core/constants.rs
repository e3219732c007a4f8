//! Constants used throughout secretcrypt.
//!
//! Centralizes magic strings and configuration values.

/// Separator between the three fields of a secret string.
pub const SECRET_SEPARATOR: char = ':';

/// Registry name of the cloud key-management backend.
pub const KMS_BACKEND: &str = "kms";

/// Registry name of the local symmetric backend.
pub const LOCAL_BACKEND: &str = "local";

/// AWS region used when neither the caller nor the config names one.
pub const DEFAULT_REGION: &str = "us-east-1";

/// Settings directory relative to HOME (~/.secretcrypt).
pub const CONFIG_DIR: &str = ".secretcrypt";

/// Settings file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.toml";

/// Default local key file name inside [`CONFIG_DIR`].
pub const KEY_FILE: &str = "key";

/// Environment variable overriding the settings file location.
pub const CONFIG_ENV: &str = "SECRETCRYPT_CONFIG";

/// Environment variable carrying the local key (hex or base64).
pub const LOCAL_KEY_ENV: &str = "SECRETCRYPT_LOCAL_KEY";

/// Environment variable holding the tracing filter.
pub const LOG_ENV: &str = "SECRETCRYPT_LOG";

/// Decrypt parameter names.
pub mod param {
    pub const KEY_ID: &str = "keyId";
    pub const REGION: &str = "region";
    pub const NONCE: &str = "nonce";
    pub const DATA_KEY: &str = "dataKey";
}
