//! Local key provisioning.
//!
//! The `local` backend needs a 256-bit key. It comes from the
//! `SECRETCRYPT_LOCAL_KEY` environment variable when set, otherwise from the
//! key file (`~/.secretcrypt/key` unless configured). Both accept 64 hex
//! characters or standard base64 of 32 bytes.

use std::env::VarError;
use std::fmt;
use std::fs;
use std::path::Path;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::RngCore;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use zeroize::Zeroizing;

use crate::core::config::Settings;
use crate::core::constants;
use crate::error::{ConfigError, Result};

/// Byte length of an AES-256 key.
pub const KEY_LEN: usize = 32;

/// Symmetric key for the local backend. Zeroized on drop.
#[derive(Clone)]
pub struct LocalKey(Zeroizing<[u8; KEY_LEN]>);

impl LocalKey {
    /// Generate a fresh random key.
    pub fn generate() -> Self {
        let mut bytes = Zeroizing::new([0u8; KEY_LEN]);
        rand::thread_rng().fill_bytes(&mut bytes[..]);
        Self(bytes)
    }

    /// Wrap raw key bytes.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidLocalKey` if `bytes` is not 32 bytes long.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() != KEY_LEN {
            return Err(ConfigError::InvalidLocalKey(format!(
                "expected {} bytes, got {}",
                KEY_LEN,
                bytes.len()
            ))
            .into());
        }
        let mut key = Zeroizing::new([0u8; KEY_LEN]);
        key.copy_from_slice(bytes);
        Ok(Self(key))
    }

    /// Parse a hex or base64 encoded key.
    pub fn parse(encoded: &str) -> Result<Self> {
        let trimmed = encoded.trim();

        if trimmed.len() == KEY_LEN * 2 && trimmed.chars().all(|c| c.is_ascii_hexdigit()) {
            let bytes = Zeroizing::new(
                hex::decode(trimmed)
                    .map_err(|e| ConfigError::InvalidLocalKey(format!("invalid hex: {}", e)))?,
            );
            return Self::from_bytes(&bytes);
        }

        let bytes = Zeroizing::new(STANDARD.decode(trimmed).map_err(|_| {
            ConfigError::InvalidLocalKey("key is neither hex nor base64".to_string())
        })?);
        Self::from_bytes(&bytes)
    }

    /// Base64 encoding, as written to key files.
    pub fn encode(&self) -> Zeroizing<String> {
        Zeroizing::new(STANDARD.encode(&self.0[..]))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }

    /// Short SHA-256 fingerprint for display. Reveals nothing usable.
    pub fn fingerprint(&self) -> String {
        let digest = Sha256::digest(&self.0[..]);
        hex::encode(&digest[..8])
    }
}

impl fmt::Debug for LocalKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "LocalKey({})", self.fingerprint())
    }
}

/// Resolve the local key from the environment, then the key file.
///
/// # Errors
///
/// Returns `ConfigError::MissingLocalKey` if neither source exists, or
/// `ConfigError::InvalidLocalKey` if the found key is malformed.
pub fn load(settings: &Settings) -> Result<LocalKey> {
    if let Some(key) = from_env(std::env::var(constants::LOCAL_KEY_ENV))? {
        return Ok(key);
    }

    let path = settings.local_key_file()?;
    load_file(&path)
}

/// A set but unreadable variable is an error, never a fallback to the file.
fn from_env(var: std::result::Result<String, VarError>) -> Result<Option<LocalKey>> {
    match var {
        Ok(value) => {
            let value = Zeroizing::new(value);
            if value.trim().is_empty() {
                return Ok(None);
            }
            debug!(source = constants::LOCAL_KEY_ENV, "loading local key");
            LocalKey::parse(&value).map(Some)
        }
        Err(VarError::NotPresent) => Ok(None),
        Err(VarError::NotUnicode(_)) => Err(ConfigError::InvalidLocalKey(format!(
            "{} is not valid UTF-8",
            constants::LOCAL_KEY_ENV
        ))
        .into()),
    }
}

/// Load a key file.
pub fn load_file(path: &Path) -> Result<LocalKey> {
    if !path.exists() {
        return Err(ConfigError::MissingLocalKey {
            path: path.to_path_buf(),
        }
        .into());
    }

    debug!(path = %path.display(), "loading local key");

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let mode = fs::metadata(path)?.permissions().mode() & 0o777;
        if mode & 0o077 != 0 {
            warn!(
                path = %path.display(),
                mode = %format!("{:o}", mode),
                "key file is readable by other users"
            );
        }
    }

    let contents = Zeroizing::new(fs::read_to_string(path).map_err(|source| {
        ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        }
    })?);
    LocalKey::parse(&contents)
}

/// Write `key` to `path` with 0600 permissions, creating parent directories.
///
/// # Errors
///
/// Returns `ConfigError::KeyFileExists` if the file exists and `force` is false.
pub fn write_file(path: &Path, key: &LocalKey, force: bool) -> Result<()> {
    if path.exists() && !force {
        return Err(ConfigError::KeyFileExists {
            path: path.to_path_buf(),
        }
        .into());
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let encoded = key.encode();
    fs::write(path, format!("{}\n", encoded.as_str()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(path, fs::Permissions::from_mode(0o600))?;
    }

    debug!(path = %path.display(), fingerprint = %key.fingerprint(), "wrote local key");
    Ok(())
}
