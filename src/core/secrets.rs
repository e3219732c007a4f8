//! Secret operations (encrypt, decrypt).
//!
//! High-level flows tying the registry, a backend and the secret format
//! together. Neither flow ever falls back to another backend.

use tracing::debug;

use crate::core::params::Params;
use crate::core::registry::Registry;
use crate::core::secret::{self, Secret};
use crate::core::types::EncryptParams;
use crate::error::Result;

/// Encrypt plaintext with the named backend and compose the secret.
///
/// # Arguments
///
/// * `registry` - Available backends
/// * `backend` - Backend name (e.g., "kms")
/// * `plaintext` - Value to protect
/// * `params` - Backend-specific encrypt params (e.g., `keyId`, `region`)
///
/// # Errors
///
/// Returns `CipherError::UnknownBackend` for an unregistered name and
/// `CipherError::EncryptionFailed` if the backend rejects the call.
pub fn encrypt(
    registry: &Registry,
    backend: &str,
    plaintext: &str,
    params: &EncryptParams,
) -> Result<Secret> {
    let crypter = registry.get(backend)?;
    debug!(backend = %backend, params = params.len(), "encrypting");

    let encrypted = crypter.encrypt(plaintext, params)?;
    Secret::new(crypter.name(), encrypted.decrypt_params, encrypted.ciphertext)
}

/// Decrypt a secret string.
///
/// The backend is resolved before the params token is decoded, so an
/// unregistered backend is reported as such whatever its token holds.
///
/// # Errors
///
/// Returns `FormatError` if the string is malformed,
/// `CipherError::UnknownBackend` if its backend is not registered, and
/// `CipherError::DecryptionFailed` if the backend cannot recover plaintext.
pub fn decrypt(registry: &Registry, encoded: &str) -> Result<String> {
    let (backend, token, ciphertext) = secret::split(encoded)?;
    let crypter = registry.get(backend)?;
    let params = Params::parse(token)?;
    debug!(backend = %backend, "decrypting");

    crypter.decrypt(ciphertext, &params)
}

/// Decrypt an already parsed [`Secret`].
///
/// # Errors
///
/// Same as [`decrypt`], minus the format errors.
pub fn decrypt_secret(registry: &Registry, secret: &Secret) -> Result<String> {
    let crypter = registry.get(secret.backend())?;
    debug!(backend = %secret.backend(), "decrypting");

    crypter.decrypt(secret.ciphertext(), secret.params())
}
