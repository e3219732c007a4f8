//! Encryption backends.
//!
//! Every backend implements [`Crypter`] and is looked up by name through the
//! [`Registry`](crate::core::registry::Registry).
//!
//! ## Backends
//!
//! - **local**: AES-256-GCM under a locally provisioned key.
//! - **kms**: envelope encryption with a data key from a key-management
//!   service. AWS KMS is feature-gated (`aws`, on by default).
//!
//! ## Adding a New Backend
//!
//! 1. Implement the `Crypter` trait in a new file
//! 2. Validate the backend's own required params inside `encrypt`/`decrypt`
//! 3. Register it in `Registry::from_settings`

pub mod aead;
pub mod kms;
mod local;

pub use kms::{DataKey, KmsClient, KmsCrypter, MemoryKms};
pub use local::LocalCrypter;

#[cfg(feature = "aws")]
pub use kms::AwsKms;

use crate::core::types::{Ciphertext, DecryptParams, EncryptParams};
use crate::error::{CipherError, Result};

/// Result of [`Crypter::encrypt`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encrypted {
    pub ciphertext: Ciphertext,
    /// Everything the matching decrypt call needs besides the ciphertext.
    pub decrypt_params: DecryptParams,
}

/// Encryption backend trait.
///
/// Implementations hold no per-call state, so a single instance may serve
/// concurrent calls.
///
/// Round-trip law: for any plaintext `p` and valid params `ep`,
/// `decrypt(&e.ciphertext, &e.decrypt_params) == p` where `e = encrypt(p, ep)`.
pub trait Crypter: Send + Sync {
    /// Registry key, also the first field of every secret string.
    fn name(&self) -> &'static str;

    /// Encrypt plaintext under backend-specific params.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::EncryptionFailed` if a required param is missing
    /// or the backend call fails.
    fn encrypt(&self, plaintext: &str, params: &EncryptParams) -> Result<Encrypted>;

    /// Recover plaintext from ciphertext and the recorded decrypt params.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::DecryptionFailed` if a required param is missing,
    /// the key is inaccessible, or authentication fails.
    fn decrypt(&self, ciphertext: &str, params: &DecryptParams) -> Result<String>;
}

/// Fetch a required decrypt param.
pub(crate) fn require_decrypt_param<'a>(params: &'a DecryptParams, key: &str) -> Result<&'a str> {
    params.get(key).ok_or_else(|| {
        CipherError::DecryptionFailed(format!("missing decrypt parameter '{}'", key)).into()
    })
}

/// Decode a base64 decrypt param.
pub(crate) fn decode_decrypt_param(params: &DecryptParams, key: &str) -> Result<Vec<u8>> {
    let value = require_decrypt_param(params, key)?;
    aead::decode(value).ok_or_else(|| {
        CipherError::DecryptionFailed(format!("decrypt parameter '{}' is not valid base64", key))
            .into()
    })
}

/// Convert opened bytes into the plaintext string.
pub(crate) fn into_plaintext(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|_| {
        CipherError::DecryptionFailed("plaintext is not valid UTF-8".to_string()).into()
    })
}
