//! Local symmetric backend.
//!
//! Seals plaintext with AES-256-GCM under a key available to this process.
//! The per-call nonce is recorded in the decrypt params, so decryption needs
//! nothing but the secret string and the same key.

use tracing::trace;

use super::aead::{self, AeadError};
use super::{decode_decrypt_param, into_plaintext, Crypter, Encrypted};
use crate::core::config::Settings;
use crate::core::constants::{param, LOCAL_BACKEND};
use crate::core::keys::{self, LocalKey};
use crate::core::types::{DecryptParams, EncryptParams};
use crate::error::{CipherError, Result};

/// AES-256-GCM backend.
#[derive(Debug)]
pub struct LocalCrypter {
    key: LocalKey,
}

impl LocalCrypter {
    pub fn new(key: LocalKey) -> Self {
        Self { key }
    }

    /// Build from the configured key source.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the key is missing or invalid. This is the
    /// only place the key source is consulted.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(keys::load(settings)?))
    }
}

impl Crypter for LocalCrypter {
    fn name(&self) -> &'static str {
        LOCAL_BACKEND
    }

    fn encrypt(&self, plaintext: &str, _params: &EncryptParams) -> Result<Encrypted> {
        trace!(plaintext_len = plaintext.len(), "encrypting with local key");

        let sealed = aead::seal(self.key.as_bytes(), plaintext.as_bytes())
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

        let mut decrypt_params = DecryptParams::new();
        decrypt_params.insert(param::NONCE, aead::encode(&sealed.nonce));

        let ciphertext = aead::encode(&sealed.ciphertext);
        trace!(ciphertext_len = ciphertext.len(), "encrypted with local key");

        Ok(Encrypted {
            ciphertext,
            decrypt_params,
        })
    }

    fn decrypt(&self, ciphertext: &str, params: &DecryptParams) -> Result<String> {
        trace!(ciphertext_len = ciphertext.len(), "decrypting with local key");

        let nonce = decode_decrypt_param(params, param::NONCE)?;
        let sealed = aead::decode(ciphertext).ok_or_else(|| {
            CipherError::DecryptionFailed("ciphertext is not valid base64".to_string())
        })?;

        let opened = aead::open(self.key.as_bytes(), &nonce, &sealed).map_err(|e| match e {
            AeadError::InvalidNonce => {
                CipherError::DecryptionFailed("invalid nonce parameter".to_string())
            }
            _ => CipherError::DecryptionFailed(
                "authentication failed (wrong key or corrupted secret)".to_string(),
            ),
        })?;

        into_plaintext(opened)
    }
}
