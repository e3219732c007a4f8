//! Cloud key-management backend.
//!
//! Envelope encryption: a fresh 256-bit data key is requested from the
//! service for every secret, the plaintext is sealed locally with it, and only
//! the service-wrapped copy of the data key is kept, inside the decrypt
//! params:
//!
//! ```text
//! kms:dataKey=<b64>&keyId=<id>&nonce=<b64>&region=<region>:<b64 ciphertext>
//! ```
//!
//! The plaintext data key lives in a `Zeroizing` buffer and is wiped as soon
//! as the local seal or open completes.
//!
//! - `aws`: AWS KMS client (feature-gated)
//! - `memory`: in-process service for tests and offline use

#[cfg(feature = "aws")]
mod aws;
mod memory;

#[cfg(feature = "aws")]
pub use aws::AwsKms;
pub use memory::MemoryKms;

use std::fmt;
use std::sync::Arc;

use tracing::{debug, trace};
use zeroize::Zeroizing;

use super::aead::{self, AeadError};
use super::{decode_decrypt_param, into_plaintext, Crypter, Encrypted};
use crate::core::config::Settings;
use crate::core::constants::{param, KMS_BACKEND};
use crate::core::types::{DecryptParams, EncryptParams};
use crate::error::{CipherError, KmsError, Result};

/// Data key returned by [`KmsClient::generate_data_key`].
pub struct DataKey {
    /// Plaintext key, wiped on drop
    pub plaintext: Zeroizing<Vec<u8>>,
    /// Key wrapped by the service, safe to store
    pub wrapped: Vec<u8>,
}

impl fmt::Debug for DataKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DataKey")
            .field("plaintext", &"[REDACTED]")
            .field("wrapped_len", &self.wrapped.len())
            .finish()
    }
}

/// Key-management service operations needed for envelope encryption.
///
/// Implemented by real providers (AWS) and by [`MemoryKms`].
pub trait KmsClient: Send + Sync + fmt::Debug {
    /// Request a new AES-256 data key protected by `key_id`.
    fn generate_data_key(&self, key_id: &str, region: &str)
        -> std::result::Result<DataKey, KmsError>;

    /// Unwrap a data key previously returned by `generate_data_key`.
    fn decrypt_data_key(
        &self,
        wrapped: &[u8],
        key_id: Option<&str>,
        region: &str,
    ) -> std::result::Result<Zeroizing<Vec<u8>>, KmsError>;
}

/// Envelope-encryption backend on top of a [`KmsClient`].
#[derive(Debug, Clone)]
pub struct KmsCrypter {
    client: Arc<dyn KmsClient>,
    default_region: String,
}

impl KmsCrypter {
    pub fn new(client: Arc<dyn KmsClient>, default_region: impl Into<String>) -> Self {
        Self {
            client,
            default_region: default_region.into(),
        }
    }

    /// Build with the AWS client (or a placeholder that reports the missing
    /// feature) and the configured default region.
    pub fn from_settings(settings: &Settings) -> Self {
        #[cfg(feature = "aws")]
        let client: Arc<dyn KmsClient> = Arc::new(AwsKms::new(settings.kms.endpoint.clone()));

        #[cfg(not(feature = "aws"))]
        let client: Arc<dyn KmsClient> = Arc::new(Unavailable);

        Self::new(client, settings.kms.default_region.clone())
    }

    fn region<'a>(&'a self, params: &'a EncryptParams) -> &'a str {
        params
            .get(param::REGION)
            .filter(|r| !r.is_empty())
            .unwrap_or(self.default_region.as_str())
    }
}

impl Crypter for KmsCrypter {
    fn name(&self) -> &'static str {
        KMS_BACKEND
    }

    fn encrypt(&self, plaintext: &str, params: &EncryptParams) -> Result<Encrypted> {
        let key_id = params
            .get(param::KEY_ID)
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                CipherError::EncryptionFailed(format!(
                    "missing required parameter '{}'",
                    param::KEY_ID
                ))
            })?;
        let region = self.region(params);

        debug!(key_id = %key_id, region = %region, "requesting data key");
        let data_key = self.client.generate_data_key(key_id, region).map_err(|e| {
            CipherError::EncryptionFailed(format!("kms generate data key failed: {}", e))
        })?;

        trace!(plaintext_len = plaintext.len(), "sealing with data key");
        let sealed = aead::seal(&data_key.plaintext, plaintext.as_bytes())
            .map_err(|e| CipherError::EncryptionFailed(e.to_string()))?;

        let mut decrypt_params = DecryptParams::new();
        decrypt_params.insert(param::KEY_ID, key_id);
        decrypt_params.insert(param::REGION, region);
        decrypt_params.insert(param::DATA_KEY, aead::encode(&data_key.wrapped));
        decrypt_params.insert(param::NONCE, aead::encode(&sealed.nonce));

        Ok(Encrypted {
            ciphertext: aead::encode(&sealed.ciphertext),
            decrypt_params,
        })
    }

    fn decrypt(&self, ciphertext: &str, params: &DecryptParams) -> Result<String> {
        let wrapped = decode_decrypt_param(params, param::DATA_KEY)?;
        let nonce = decode_decrypt_param(params, param::NONCE)?;
        let key_id = params.get(param::KEY_ID).filter(|k| !k.is_empty());
        let region = self.region(params);

        let sealed = aead::decode(ciphertext).ok_or_else(|| {
            CipherError::DecryptionFailed("ciphertext is not valid base64".to_string())
        })?;

        debug!(key_id = ?key_id, region = %region, "unwrapping data key");
        let data_key = self
            .client
            .decrypt_data_key(&wrapped, key_id, region)
            .map_err(|e| {
                CipherError::DecryptionFailed(format!("kms decrypt data key failed: {}", e))
            })?;

        let opened = aead::open(&data_key, &nonce, &sealed).map_err(|e| match e {
            AeadError::InvalidNonce => {
                CipherError::DecryptionFailed("invalid nonce parameter".to_string())
            }
            _ => CipherError::DecryptionFailed(
                "authentication failed (wrong data key or corrupted secret)".to_string(),
            ),
        })?;
        drop(data_key);

        trace!(plaintext_len = opened.len(), "decrypted with data key");
        into_plaintext(opened)
    }
}

/// Placeholder client when AWS support is not compiled in.
#[cfg(not(feature = "aws"))]
#[derive(Debug)]
struct Unavailable;

#[cfg(not(feature = "aws"))]
impl KmsClient for Unavailable {
    fn generate_data_key(&self, _: &str, _: &str) -> std::result::Result<DataKey, KmsError> {
        Err(not_compiled())
    }

    fn decrypt_data_key(
        &self,
        _: &[u8],
        _: Option<&str>,
        _: &str,
    ) -> std::result::Result<Zeroizing<Vec<u8>>, KmsError> {
        Err(not_compiled())
    }
}

#[cfg(not(feature = "aws"))]
fn not_compiled() -> KmsError {
    KmsError::Unavailable(
        "AWS KMS not compiled. Rebuild with: cargo install secretcrypt --features aws".to_string(),
    )
}
