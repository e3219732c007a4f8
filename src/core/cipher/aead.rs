//! AES-256-GCM sealing shared by the local backend and the KMS envelope.
//!
//! Every call draws a fresh random 96-bit nonce. The sealed output carries the
//! 16-byte authentication tag, so any modification is detected on open.

use aes_gcm::{
    aead::{Aead, KeyInit},
    Aes256Gcm, Nonce,
};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::RngCore;
use thiserror::Error;

/// Byte length of an AES-256 key.
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM nonce.
pub const NONCE_LEN: usize = 12;

/// Errors produced by the AEAD layer.
///
/// Coarse: an open failure never says which check failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AeadError {
    #[error("invalid key length: expected 32 bytes")]
    InvalidKeyLength,

    #[error("invalid nonce")]
    InvalidNonce,

    #[error("authentication failed")]
    AuthenticationFailed,
}

/// Output of [`seal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sealed {
    pub nonce: [u8; NONCE_LEN],
    /// Ciphertext followed by the authentication tag.
    pub ciphertext: Vec<u8>,
}

/// Encrypt `plaintext` under `key` with a fresh nonce.
pub fn seal(key: &[u8], plaintext: &[u8]) -> Result<Sealed, AeadError> {
    let cipher = build_cipher(key)?;

    let mut nonce = [0u8; NONCE_LEN];
    rand::thread_rng().fill_bytes(&mut nonce);

    let ciphertext = cipher
        .encrypt(Nonce::from_slice(&nonce), plaintext)
        .map_err(|_| AeadError::AuthenticationFailed)?;

    Ok(Sealed { nonce, ciphertext })
}

/// Decrypt and authenticate `ciphertext`.
pub fn open(key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>, AeadError> {
    if nonce.len() != NONCE_LEN {
        return Err(AeadError::InvalidNonce);
    }
    let cipher = build_cipher(key)?;
    cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| AeadError::AuthenticationFailed)
}

/// Unpadded URL-safe base64. The alphabet has no `:`.
pub fn encode(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

pub fn decode(text: &str) -> Option<Vec<u8>> {
    URL_SAFE_NO_PAD.decode(text).ok()
}

fn build_cipher(key: &[u8]) -> Result<Aes256Gcm, AeadError> {
    if key.len() != KEY_LEN {
        return Err(AeadError::InvalidKeyLength);
    }
    Aes256Gcm::new_from_slice(key).map_err(|_| AeadError::InvalidKeyLength)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn random_key() -> Vec<u8> {
        let mut key = vec![0u8; KEY_LEN];
        rand::thread_rng().fill_bytes(&mut key);
        key
    }

    #[test]
    fn test_seal_open_roundtrip() {
        let key = random_key();
        let sealed = seal(&key, b"123-45-6789").unwrap();
        let opened = open(&key, &sealed.nonce, &sealed.ciphertext).unwrap();
        assert_eq!(opened, b"123-45-6789");
    }

    #[test]
    fn test_fresh_nonce_per_call() {
        let key = random_key();
        let a = seal(&key, b"same").unwrap();
        let b = seal(&key, b"same").unwrap();
        assert_ne!(a.nonce, b.nonce);
        assert_ne!(a.ciphertext, b.ciphertext);
    }

    #[test]
    fn test_wrong_key_fails() {
        let sealed = seal(&random_key(), b"secret").unwrap();
        assert_eq!(
            open(&random_key(), &sealed.nonce, &sealed.ciphertext),
            Err(AeadError::AuthenticationFailed)
        );
    }

    #[test]
    fn test_tampered_ciphertext_fails() {
        let key = random_key();
        let mut sealed = seal(&key, b"tamper me").unwrap();
        sealed.ciphertext[0] ^= 0x01;
        assert!(open(&key, &sealed.nonce, &sealed.ciphertext).is_err());
    }

    #[test]
    fn test_invalid_lengths_rejected() {
        assert_eq!(seal(&[0u8; 16], b"x"), Err(AeadError::InvalidKeyLength));
        assert_eq!(
            open(&random_key(), &[0u8; 8], b"whatever"),
            Err(AeadError::InvalidNonce)
        );
    }

    #[test]
    fn test_encoding_has_no_separator() {
        let bytes: Vec<u8> = (0..=255).collect();
        let text = encode(&bytes);
        assert!(!text.contains(':'));
        assert_eq!(decode(&text).unwrap(), bytes);
    }
}
