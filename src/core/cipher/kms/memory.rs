//! In-process key-management service.
//!
//! Behaves like a KMS for envelope purposes: master keys are scoped by region
//! and key id and never leave the service, data keys come back wrapped under
//! them, and unwrapping checks the scope. Used by the test-suite and for
//! offline experiments; state lives only as long as the instance.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use rand::RngCore;
use zeroize::Zeroizing;

use super::{DataKey, KmsClient};
use crate::core::cipher::aead::{self, KEY_LEN, NONCE_LEN};
use crate::error::KmsError;

/// Simulated key-management service.
pub struct MemoryKms {
    master_keys: Mutex<HashMap<String, Zeroizing<Vec<u8>>>>,
    /// When set, only these key ids exist.
    allowed: Option<HashSet<String>>,
    calls: AtomicUsize,
}

impl MemoryKms {
    /// A service that creates a master key the first time a key id is used.
    pub fn new() -> Self {
        Self {
            master_keys: Mutex::new(HashMap::new()),
            allowed: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// A service where only `key_ids` exist; any other id is not found.
    pub fn with_keys<I, S>(key_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            allowed: Some(key_ids.into_iter().map(Into::into).collect()),
            ..Self::new()
        }
    }

    /// Number of service calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn scope(key_id: &str, region: &str) -> String {
        format!("{}/{}", region, key_id)
    }

    fn master_key(&self, scope: &str, create: bool) -> Result<Zeroizing<Vec<u8>>, KmsError> {
        let mut keys = self
            .master_keys
            .lock()
            .map_err(|_| KmsError::Service("key table poisoned".to_string()))?;

        if let Some(key) = keys.get(scope) {
            return Ok(key.clone());
        }
        if !create {
            return Err(KmsError::AccessDenied(scope.to_string()));
        }

        let mut key = Zeroizing::new(vec![0u8; KEY_LEN]);
        rand::thread_rng().fill_bytes(&mut key);
        keys.insert(scope.to_string(), key.clone());
        Ok(key)
    }
}

impl Default for MemoryKms {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryKms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let scopes = self.master_keys.lock().map(|k| k.len()).unwrap_or(0);
        f.debug_struct("MemoryKms")
            .field("master_keys", &scopes)
            .field("allowed", &self.allowed)
            .field("calls", &self.calls())
            .finish()
    }
}

impl KmsClient for MemoryKms {
    fn generate_data_key(&self, key_id: &str, region: &str) -> Result<DataKey, KmsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(allowed) = &self.allowed {
            if !allowed.contains(key_id) {
                return Err(KmsError::KeyNotFound(key_id.to_string()));
            }
        }

        let scope = Self::scope(key_id, region);
        let master = self.master_key(&scope, true)?;

        let mut plaintext = Zeroizing::new(vec![0u8; KEY_LEN]);
        rand::thread_rng().fill_bytes(&mut plaintext);

        let sealed = aead::seal(&master, &plaintext)
            .map_err(|e| KmsError::Service(e.to_string()))?;

        // scope length (u16 BE) | scope | nonce | sealed key
        let scope_len = u16::try_from(scope.len())
            .map_err(|_| KmsError::Service("key id too long".to_string()))?;
        let mut wrapped = Vec::with_capacity(2 + scope.len() + NONCE_LEN + sealed.ciphertext.len());
        wrapped.extend_from_slice(&scope_len.to_be_bytes());
        wrapped.extend_from_slice(scope.as_bytes());
        wrapped.extend_from_slice(&sealed.nonce);
        wrapped.extend_from_slice(&sealed.ciphertext);

        Ok(DataKey { plaintext, wrapped })
    }

    fn decrypt_data_key(
        &self,
        wrapped: &[u8],
        key_id: Option<&str>,
        region: &str,
    ) -> Result<Zeroizing<Vec<u8>>, KmsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let (len_bytes, rest) = split(wrapped, 2)?;
        let scope_len = u16::from_be_bytes([len_bytes[0], len_bytes[1]]) as usize;
        let (scope_bytes, rest) = split(rest, scope_len)?;
        let (nonce, sealed) = split(rest, NONCE_LEN)?;
        let scope = std::str::from_utf8(scope_bytes).map_err(|_| KmsError::InvalidCiphertext)?;

        let (wrapped_region, wrapped_key_id) =
            scope.split_once('/').ok_or(KmsError::InvalidCiphertext)?;
        if wrapped_region != region {
            return Err(KmsError::KeyNotFound(format!(
                "{} in region {}",
                wrapped_key_id, region
            )));
        }
        if let Some(expected) = key_id {
            if expected != wrapped_key_id {
                return Err(KmsError::AccessDenied(expected.to_string()));
            }
        }

        let master = self.master_key(scope, false)?;
        aead::open(&master, nonce, sealed)
            .map(Zeroizing::new)
            .map_err(|_| KmsError::InvalidCiphertext)
    }
}

fn split(bytes: &[u8], at: usize) -> Result<(&[u8], &[u8]), KmsError> {
    if bytes.len() < at {
        return Err(KmsError::InvalidCiphertext);
    }
    Ok(bytes.split_at(at))
}
