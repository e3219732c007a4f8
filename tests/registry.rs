//! Registry integration tests.

use std::sync::Arc;

use secretcrypt::core::cipher::{Crypter, Encrypted, KmsCrypter, LocalCrypter, MemoryKms};
use secretcrypt::core::config::Settings;
use secretcrypt::core::keys::{self, LocalKey};
use secretcrypt::core::registry::Registry;
use secretcrypt::core::secrets;
use secretcrypt::core::types::{DecryptParams, EncryptParams};
use secretcrypt::error::{CipherError, ConfigError, Error, Result};
use tempfile::TempDir;

/// Reversible toy backend used to prove the registry is open for extension.
struct Reverse;

impl Crypter for Reverse {
    fn name(&self) -> &'static str {
        "reverse"
    }

    fn encrypt(&self, plaintext: &str, _params: &EncryptParams) -> Result<Encrypted> {
        Ok(Encrypted {
            ciphertext: plaintext.chars().rev().collect(),
            decrypt_params: DecryptParams::new(),
        })
    }

    fn decrypt(&self, ciphertext: &str, _params: &DecryptParams) -> Result<String> {
        Ok(ciphertext.chars().rev().collect())
    }
}

fn settings_with_key_file(dir: &TempDir) -> Settings {
    let path = dir.path().join("key");
    keys::write_file(&path, &LocalKey::generate(), false).unwrap();

    let mut settings = Settings::default();
    settings.local.key_file = Some(path);
    settings
}

#[test]
fn test_from_settings_registers_builtin_backends() {
    let dir = TempDir::new().unwrap();
    let registry = Registry::from_settings(&settings_with_key_file(&dir)).unwrap();
    assert_eq!(registry.names().collect::<Vec<_>>(), vec!["kms", "local"]);
}

#[test]
fn test_from_settings_fails_without_local_key() {
    let dir = TempDir::new().unwrap();
    let mut settings = Settings::default();
    settings.local.key_file = Some(dir.path().join("missing"));

    // Only meaningful when the environment does not carry a key.
    if std::env::var("SECRETCRYPT_LOCAL_KEY").is_ok() {
        return;
    }
    assert!(matches!(
        Registry::from_settings(&settings),
        Err(Error::Config(ConfigError::MissingLocalKey { .. }))
    ));
}

#[test]
fn test_unknown_backend() {
    let registry = Registry::builder()
        .register(LocalCrypter::new(LocalKey::generate()))
        .unwrap()
        .build();

    assert!(matches!(
        registry.get("kms"),
        Err(Error::Cipher(CipherError::UnknownBackend(_)))
    ));
    assert!(matches!(
        secrets::decrypt(&registry, "kms:keyId=a:Zm9v"),
        Err(Error::Cipher(CipherError::UnknownBackend(_)))
    ));
}

#[test]
fn test_custom_backend() {
    let registry = Registry::builder()
        .register(Reverse)
        .unwrap()
        .register(KmsCrypter::new(Arc::new(MemoryKms::new()), "us-east-1"))
        .unwrap()
        .build();

    let secret = secrets::encrypt(&registry, "reverse", "abc", &EncryptParams::new()).unwrap();
    assert_eq!(secret.to_string(), "reverse::cba");
    assert_eq!(
        secrets::decrypt(&registry, "reverse::cba").unwrap(),
        "abc"
    );
}

#[test]
fn test_duplicate_backend_rejected() {
    let result = Registry::builder().register(Reverse).unwrap().register(Reverse);
    assert!(matches!(
        result,
        Err(Error::Config(ConfigError::DuplicateBackend(name))) if name == "reverse"
    ));
}

#[test]
fn test_concurrent_use() {
    let registry = Arc::new(
        Registry::builder()
            .register(LocalCrypter::new(LocalKey::generate()))
            .unwrap()
            .build(),
    );

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let registry = Arc::clone(&registry);
            std::thread::spawn(move || {
                let plaintext = format!("secret-{}", i);
                let secret =
                    secrets::encrypt(&registry, "local", &plaintext, &EncryptParams::new())
                        .unwrap();
                assert_eq!(
                    secrets::decrypt(&registry, &secret.to_string()).unwrap(),
                    plaintext
                );
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
