//! Backend registry.
//!
//! An immutable name → [`Crypter`] table. Built once at startup by
//! [`Registry::from_settings`] (or by hand through [`Registry::builder`]) and
//! passed by reference to whatever resolves backend names. Lookups never fall
//! back to a default backend.

use std::collections::BTreeMap;
use std::fmt;

use tracing::debug;

use crate::core::cipher::{Crypter, KmsCrypter, LocalCrypter};
use crate::core::config::Settings;
use crate::error::{CipherError, ConfigError, Result};

/// Read-only table of available backends.
pub struct Registry {
    crypters: BTreeMap<&'static str, Box<dyn Crypter>>,
}

/// Collects backends for a [`Registry`].
#[derive(Default)]
pub struct RegistryBuilder {
    crypters: BTreeMap<&'static str, Box<dyn Crypter>>,
}

impl RegistryBuilder {
    /// Add a backend under its own name.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::DuplicateBackend` if the name is already taken.
    pub fn register(mut self, crypter: impl Crypter + 'static) -> Result<Self> {
        let name = crypter.name();
        if self.crypters.contains_key(name) {
            return Err(ConfigError::DuplicateBackend(name.to_string()).into());
        }
        self.crypters.insert(name, Box::new(crypter));
        Ok(self)
    }

    pub fn build(self) -> Registry {
        Registry {
            crypters: self.crypters,
        }
    }
}

impl Registry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Build the standard registry: `kms` and `local`.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the local key is missing or invalid.
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let registry = Self::builder()
            .register(KmsCrypter::from_settings(settings))?
            .register(LocalCrypter::from_settings(settings)?)?
            .build();

        debug!(backends = ?registry.names().collect::<Vec<_>>(), "registry initialized");
        Ok(registry)
    }

    /// Resolve a backend by name.
    ///
    /// # Errors
    ///
    /// Returns `CipherError::UnknownBackend` if no backend has that name.
    pub fn get(&self, name: &str) -> Result<&dyn Crypter> {
        self.crypters
            .get(name)
            .map(|c| c.as_ref())
            .ok_or_else(|| CipherError::UnknownBackend(name.to_string()).into())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.crypters.contains_key(name)
    }

    /// Registered names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.crypters.keys().copied()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("backends", &self.names().collect::<Vec<_>>())
            .finish()
    }
}
