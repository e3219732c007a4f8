//! Type aliases for domain concepts.
//!
//! Provides semantic type aliases to make function signatures more descriptive.

use crate::core::params::Params;

/// Parameters that configure an encrypt call (e.g. `keyId`, `region`).
pub type EncryptParams = Params;

/// Parameters recorded by an encrypt call and required by the matching decrypt.
pub type DecryptParams = Params;

/// Backend-encoded ciphertext, always free of the `:` separator for the
/// built-in backends.
pub type Ciphertext = String;
