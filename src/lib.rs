//! Secretcrypt - Encrypt secrets into self-describing strings.
//!
//! A secret is stored as `<backend>:<params>:<ciphertext>` and can be turned
//! back into plaintext from that string alone, given access to the backend's
//! keys.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── encrypt       # Encrypt plaintext into a secret
//! │   ├── decrypt       # Decrypt a secret
//! │   ├── keygen        # Provision the local key
//! │   ├── input         # Prompt / stdin handling
//! │   └── completions   # Shell completions
//! └── core/             # Core library components
//!     ├── params        # Parameter map and token codec
//!     ├── cipher/       # Encryption backends
//!     │   ├── mod       # Crypter trait
//!     │   ├── aead      # AES-256-GCM primitives
//!     │   ├── local     # Local key backend
//!     │   └── kms/      # Envelope encryption (AWS, in-memory)
//!     ├── registry      # Backend name → Crypter
//!     ├── secret        # Secret string format
//!     ├── secrets       # Encrypt/decrypt flows
//!     ├── keys          # Local key provisioning
//!     └── config        # ~/.secretcrypt/config.toml
//! ```
//!
//! # Example
//!
//! ```no_run
//! use secretcrypt::core::config::Settings;
//! use secretcrypt::core::registry::Registry;
//! use secretcrypt::core::secrets;
//! use secretcrypt::core::types::EncryptParams;
//!
//! # fn main() -> secretcrypt::error::Result<()> {
//! let registry = Registry::from_settings(&Settings::load()?)?;
//! let params = EncryptParams::from([("keyId", "alias/app"), ("region", "us-east-1")]);
//! let secret = secrets::encrypt(&registry, "kms", "hunter2", &params)?;
//! assert_eq!(secrets::decrypt(&registry, &secret.to_string())?, "hunter2");
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod core;
pub mod error;
