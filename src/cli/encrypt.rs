//! Encrypt command.
//!
//! Reads plaintext, encrypts it with the chosen backend and prints the
//! secret string on stdout.

use tracing::info;

use crate::cli::{input, output, EncryptBackend};
use crate::core::config::Settings;
use crate::core::constants::{param, KMS_BACKEND, LOCAL_BACKEND};
use crate::core::registry::Registry;
use crate::core::secrets;
use crate::core::types::EncryptParams;
use crate::error::Result;

/// Encrypt plaintext from the prompt or stdin.
pub fn execute(backend: EncryptBackend, multiline: bool) -> Result<()> {
    let settings = Settings::load()?;
    let registry = Registry::from_settings(&settings)?;

    let (name, params) = match backend {
        EncryptBackend::Kms { region, key_id } => {
            let region = region.unwrap_or_else(|| settings.kms.default_region.clone());
            let params = EncryptParams::new()
                .with(param::KEY_ID, key_id)
                .with(param::REGION, region);
            (KMS_BACKEND, params)
        }
        EncryptBackend::Local => (LOCAL_BACKEND, EncryptParams::new()),
    };

    let plaintext = input::read_plaintext(multiline)?;
    info!(backend = name, "encrypting plaintext");

    let secret = secrets::encrypt(&registry, name, &plaintext, &params)?;
    output::raw(&secret.to_string());
    Ok(())
}
