//! Keygen command.
//!
//! Provisions the key used by the `local` backend.

use tracing::info;

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::keys::{self, LocalKey};
use crate::error::Result;

/// Generate a key and write it to the configured key file.
pub fn execute(force: bool) -> Result<()> {
    let settings = Settings::load()?;
    let path = settings.local_key_file()?;

    let replaced = force && path.exists();

    let key = LocalKey::generate();
    keys::write_file(&path, &key, force)?;
    info!(fingerprint = %key.fingerprint(), "generated local key");

    output::success(&format!(
        "wrote key to {}",
        output::path(&path.display().to_string())
    ));
    output::raw(&key.fingerprint());
    if replaced {
        output::warn("secrets encrypted with the previous key can no longer be decrypted");
    }
    Ok(())
}
