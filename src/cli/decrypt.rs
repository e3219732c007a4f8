//! Decrypt command.

use zeroize::Zeroizing;

use crate::cli::{input, output};
use crate::core::config::Settings;
use crate::core::registry::Registry;
use crate::core::secrets;
use crate::error::Result;

/// Decrypt a secret given as an argument or on stdin and print the plaintext.
pub fn execute(secret: Option<String>) -> Result<()> {
    let secret = match secret {
        Some(s) => s,
        None => input::read_secret()?,
    };

    let registry = Registry::from_settings(&Settings::load()?)?;
    let plaintext = Zeroizing::new(secrets::decrypt(&registry, secret.trim())?);

    output::raw(&plaintext);
    Ok(())
}
