//! Backends command.

use crate::cli::output;
use crate::core::config::Settings;
use crate::core::registry::Registry;
use crate::error::Result;

/// Print registered backend names, one per line.
pub fn execute() -> Result<()> {
    let registry = Registry::from_settings(&Settings::load()?)?;
    for name in registry.names() {
        output::raw(name);
    }
    Ok(())
}
