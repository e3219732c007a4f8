//! Secretcrypt - Encrypt secrets into self-describing strings.

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use secretcrypt::cli::output;
use secretcrypt::cli::{execute, Cli};
use secretcrypt::core::constants::LOG_ENV;
use secretcrypt::error::{CipherError, ConfigError, Error, FormatError};

fn main() {
    let cli = Cli::parse();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("secretcrypt=debug")
        } else {
            EnvFilter::new("secretcrypt=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time(),
        )
        .init();

    if let Err(e) = execute(cli.command) {
        let suggestion = match &e {
            Error::Config(ConfigError::MissingLocalKey { .. }) => {
                Some("run: secretcrypt keygen (every backend, kms included, loads the local key)")
            }
            Error::Config(ConfigError::KeyFileExists { .. }) => {
                Some("pass --force to replace it (existing secrets become unreadable)")
            }
            Error::Cipher(CipherError::UnknownBackend(_)) => Some("run: secretcrypt backends"),
            Error::Format(FormatError::MalformedSecret(_)) => {
                Some("expected <backend>:<params>:<ciphertext>")
            }
            _ => None,
        };

        output::error(&e.to_string());
        if let Some(hint) = suggestion {
            output::hint(hint);
        }
        std::process::exit(1);
    }
}
