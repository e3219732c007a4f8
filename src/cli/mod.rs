//! Command-line interface.

pub mod backends;
pub mod completions;
pub mod decrypt;
pub mod encrypt;
pub mod input;
pub mod keygen;
pub mod output;

use clap::{Parser, Subcommand};

/// Secretcrypt - Encrypt secrets into self-describing strings.
#[derive(Parser)]
#[command(
    name = "secretcrypt",
    about = "Encrypt secrets into self-describing strings",
    version,
    after_help = "Secrets look like <backend>:<params>:<ciphertext>."
)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level commands.
#[derive(Subcommand)]
pub enum Command {
    /// Encrypt plaintext read from a prompt or stdin
    Encrypt {
        /// Read all of stdin instead of the first line
        #[arg(short, long)]
        multiline: bool,

        #[command(subcommand)]
        backend: EncryptBackend,
    },

    /// Decrypt a secret
    Decrypt {
        /// Secret string (read from stdin if omitted)
        secret: Option<String>,
    },

    /// Generate the local backend key
    Keygen {
        /// Overwrite an existing key file
        #[arg(short, long)]
        force: bool,
    },

    /// List available backends
    Backends,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Backends selectable for `encrypt`.
#[derive(Subcommand)]
pub enum EncryptBackend {
    /// Envelope-encrypt with a cloud KMS key
    Kms {
        /// KMS region (defaults to the configured region)
        #[arg(short, long)]
        region: Option<String>,

        /// KMS key id, ARN or alias (e.g., alias/app)
        key_id: String,
    },

    /// Encrypt with the local key
    Local,
}

/// Execute a command.
pub fn execute(command: Command) -> crate::error::Result<()> {
    use Command::*;

    match command {
        Encrypt { multiline, backend } => encrypt::execute(backend, multiline),
        Decrypt { secret } => decrypt::execute(secret),
        Keygen { force } => keygen::execute(force),
        Backends => backends::execute(),
        Completions { shell } => completions::execute(shell),
    }
}
