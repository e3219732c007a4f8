//! Reading plaintext and secrets from the terminal or a pipe.

use std::io::{self, BufRead, IsTerminal, Read};

use dialoguer::Password;
use zeroize::Zeroizing;

use crate::error::{Error, Result};

/// How plaintext is read from stdin.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Source {
    /// Hidden single-line prompt
    Prompt,
    /// First line, line ending stripped
    Line,
    /// Everything up to EOF
    All,
}

/// `--multiline` always reads to EOF, terminal or not.
fn source(is_tty: bool, multiline: bool) -> Source {
    match (multiline, is_tty) {
        (true, _) => Source::All,
        (false, true) => Source::Prompt,
        (false, false) => Source::Line,
    }
}

/// Read the plaintext to encrypt.
///
/// With `multiline`, reads all of stdin until EOF (announcing this on stderr
/// when stdin is a terminal). Otherwise prompts with hidden input on a
/// terminal, or reads the first line (line ending stripped) from a pipe.
///
/// # Errors
///
/// Returns `Error::Input` if single-line input is empty.
pub fn read_plaintext(multiline: bool) -> Result<Zeroizing<String>> {
    let is_tty = io::stdin().is_terminal();

    match source(is_tty, multiline) {
        Source::Prompt => {
            let value = Password::new().with_prompt("Plaintext").interact()?;
            Ok(Zeroizing::new(value))
        }
        Source::All => {
            if is_tty {
                eprintln!("Enter plaintext (end with Ctrl-D):");
            }
            read_piped(io::stdin().lock(), true)
        }
        Source::Line => read_piped(io::stdin().lock(), false),
    }
}

/// Read a secret string from stdin when it is not given as an argument.
pub fn read_secret() -> Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;

    let secret = line.trim();
    if secret.is_empty() {
        return Err(Error::Input("no secret given on stdin".to_string()));
    }
    Ok(secret.to_string())
}

fn read_piped<R: BufRead>(mut reader: R, multiline: bool) -> Result<Zeroizing<String>> {
    let mut value = Zeroizing::new(String::new());

    if multiline {
        reader.read_to_string(&mut value)?;
        return Ok(value);
    }

    reader.read_line(&mut value)?;
    strip_line_ending(&mut value);
    if value.is_empty() {
        return Err(Error::Input("plaintext is empty".to_string()));
    }
    Ok(value)
}

fn strip_line_ending(line: &mut String) {
    if line.ends_with('\n') {
        line.pop();
        if line.ends_with('\r') {
            line.pop();
        }
    }
}
