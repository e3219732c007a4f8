//! Secret string format.
//!
//! A secret is three `:`-separated fields:
//!
//! ```text
//! <backend>:<params token>:<ciphertext>
//! ```
//!
//! Parsing consumes exactly the first two separators; everything after the
//! second `:` is the ciphertext, verbatim. The backend name and the token are
//! checked when composing so the round trip always holds.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::constants::SECRET_SEPARATOR;
use crate::core::params::Params;
use crate::core::types::{Ciphertext, DecryptParams};
use crate::error::{Error, FormatError, Result};

/// A parsed secret string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Secret {
    backend: String,
    params: DecryptParams,
    ciphertext: Ciphertext,
}

impl Secret {
    /// Compose a secret from its parts.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::MalformedSecret` if the backend name is empty or
    /// contains `:`, or the serialized params would contain `:`.
    pub fn new(
        backend: impl Into<String>,
        params: DecryptParams,
        ciphertext: impl Into<Ciphertext>,
    ) -> Result<Self> {
        let backend = backend.into();
        if backend.is_empty() {
            return Err(malformed("backend name is empty"));
        }
        if backend.contains(SECRET_SEPARATOR) {
            return Err(malformed(format!(
                "backend name '{}' contains '{}'",
                backend, SECRET_SEPARATOR
            )));
        }
        if params.unparse().contains(SECRET_SEPARATOR) {
            return Err(malformed(format!(
                "parameter token contains '{}'",
                SECRET_SEPARATOR
            )));
        }

        Ok(Self {
            backend,
            params,
            ciphertext: ciphertext.into(),
        })
    }

    /// Parse a secret string into backend name, params and ciphertext.
    ///
    /// The backend name is not resolved here.
    ///
    /// # Errors
    ///
    /// Returns `FormatError::MalformedSecret` on fewer than three fields or an
    /// empty backend name, and `FormatError::MalformedParameters` if the token
    /// does not decode.
    pub fn parse(s: &str) -> Result<Self> {
        let (backend, token, ciphertext) = split(s)?;

        Ok(Self {
            backend: backend.to_string(),
            params: Params::parse(token)?,
            ciphertext: ciphertext.to_string(),
        })
    }

    pub fn backend(&self) -> &str {
        &self.backend
    }

    pub fn params(&self) -> &DecryptParams {
        &self.params
    }

    pub fn ciphertext(&self) -> &str {
        &self.ciphertext
    }

    pub fn into_parts(self) -> (String, DecryptParams, Ciphertext) {
        (self.backend, self.params, self.ciphertext)
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{sep}{}{sep}{}",
            self.backend,
            self.params,
            self.ciphertext,
            sep = SECRET_SEPARATOR
        )
    }
}

impl FromStr for Secret {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Secret {
    type Error = Error;

    fn try_from(s: String) -> Result<Self> {
        Self::parse(&s)
    }
}

impl From<Secret> for String {
    fn from(secret: Secret) -> Self {
        secret.to_string()
    }
}

/// Split a secret string into its raw backend, token and ciphertext fields
/// without decoding the token.
///
/// # Errors
///
/// Returns `FormatError::MalformedSecret` on fewer than three fields or an
/// empty backend name.
pub fn split(s: &str) -> Result<(&str, &str, &str)> {
    let mut fields = s.splitn(3, SECRET_SEPARATOR);
    let (backend, token, ciphertext) = match (fields.next(), fields.next(), fields.next()) {
        (Some(b), Some(t), Some(c)) => (b, t, c),
        _ => {
            return Err(malformed(format!(
                "expected <backend>{sep}<params>{sep}<ciphertext>",
                sep = SECRET_SEPARATOR
            )))
        }
    };

    if backend.is_empty() {
        return Err(malformed("backend name is empty"));
    }
    Ok((backend, token, ciphertext))
}

fn malformed(reason: impl Into<String>) -> Error {
    FormatError::MalformedSecret(reason.into()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn is_malformed_secret(s: &str) -> bool {
        matches!(
            Secret::parse(s),
            Err(Error::Format(FormatError::MalformedSecret(_)))
        )
    }

    #[test]
    fn test_display_joins_three_fields() {
        let params = DecryptParams::from([("nonce", "abc")]);
        let secret = Secret::new("local", params, "Zm9v").unwrap();
        assert_eq!(secret.to_string(), "local:nonce=abc:Zm9v");
    }

    #[test]
    fn test_parse_splits_fields() {
        let secret = Secret::parse("kms:keyId=abc-123&region=us-east-1:AAAA").unwrap();
        assert_eq!(secret.backend(), "kms");
        assert_eq!(secret.params().get("keyId"), Some("abc-123"));
        assert_eq!(secret.params().get("region"), Some("us-east-1"));
        assert_eq!(secret.ciphertext(), "AAAA");
    }

    #[test]
    fn test_ciphertext_keeps_extra_separators() {
        let secret = Secret::parse("local:nonce=n:a:b::c").unwrap();
        assert_eq!(secret.ciphertext(), "a:b::c");
        assert_eq!(secret.to_string(), "local:nonce=n:a:b::c");
    }

    #[test]
    fn test_empty_token_and_ciphertext() {
        let secret = Secret::parse("local::").unwrap();
        assert!(secret.params().is_empty());
        assert_eq!(secret.ciphertext(), "");
        assert_eq!(secret.to_string(), "local::");
    }

    #[test]
    fn test_parse_rejects_missing_fields() {
        assert!(is_malformed_secret(""));
        assert!(is_malformed_secret("garbage"));
        assert!(is_malformed_secret("local:nonce=abc"));
    }

    #[test]
    fn test_parse_rejects_empty_backend() {
        assert!(is_malformed_secret(":nonce=abc:Zm9v"));
    }

    #[test]
    fn test_parse_reports_bad_token_as_parameters_error() {
        assert!(matches!(
            Secret::parse("local:nonce:Zm9v"),
            Err(Error::Format(FormatError::MalformedParameters(_)))
        ));
    }

    #[test]
    fn test_new_rejects_bad_backend_names() {
        assert!(Secret::new("", DecryptParams::new(), "x").is_err());
        assert!(Secret::new("a:b", DecryptParams::new(), "x").is_err());
    }

    #[test]
    fn test_new_accepts_params_with_reserved_characters() {
        // The codec escapes ':' so the token stays a single field.
        let params = DecryptParams::from([("path", "a:b")]);
        let secret = Secret::new("local", params.clone(), "x").unwrap();
        let parsed = Secret::parse(&secret.to_string()).unwrap();
        assert_eq!(parsed.params(), &params);
    }

    #[test]
    fn test_split_leaves_token_undecoded() {
        let (backend, token, ciphertext) = split("vault:%ZZ:a:b").unwrap();
        assert_eq!(backend, "vault");
        assert_eq!(token, "%ZZ");
        assert_eq!(ciphertext, "a:b");
        assert!(split("vault:%ZZ").is_err());
    }

    #[test]
    fn test_from_str() {
        let secret: Secret = "local:nonce=abc:Zm9v".parse().unwrap();
        assert_eq!(secret.backend(), "local");
        assert!("nope".parse::<Secret>().is_err());
    }
}
