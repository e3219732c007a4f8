//! Parameter maps and their token encoding.
//!
//! A [`Params`] map configures an encrypt call and records what the matching
//! decrypt call needs. Inside a secret string the map is stored as a single
//! token:
//!
//! ```text
//! keyId=abc-123&nonce=q2Xg...&region=us-east-1
//! ```
//!
//! Entries are sorted by key and joined with `&`; key and value are split by
//! `=`. Every byte outside `A-Z a-z 0-9 - _ . ~` is percent-encoded, so a token
//! never contains the `:` field separator of the outer secret string.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{FormatError, Result};

const ENTRY_SEPARATOR: &str = "&";
const VALUE_SEPARATOR: char = '=';

/// String-to-string parameter map with deterministic ordering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params(BTreeMap<String, String>);

impl Params {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an entry, returning the previous value for `key`.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate entries in ascending key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Serialize into a single token.
    ///
    /// Deterministic: equal maps always produce identical tokens.
    pub fn unparse(&self) -> String {
        self.0
            .iter()
            .map(|(k, v)| {
                format!(
                    "{}{}{}",
                    urlencoding::encode(k),
                    VALUE_SEPARATOR,
                    urlencoding::encode(v)
                )
            })
            .collect::<Vec<_>>()
            .join(ENTRY_SEPARATOR)
    }

    /// Reconstruct a map from a token produced by [`Params::unparse`].
    ///
    /// # Errors
    ///
    /// Returns `FormatError::MalformedParameters` if an entry is not exactly
    /// one `key=value` pair, a key is empty or repeated, a reserved character
    /// appears unescaped, or an escape is truncated or not UTF-8.
    pub fn parse(token: &str) -> Result<Self> {
        let mut params = Self::new();
        if token.is_empty() {
            return Ok(params);
        }

        for entry in token.split(ENTRY_SEPARATOR) {
            let mut parts = entry.split(VALUE_SEPARATOR);
            let (raw_key, raw_value) = match (parts.next(), parts.next(), parts.next()) {
                (Some(k), Some(v), None) => (k, v),
                _ => {
                    return Err(malformed(format!(
                        "entry '{}' is not a single key=value pair",
                        entry
                    )))
                }
            };

            let key = decode(raw_key)?;
            if key.is_empty() {
                return Err(malformed("empty key".to_string()));
            }
            let value = decode(raw_value)?;

            if params.insert(key.clone(), value).is_some() {
                return Err(malformed(format!("duplicate key '{}'", key)));
            }
        }

        Ok(params)
    }
}

impl fmt::Display for Params {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.unparse())
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Params {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Params {
    fn from(entries: [(K, V); N]) -> Self {
        entries.into_iter().collect()
    }
}

fn malformed(reason: String) -> crate::error::Error {
    FormatError::MalformedParameters(reason).into()
}

fn is_unreserved(b: u8) -> bool {
    b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~')
}

/// Strictly decode one percent-encoded component.
///
/// `urlencoding::decode` passes invalid escapes through unchanged, so the
/// component is validated byte by byte first.
fn decode(component: &str) -> Result<String> {
    let bytes = component.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' => {
                let escape = bytes.get(i + 1..i + 3).ok_or_else(|| {
                    malformed(format!("truncated escape in '{}'", component))
                })?;
                if !escape.iter().all(u8::is_ascii_hexdigit) {
                    return Err(malformed(format!("invalid escape in '{}'", component)));
                }
                i += 3;
            }
            b if is_unreserved(b) => i += 1,
            b => {
                return Err(malformed(format!(
                    "unescaped reserved character '{}' in '{}'",
                    b.escape_ascii(),
                    component
                )))
            }
        }
    }

    urlencoding::decode(component)
        .map(|decoded| decoded.into_owned())
        .map_err(|e| malformed(format!("escapes are not valid UTF-8: {}", e)))
}
