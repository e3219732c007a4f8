//! Test fixtures and constants.

/// A valid local key (64 hex chars).
pub const TEST_KEY_HEX: &str = "000102030405060708090a0b0c0d0e0f101112131415161718191a1b1c1d1e1f";

/// A different valid local key.
pub const OTHER_KEY_HEX: &str = "f0e0d0c0b0a090807060504030201000f0e0d0c0b0a090807060504030201000";

/// Plaintexts that exercise separators and escaping.
pub const AWKWARD_PLAINTEXTS: &[&str] = &[
    "hunter2",
    "a:b:c",
    "key=value&other=1",
    "100% sure",
    "  padded  ",
    "日本語 🔐",
    "postgres://user:p@ss@localhost:5432/db",
];
