//! Test assertion helpers.

use std::process::Output;

/// Assert that a command output was successful.
pub fn assert_success(output: &Output) {
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        panic!("Command failed:\n{}", stderr);
    }
}

/// Assert that a command output failed.
pub fn assert_failure(output: &Output) {
    assert!(
        !output.status.success(),
        "Expected command to fail but it succeeded"
    );
}

/// Get stdout as String.
pub fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

/// Get stderr as String.
pub fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

/// Assert stderr contains a string.
pub fn assert_stderr_contains(output: &Output, expected: &str) {
    let err = stderr(output);
    assert!(
        err.contains(expected),
        "stderr missing '{}', got: {}",
        expected,
        err
    );
}

/// Assert a string has the `<backend>:<params>:<ciphertext>` shape.
pub fn assert_secret_format(secret: &str, backend: &str) {
    let fields: Vec<&str> = secret.splitn(3, ':').collect();
    assert_eq!(fields.len(), 3, "not a secret string: {}", secret);
    assert_eq!(fields[0], backend, "wrong backend in: {}", secret);
    assert!(!fields[2].is_empty(), "empty ciphertext in: {}", secret);
}

/// Assert a local encrypt/decrypt roundtrip through the CLI.
pub fn assert_roundtrip(t: &super::Test, plaintext: &str) {
    let secret = t.local_secret(plaintext);
    assert_secret_format(&secret, "local");

    let output = t.decrypt(&secret);
    assert_success(&output);
    assert_eq!(stdout(&output), format!("{}\n", plaintext));
}
