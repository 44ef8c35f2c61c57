//! Hex mode: a hex token is right-padded to bytes32.

use crate::canonical::{CanonicalError, CanonicalResult, ContentHash};

/// Canonicalize a hex token, optionally `0x`-prefixed.
///
/// Digits must match `[0-9a-fA-F]+`. Case is preserved; an input that is
/// already 64 digits comes back unchanged.
pub fn format_hex(input: &str) -> CanonicalResult<ContentHash> {
    let trimmed = input.trim();
    let digits = trimmed.strip_prefix("0x").unwrap_or(trimmed);

    if digits.is_empty() {
        return Err(CanonicalError::EmptyInput);
    }
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(CanonicalError::InvalidHexFormat(trimmed.to_string()));
    }

    ContentHash::from_digits(digits)
}
