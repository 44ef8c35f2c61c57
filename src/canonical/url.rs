//! URL mode: the last two path segments become the payload.

use serde::Serialize;

use crate::canonical::{CanonicalError, CanonicalResult, ContentHash};

/// Everything URL mode derives from its input.
///
/// `segments`, `extracted_parts` and `combined` exist for display; only
/// `hash` is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlDigest {
    /// The last two non-empty segments, in original order.
    pub segments: [String; 2],
    /// `"<first>, <second>"`.
    pub extracted_parts: String,
    /// Segments joined with a single space.
    pub combined: String,
    pub hash: ContentHash,
}

/// Canonicalize a URL (or any `/`-separated path).
///
/// Whitespace is trimmed, the string is split on `/`, empty segments are
/// dropped, and the last two survivors are joined with a space. The UTF-8
/// bytes of that string are hex-encoded and right-padded to bytes32.
pub fn process_url(input: &str) -> CanonicalResult<UrlDigest> {
    let parts: Vec<&str> = input
        .trim()
        .split('/')
        .filter(|part| !part.is_empty())
        .collect();

    let [first, second] = match parts.as_slice() {
        [.., first, second] => [first.to_string(), second.to_string()],
        _ => return Err(CanonicalError::InputShape),
    };

    let combined = format!("{} {}", first, second);
    let hex = alloy::primitives::hex::encode(combined.as_bytes());
    let hash = ContentHash::from_digits(&hex)?;

    Ok(UrlDigest {
        extracted_parts: format!("{}, {}", first, second),
        combined,
        segments: [first, second],
        hash,
    })
}
