//! String → bytes32 canonicalization.
//!
//! # Data Flow
//! ```text
//! raw input (URL or hex token)
//!     → url.rs  (last two path segments → UTF-8 → hex)
//!     → hex.rs  (validate hex digits, strip 0x)
//!     → ContentHash ("0x" + 64 hex digits, right-padded with '0')
//! ```
//!
//! Both entry points are pure: no I/O, no wallet or network state.

pub mod hex;
pub mod url;

use alloy::primitives::B256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

pub use self::hex::format_hex;
pub use self::url::{process_url, UrlDigest};

/// Number of hex digits in a bytes32 value.
pub const BYTES32_HEX_LEN: usize = 64;

/// Errors raised while canonicalizing user input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CanonicalError {
    /// URL input has fewer than two non-empty path segments.
    #[error("URL must have at least 2 path segments")]
    InputShape,

    /// Hex input contains characters outside `[0-9a-fA-F]`.
    #[error("Invalid hex format: {0:?}")]
    InvalidHexFormat(String),

    /// Input was empty (or only a `0x` prefix).
    #[error("Input is empty")]
    EmptyInput,

    /// Payload does not fit in 32 bytes.
    #[error("Payload is {len} hex digits, bytes32 holds at most 64")]
    PayloadTooLong { len: usize },
}

/// Result type for canonicalization.
pub type CanonicalResult<T> = Result<T, CanonicalError>;

/// Which entry point to run on a raw input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InputMode {
    /// Last two URL path segments, UTF-8 encoded.
    Url,
    /// A hex token, optionally `0x`-prefixed.
    Hex,
}

impl fmt::Display for InputMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputMode::Url => f.write_str("url"),
            InputMode::Hex => f.write_str("hex"),
        }
    }
}

/// A canonical bytes32 value: `0x` followed by exactly 64 hex digits.
///
/// The digit case of the original input is preserved, so formatting an
/// already-canonical value is the identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ContentHash(String);

impl ContentHash {
    /// Pad a run of hex digits (no prefix) to 64 digits.
    ///
    /// Callers must have validated `digits` as non-empty hex.
    pub(crate) fn from_digits(digits: &str) -> CanonicalResult<Self> {
        if digits.len() > BYTES32_HEX_LEN {
            return Err(CanonicalError::PayloadTooLong { len: digits.len() });
        }
        Ok(Self(format!("0x{:0<width$}", digits, width = BYTES32_HEX_LEN)))
    }

    /// The `0x`-prefixed string form.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The 64 hex digits without prefix.
    pub fn digits(&self) -> &str {
        &self.0[2..]
    }

    /// Decode into a fixed 32-byte value.
    pub fn to_b256(&self) -> Result<B256, alloy::primitives::hex::FromHexError> {
        B256::from_str(&self.0)
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for ContentHash {
    type Err = CanonicalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        format_hex(s)
    }
}

impl AsRef<str> for ContentHash {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonicalized input, with the URL-mode display fields when available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedInput {
    pub mode: InputMode,
    pub hash: ContentHash,
    /// Present only for [`InputMode::Url`].
    pub url: Option<UrlDigest>,
}

/// Run the entry point selected by `mode`.
pub fn canonicalize(mode: InputMode, raw: &str) -> CanonicalResult<ProcessedInput> {
    let result = match mode {
        InputMode::Url => process_url(raw).map(|digest| ProcessedInput {
            mode,
            hash: digest.hash.clone(),
            url: Some(digest),
        }),
        InputMode::Hex => format_hex(raw).map(|hash| ProcessedInput {
            mode,
            hash,
            url: None,
        }),
    };

    crate::observability::metrics::record_canonicalize(mode, result.is_ok());
    result
}
