//! Extraction and decoding of the signature header.
//!
//! Providers send the tag as text. We accept lowercase or uppercase hex, or
//! standard base64, optionally prefixed with `sha256=` (GitHub style).

use std::fmt;
use std::str::FromStr;

use axum::http::HeaderMap;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

const SHA256_PREFIX: &str = "sha256=";

/// Transport encoding of the tag inside the signature header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignatureEncoding {
    #[default]
    Hex,
    Base64,
}

impl FromStr for SignatureEncoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hex" => Ok(SignatureEncoding::Hex),
            "base64" => Ok(SignatureEncoding::Base64),
            other => Err(format!("unknown signature encoding: {other}")),
        }
    }
}

impl fmt::Display for SignatureEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SignatureEncoding::Hex => f.write_str("hex"),
            SignatureEncoding::Base64 => f.write_str("base64"),
        }
    }
}

/// Why a signature header could not be turned into tag bytes.
///
/// All variants end in the same 401; they differ only for logging.
#[derive(Debug, Error)]
pub enum SignatureHeaderError {
    #[error("signature header is missing")]
    Missing,

    #[error("signature header contains non visible-ASCII characters")]
    NotVisibleAscii,

    #[error("signature header is empty")]
    Empty,

    #[error("signature is not valid hex: {0}")]
    InvalidHex(#[from] hex::FromHexError),

    #[error("signature is not valid base64: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

impl SignatureHeaderError {
    /// Short, stable label for structured logs.
    pub fn reason(&self) -> &'static str {
        match self {
            SignatureHeaderError::Missing => "missing",
            SignatureHeaderError::NotVisibleAscii => "not_visible_ascii",
            SignatureHeaderError::Empty => "empty",
            SignatureHeaderError::InvalidHex(_) => "invalid_hex",
            SignatureHeaderError::InvalidBase64(_) => "invalid_base64",
        }
    }
}

/// Decode the textual tag from a signature header value.
pub fn decode_tag(
    raw: &str,
    encoding: SignatureEncoding,
) -> Result<Vec<u8>, SignatureHeaderError> {
    let trimmed = raw.trim();
    let value = trimmed.strip_prefix(SHA256_PREFIX).unwrap_or(trimmed);

    if value.is_empty() {
        return Err(SignatureHeaderError::Empty);
    }

    let bytes = match encoding {
        SignatureEncoding::Hex => hex::decode(value)?,
        SignatureEncoding::Base64 => STANDARD.decode(value)?,
    };

    Ok(bytes)
}

/// Look up `header_name` in `headers` and decode its tag.
pub fn extract_tag(
    headers: &HeaderMap,
    header_name: &str,
    encoding: SignatureEncoding,
) -> Result<Vec<u8>, SignatureHeaderError> {
    let value = headers
        .get(header_name)
        .ok_or(SignatureHeaderError::Missing)?;

    let raw = value
        .to_str()
        .map_err(|_| SignatureHeaderError::NotVisibleAscii)?;

    decode_tag(raw, encoding)
}
