//! Webhook payload authentication with HMAC-SHA256.
//!
//! A [`SignatureValidator`] owns the shared secret and answers one question:
//! does a received tag match the tag we would produce for this exact payload?
//! The payload is treated as opaque bytes; callers must pass the raw request
//! body, since any re-encoding changes the bytes and invalidates the tag.

use std::fmt;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

type HmacSha256 = Hmac<Sha256>;

/// Length in bytes of an HMAC-SHA256 tag.
pub const TAG_LEN: usize = 32;

/// An authentication tag produced by [`SignatureValidator::compute_signature`].
///
/// Intentionally has no `PartialEq`: compare tags with [`constant_time_eq`].
#[derive(Clone, Copy)]
pub struct Tag([u8; TAG_LEN]);

impl Tag {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    /// Lowercase hex rendering, as most providers send it.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Standard (padded) base64 rendering.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }
}

impl AsRef<[u8]> for Tag {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Tag").field(&self.to_hex()).finish()
    }
}

/// Verifies webhook payloads against a shared secret.
///
/// The validator is immutable after construction and can be shared across
/// tasks behind an `Arc` without locking.
#[derive(Clone)]
pub struct SignatureValidator {
    // Keyed HMAC state; cloned per call so the key schedule runs once.
    mac: HmacSha256,
}

impl SignatureValidator {
    /// Create a validator for `secret`.
    ///
    /// Any secret is accepted, including an empty one. Secret strength is a
    /// configuration concern.
    pub fn new(secret: impl AsRef<[u8]>) -> Self {
        let mac = HmacSha256::new_from_slice(secret.as_ref())
            .expect("invalid HMAC key length");
        Self { mac }
    }

    /// Compute the HMAC-SHA256 tag of `payload` under this validator's secret.
    pub fn compute_signature(&self, payload: &[u8]) -> Tag {
        let mut mac = self.mac.clone();
        mac.update(payload);

        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&mac.finalize().into_bytes());
        Tag(tag)
    }

    /// Check `received_tag` against the expected tag for `payload`.
    ///
    /// Returns `false` for any mismatch, including wrong length or an empty
    /// tag. Never panics.
    pub fn verify(&self, payload: &[u8], received_tag: &[u8]) -> bool {
        let expected = self.compute_signature(payload);
        constant_time_eq(expected.as_bytes(), received_tag)
    }
}

impl fmt::Debug for SignatureValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignatureValidator")
            .field("secret", &"<redacted>")
            .finish()
    }
}

/// Constant-time byte slice comparison.
///
/// Slices of different length are unequal without inspecting their contents.
/// Equal-length slices are compared without early exit.
pub fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
