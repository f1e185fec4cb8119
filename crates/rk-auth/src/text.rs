//! Text codec between Rust strings and their UTF-8 wire bytes.
//!
//! The cipher and the Base64 encoder work on bytes. Credentials enter and
//! leave as text, so every crossing goes through this module.

use crate::error::Result;

/// Encode text into its variable-width byte form.
pub fn encode(text: &str) -> Vec<u8> {
    text.as_bytes().to_vec()
}

/// Decode variable-width bytes back into text.
///
/// Fails with [`ErrorKind::InvalidText`](crate::ErrorKind::InvalidText) when
/// the bytes are not well-formed UTF-8.
pub fn decode(bytes: &[u8]) -> Result<String> {
    Ok(String::from_utf8(bytes.to_vec())?)
}
