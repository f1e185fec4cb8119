//! Base64 encoding with the standard alphabet and `=` padding.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::Result;

/// Encode bytes as padded Base64. The output length is always a multiple of 4.
pub fn encode(input: impl AsRef<[u8]>) -> String {
    STANDARD.encode(input)
}

/// Decode padded Base64 back into bytes.
pub fn decode(input: impl AsRef<[u8]>) -> Result<Vec<u8>> {
    Ok(STANDARD.decode(input)?)
}
