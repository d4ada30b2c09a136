//! Base64 transcoding (standard alphabet, padded)

use base64::{engine::general_purpose::STANDARD as B64, Engine};
use crate::application::errors::CommandError;

/// Encode the UTF-8 bytes of `text`
pub fn encode(text: &str) -> String {
    B64.encode(text.as_bytes())
}

/// Decode `input` and render the bytes as text.
///
/// Bytes that are not valid UTF-8 are replaced with U+FFFD.
pub fn decode(input: &str) -> Result<String, CommandError> {
    let bytes = B64.decode(input)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
