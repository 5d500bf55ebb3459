//! Base64 transport encoding for cursor tokens.
//!
//! Tokens use the URL-safe alphabet (`-_` instead of `+/`) and omit padding,
//! so they can be dropped into query strings without further escaping.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, Engine as _, GeneralPurpose, GeneralPurposeConfig};

/// URL-safe, unpadded on output, padding-tolerant on input.
const TOKEN: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Encode bytes as a URL-safe, padding-free token.
pub(super) fn base64_encode(input: &[u8]) -> String {
    TOKEN.encode(input)
}

/// Decode a token produced by [`base64_encode`].
///
/// Also accepts the standard alphabet (`+/`) and trailing `=` padding, so a
/// token that went through a standard encoder still decodes.
pub(super) fn base64_decode(input: &str) -> Result<Vec<u8>, base64::DecodeError> {
    if input.contains(['+', '/']) {
        TOKEN.decode(input.replace('+', "-").replace('/', "_"))
    } else {
        TOKEN.decode(input)
    }
}
