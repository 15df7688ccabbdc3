//! Binary to text conversions shared by the cipher and crack paths

use base64::{Engine as _, engine::general_purpose};

/// Encode bytes as standard padded base64
pub fn to_base64(bytes: &[u8]) -> String {
    general_purpose::STANDARD.encode(bytes)
}

/// Decode standard padded base64
///
/// Surrounding whitespace is ignored so pasted payloads with a trailing
/// newline still decode.
pub fn from_base64(text: &str) -> Result<Vec<u8>, base64::DecodeError> {
    general_purpose::STANDARD.decode(text.trim())
}

/// Encode bytes as lower-case hex
pub fn to_hex(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Decode hex in either case
pub fn from_hex(text: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(text.trim())
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_known_value() {
        assert_eq!(to_base64(b"hello"), "aGVsbG8=");
        assert_eq!(from_base64("aGVsbG8=\n").unwrap(), b"hello");
    }

    #[test]
    fn test_base64_rejects_garbage() {
        assert!(from_base64("not base64!!").is_err());
    }

    #[test]
    fn test_hex_is_lowercase_and_case_insensitive_on_decode() {
        assert_eq!(to_hex(&[0xDE, 0xAD, 0xBE, 0xEF]), "deadbeef");
        assert_eq!(from_hex("DEADbeef").unwrap(), vec![0xDE, 0xAD, 0xBE, 0xEF]);
        assert!(from_hex("abc").is_err());
    }
}
