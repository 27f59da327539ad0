//! Multi-strategy base64 decoding
//!
//! Gmail emits URL-safe base64 without padding almost everywhere, but padded
//! and standard-alphabet payloads still show up (attachment responses, Graph
//! `contentBytes`), so the strategies are tried in that order.

use base64::Engine;
use base64::engine::GeneralPurpose;
use base64::engine::general_purpose::{STANDARD, URL_SAFE, URL_SAFE_NO_PAD};

use crate::error::{CodecError, Result};

const STRATEGIES: [(&str, &GeneralPurpose); 3] = [
    ("url-safe unpadded", &URL_SAFE_NO_PAD),
    ("url-safe padded", &URL_SAFE),
    ("standard", &STANDARD),
];

/// Decode a provider base64 payload, returning the first strategy that succeeds.
///
/// Empty input decodes to an empty vector.
pub fn decode_mail_bytes(data: &str) -> Result<Vec<u8>> {
    if data.is_empty() {
        return Ok(Vec::new());
    }

    let mut last_error = None;
    for (name, engine) in STRATEGIES {
        match engine.decode(data) {
            Ok(decoded) => return Ok(decoded),
            Err(e) => last_error = Some(format!("{name}: {e}")),
        }
    }

    Err(CodecError::Encoding(format!(
        "no base64 variant accepted input of length {} (last attempt {})",
        data.len(),
        last_error.unwrap_or_default()
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_url_safe_unpadded() {
        let decoded = decode_mail_bytes("SGVsbG8gV29ybGQ").unwrap();
        assert_eq!(decoded, b"Hello World");
    }

    #[test]
    fn test_decode_url_safe_padded() {
        let decoded = decode_mail_bytes("SGVsbG8gV29ybGQ=").unwrap();
        assert_eq!(decoded, b"Hello World");
    }

    #[test]
    fn test_decode_url_safe_alphabet() {
        let decoded = decode_mail_bytes("PGI-SGVsbG88L2I-").unwrap();
        assert_eq!(decoded, b"<b>Hello</b>");
    }

    #[test]
    fn test_decode_standard_alphabet() {
        // '/' is only valid in the standard alphabet
        let decoded = decode_mail_bytes("Pz8/").unwrap();
        assert_eq!(decoded, b"???");

        let decoded = decode_mail_bytes("+/8=").unwrap();
        assert_eq!(decoded, vec![0xfb, 0xff]);
    }

    #[test]
    fn test_decode_empty() {
        assert!(decode_mail_bytes("").unwrap().is_empty());
    }

    #[test]
    fn test_decode_invalid() {
        let err = decode_mail_bytes("!!!invalid!!!").unwrap_err();
        assert!(matches!(err, CodecError::Encoding(_)));
    }
}
