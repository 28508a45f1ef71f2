//! Notification payload codec.
//!
//! The tracker ships notification bodies as gzip-compressed UTF-8 text wrapped
//! in standard base64.

use std::io::{Read, Write};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use flate2::Compression;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use thiserror::Error;

/// Reasons a payload could not be turned back into text.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// The notification carried no content at all
    #[error("notification has no content")]
    MissingContent,

    #[error("payload is not valid base64: {0}")]
    Base64(String),

    /// Bad gzip magic, corrupt deflate data or a truncated stream
    #[error("payload could not be decompressed: {0}")]
    Decompress(String),

    #[error("decompressed payload is not valid UTF-8")]
    Utf8,
}

/// Decodes a base64 + gzip payload into plain text.
pub fn decode(encoded: &str) -> Result<String, DecodeError> {
    let compressed = STANDARD
        .decode(encoded.trim())
        .map_err(|e| DecodeError::Base64(e.to_string()))?;

    let mut decoder = GzDecoder::new(compressed.as_slice());
    let mut bytes = Vec::new();
    decoder
        .read_to_end(&mut bytes)
        .map_err(|e| DecodeError::Decompress(e.to_string()))?;

    String::from_utf8(bytes).map_err(|_| DecodeError::Utf8)
}

/// Encodes plain text with the same scheme `decode` reverses.
pub fn encode(text: &str) -> std::io::Result<String> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(text.as_bytes())?;
    let compressed = encoder.finish()?;
    Ok(STANDARD.encode(compressed))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_ascii() {
        let text = "\n--------------------\nHello\nhttps://tracker.example/issue/ABC-123\nWorld\n";
        let encoded = encode(text).unwrap();
        assert_eq!(decode(&encoded).unwrap(), text);
    }

    #[test]
    fn test_round_trip_multibyte() {
        let text = "Привет, 世界 🚀\n<p>résumé</p>";
        let encoded = encode(text).unwrap();
        assert_eq!(decode(&encoded).unwrap(), text);
    }

    #[test]
    fn test_round_trip_large_payload() {
        let text = "line of notification text\n".repeat(5_000);
        let encoded = encode(&text).unwrap();
        assert_eq!(decode(&encoded).unwrap(), text);
    }

    #[test]
    fn test_invalid_base64() {
        let result = decode("this is *not* base64!");
        assert!(matches!(result, Err(DecodeError::Base64(_))));
    }

    #[test]
    fn test_wrong_magic_bytes() {
        // Valid base64, but the bytes are plain text rather than gzip
        let encoded = STANDARD.encode("just some text");
        let result = decode(&encoded);
        assert!(matches!(result, Err(DecodeError::Decompress(_))));
    }

    #[test]
    fn test_truncated_stream() {
        let encoded = encode("a payload that loses its trailer").unwrap();
        let mut bytes = STANDARD.decode(encoded).unwrap();
        bytes.truncate(bytes.len() - 4);

        let result = decode(&STANDARD.encode(bytes));
        assert!(matches!(result, Err(DecodeError::Decompress(_))));
    }

    #[test]
    fn test_non_utf8_output() {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&[0xff, 0xfe, 0xfd]).unwrap();
        let encoded = STANDARD.encode(encoder.finish().unwrap());

        assert_eq!(decode(&encoded), Err(DecodeError::Utf8));
    }
}
