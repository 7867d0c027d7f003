//! Explicit character-set handling.
//!
//! Every text-to-bytes conversion in this crate goes through a `Charset`
//! value supplied by the caller.  Encoders never assume a platform default:
//! the stored credential formats this crate reproduces were written by
//! systems with their own charset configuration, and a silent default is
//! exactly how verification breaks on non-ASCII passwords.

use crate::errors::{EncoderError, Result};

/// Character sets supported for plaintext and encoded-text conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Charset {
    /// UTF-8 (the default for every modern backend).
    #[default]
    Utf8,
    /// Strict 7-bit ASCII.
    Ascii,
    /// ISO-8859-1, one byte per code point.
    Latin1,
}

impl Charset {
    /// Convert text to bytes in this charset.
    ///
    /// Fails if the text contains characters the charset cannot represent.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            Charset::Utf8 => Ok(text.as_bytes().to_vec()),
            Charset::Ascii => {
                if !text.is_ascii() {
                    return Err(EncoderError::Charset(
                        "non-ASCII character in ASCII conversion".into(),
                    ));
                }
                Ok(text.as_bytes().to_vec())
            }
            Charset::Latin1 => text
                .chars()
                .map(|c| {
                    u8::try_from(u32::from(c)).map_err(|_| {
                        EncoderError::Charset(format!("character {c:?} outside Latin-1"))
                    })
                })
                .collect(),
        }
    }

    /// Convert bytes in this charset back to text.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            Charset::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| EncoderError::Charset(format!("invalid UTF-8: {e}"))),
            Charset::Ascii => {
                if !bytes.is_ascii() {
                    return Err(EncoderError::Charset(
                        "non-ASCII byte in ASCII conversion".into(),
                    ));
                }
                // ASCII is a subset of UTF-8.
                Ok(String::from_utf8(bytes.to_vec())
                    .map_err(|e| EncoderError::Charset(format!("invalid ASCII: {e}")))?)
            }
            Charset::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    /// Parse a charset name as it appears in configuration or on the CLI.
    pub fn parse(name: &str) -> Result<Charset> {
        match name.to_ascii_lowercase().as_str() {
            "utf-8" | "utf8" => Ok(Charset::Utf8),
            "ascii" | "us-ascii" => Ok(Charset::Ascii),
            "latin1" | "latin-1" | "iso-8859-1" => Ok(Charset::Latin1),
            other => Err(EncoderError::Charset(format!("unknown charset '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn utf8_roundtrip() {
        let text = "a secret with other characters like $£\"!&*(";
        let bytes = Charset::Utf8.encode(text).unwrap();
        assert_eq!(Charset::Utf8.decode(&bytes).unwrap(), text);
    }

    #[test]
    fn ascii_rejects_non_ascii() {
        assert!(Charset::Ascii.encode("héllo").is_err());
        assert!(Charset::Ascii.decode(&[0x80]).is_err());
    }

    #[test]
    fn latin1_single_byte_per_char() {
        let bytes = Charset::Latin1.encode("héllo").unwrap();
        assert_eq!(bytes.len(), 5);
        assert_eq!(Charset::Latin1.decode(&bytes).unwrap(), "héllo");
    }

    #[test]
    fn latin1_rejects_wide_chars() {
        assert!(Charset::Latin1.encode("€").is_err());
    }

    #[test]
    fn parse_known_names() {
        assert_eq!(Charset::parse("UTF-8").unwrap(), Charset::Utf8);
        assert_eq!(Charset::parse("iso-8859-1").unwrap(), Charset::Latin1);
        assert!(Charset::parse("ebcdic").is_err());
    }
}
