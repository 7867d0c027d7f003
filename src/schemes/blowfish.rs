//! bcrypt, the OpenBSD Blowfish shadow format.
//!
//! Stored values look like `$2b$10$<22 chars of salt><31 chars of hash>`.
//! The cost factor and salt are embedded in the stored string, so
//! verification hands the whole thing back to the bcrypt routine.

use pwhash::bcrypt;

use crate::charset::Charset;
use crate::encoder::Encoder;
use crate::errors::{EncoderError, Result};

pub const UNIX_BLOWFISH_ID: &str = "unix-blowfish";

const PREFIXES: &[&str] = &["$2$", "$2a$", "$2b$", "$2y$"];

pub struct BlowfishEncoder;

impl Encoder for BlowfishEncoder {
    fn id(&self) -> &str {
        UNIX_BLOWFISH_ID
    }

    fn is_of_type(&self, encoded: &[u8], charset: Charset) -> bool {
        charset
            .decode(encoded)
            .map(|s| PREFIXES.iter().any(|p| s.starts_with(p)))
            .unwrap_or(false)
    }

    fn encode(
        &self,
        plain: &[u8],
        salt: Option<&[u8]>,
        _passphrase: Option<&[u8]>,
        charset: Charset,
    ) -> Result<Vec<u8>> {
        let hashed = match salt {
            None => bcrypt::hash(plain)
                .map_err(|e| EncoderError::Crypto(format!("bcrypt failed: {e}")))?,
            // A full `$2..$` string doubles as the salt specification.
            Some(bytes) => bcrypt::hash_with(charset.decode(bytes)?.as_str(), plain)
                .map_err(|e| EncoderError::Crypto(format!("bcrypt failed: {e}")))?,
        };
        charset.encode(&hashed)
    }

    fn matches(
        &self,
        encoded: &[u8],
        plain: &[u8],
        _passphrase: Option<&[u8]>,
        charset: Charset,
    ) -> Result<bool> {
        let stored = charset.decode(encoded)?;
        if stored == "*" || stored.starts_with('!') {
            return Ok(false);
        }
        if !PREFIXES.iter().any(|p| stored.starts_with(p)) {
            return Err(EncoderError::Crypto(
                "encoded data does not carry a $2$ family magic".into(),
            ));
        }
        Ok(bcrypt::verify(plain, &stored))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_and_verify() {
        let enc = BlowfishEncoder;
        let out = enc.encode(b"asecret", None, None, Charset::Utf8).unwrap();
        assert!(enc.is_of_type(&out, Charset::Utf8));
        assert!(enc.matches(&out, b"asecret", None, Charset::Utf8).unwrap());
        assert!(!enc.matches(&out, b"other", None, Charset::Utf8).unwrap());
    }

    #[test]
    fn stored_hash_doubles_as_salt() {
        let enc = BlowfishEncoder;
        let first = enc.encode(b"asecret", None, None, Charset::Utf8).unwrap();
        let second = enc
            .encode(b"asecret", Some(&first), None, Charset::Utf8)
            .unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn verify_known_hash() {
        let enc = BlowfishEncoder;
        // bcrypt("password") at cost 10, cross-checked against libxcrypt.
        let stored = b"$2a$10$N9qo8uLOickgx2ZMRZoMye8fOsiTWZqYtkxvXkKm8BMzjT7t/vIdq";
        assert!(enc.matches(stored, b"password", None, Charset::Utf8).unwrap());
        assert!(!enc.matches(stored, b"passw0rd", None, Charset::Utf8).unwrap());
    }

    #[test]
    fn locked_and_nologin_never_match() {
        let enc = BlowfishEncoder;
        assert!(!enc.matches(b"*", b"asecret", None, Charset::Utf8).unwrap());
        assert!(!enc
            .matches(b"!$2a$10$abcdefghijklmnopqrstuv", b"asecret", None, Charset::Utf8)
            .unwrap());
    }
}
