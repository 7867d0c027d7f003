//! Traditional DES crypt(3), the oldest Unix shadow format.
//!
//! Thirteen characters: a two-character salt followed by eleven characters
//! of hash, all from the crypt base64 alphabet.  There is no magic prefix,
//! so this scheme can never be detected from the stored bytes alone; the
//! caller has to know it is looking at DES crypt.

use pwhash::unix_crypt;

use crate::charset::Charset;
use crate::encoder::{ct_eq, Encoder};
use crate::errors::{EncoderError, Result};
use crate::schemes::md5_crypt::generate_crypt_salt;

pub const UNIX_DES_ID: &str = "unix-des";

pub struct UnixDesEncoder;

impl Encoder for UnixDesEncoder {
    fn id(&self) -> &str {
        UNIX_DES_ID
    }

    fn encode(
        &self,
        plain: &[u8],
        salt: Option<&[u8]>,
        _passphrase: Option<&[u8]>,
        charset: Charset,
    ) -> Result<Vec<u8>> {
        let salt_string = match salt {
            None => generate_crypt_salt(2),
            Some(bytes) => {
                let s = charset.decode(bytes)?;
                let Some(head) = s.get(..2) else {
                    return Err(EncoderError::IllegalArgument(
                        "salt must be at least 2 characters".into(),
                    ));
                };
                head.to_string()
            }
        };
        let hashed = unix_crypt::hash_with(salt_string.as_str(), plain)
            .map_err(|e| EncoderError::Crypto(format!("des-crypt failed: {e}")))?;
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
        let Some(salt) = stored.get(..2) else {
            return Err(EncoderError::Crypto(
                "encoded data too short to carry a salt".into(),
            ));
        };
        let reencoded = self.encode(plain, Some(salt.as_bytes()), None, charset)?;
        Ok(ct_eq(encoded, &reencoded))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classic_crypt_vector() {
        // crypt("password", "ba"), cross-checked against libc crypt(3).
        let enc = UnixDesEncoder;
        let out = enc
            .encode(b"password", Some(b"ba"), None, Charset::Utf8)
            .unwrap();
        assert_eq!(out, b"ba5RwAwihj/nA");
    }

    #[test]
    fn salt_recovered_from_stored_hash() {
        let enc = UnixDesEncoder;
        let out = enc.encode(b"asecret", None, None, Charset::Utf8).unwrap();
        assert_eq!(out.len(), 13);
        assert!(enc.matches(&out, b"asecret", None, Charset::Utf8).unwrap());
        assert!(!enc.matches(&out, b"other", None, Charset::Utf8).unwrap());
    }

    #[test]
    fn no_detectable_signature() {
        let enc = UnixDesEncoder;
        let out = enc.encode(b"asecret", None, None, Charset::Utf8).unwrap();
        assert!(!enc.is_of_type(&out, Charset::Utf8));
    }

    #[test]
    fn locked_and_nologin_never_match() {
        let enc = UnixDesEncoder;
        assert!(!enc.matches(b"*", b"asecret", None, Charset::Utf8).unwrap());
        assert!(!enc
            .matches(b"!ba5RwAwihj/nA", b"password", None, Charset::Utf8)
            .unwrap());
    }
}
