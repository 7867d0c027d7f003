//! Unsalted message-digest encoders.
//!
//! Three forms per algorithm, matching what the legacy stores actually
//! hold: the raw digest bytes, the digest base64-encoded, and the
//! LDAP-style tagged string (`{MD5}...` / `{SHA}...`).  All are one-way
//! and deterministic; verification is re-encode and compare.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use md5::Md5;
use sha1::Sha1;
use sha2::Digest;

use crate::charset::Charset;
use crate::encoder::{ct_eq, Encoder};
use crate::errors::Result;

pub const MD5_ID: &str = "md5";
pub const SHA1_ID: &str = "sha1";
pub const MD5_BASE64_ID: &str = "md5-base64";
pub const SHA1_BASE64_ID: &str = "sha1-base64";
pub const MD5_STRING_ID: &str = "md5-string";
pub const SHA_STRING_ID: &str = "sha-string";

/// Digest algorithms the unsalted encoders support.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DigestAlgorithm {
    Md5,
    Sha1,
}

impl DigestAlgorithm {
    fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self {
            DigestAlgorithm::Md5 => Md5::digest(data).to_vec(),
            DigestAlgorithm::Sha1 => Sha1::digest(data).to_vec(),
        }
    }

    /// The scheme tag used in `{TAG}hash` strings.  SHA-1 is historically
    /// tagged `{SHA}`, not `{SHA1}`.
    fn tag(&self) -> &'static str {
        match self {
            DigestAlgorithm::Md5 => "MD5",
            DigestAlgorithm::Sha1 => "SHA",
        }
    }
}

/// Raw or base64 digest of the plaintext, no salt.
pub struct DigestEncoder {
    id: &'static str,
    algorithm: DigestAlgorithm,
    base64: bool,
}

impl DigestEncoder {
    pub fn md5() -> Self {
        Self { id: MD5_ID, algorithm: DigestAlgorithm::Md5, base64: false }
    }

    pub fn sha1() -> Self {
        Self { id: SHA1_ID, algorithm: DigestAlgorithm::Sha1, base64: false }
    }

    pub fn md5_base64() -> Self {
        Self { id: MD5_BASE64_ID, algorithm: DigestAlgorithm::Md5, base64: true }
    }

    pub fn sha1_base64() -> Self {
        Self { id: SHA1_BASE64_ID, algorithm: DigestAlgorithm::Sha1, base64: true }
    }
}

impl Encoder for DigestEncoder {
    fn id(&self) -> &str {
        self.id
    }

    fn encode(
        &self,
        plain: &[u8],
        _salt: Option<&[u8]>,
        _passphrase: Option<&[u8]>,
        _charset: Charset,
    ) -> Result<Vec<u8>> {
        let digest = self.algorithm.digest(plain);
        if self.base64 {
            Ok(BASE64.encode(digest).into_bytes())
        } else {
            Ok(digest)
        }
    }
}

/// LDAP-style tagged digest string: `{MD5}<base64>` / `{SHA}<base64>`.
pub struct TaggedDigestEncoder {
    id: &'static str,
    algorithm: DigestAlgorithm,
}

impl TaggedDigestEncoder {
    pub fn md5() -> Self {
        Self { id: MD5_STRING_ID, algorithm: DigestAlgorithm::Md5 }
    }

    pub fn sha1() -> Self {
        Self { id: SHA_STRING_ID, algorithm: DigestAlgorithm::Sha1 }
    }

    fn prefix(&self) -> String {
        format!("{{{}}}", self.algorithm.tag())
    }
}

impl Encoder for TaggedDigestEncoder {
    fn id(&self) -> &str {
        self.id
    }

    fn is_of_type(&self, encoded: &[u8], charset: Charset) -> bool {
        charset
            .decode(encoded)
            .map(|s| s.starts_with(&self.prefix()))
            .unwrap_or(false)
    }

    fn encode(
        &self,
        plain: &[u8],
        _salt: Option<&[u8]>,
        _passphrase: Option<&[u8]>,
        charset: Charset,
    ) -> Result<Vec<u8>> {
        let hash = BASE64.encode(self.algorithm.digest(plain));
        charset.encode(&format!("{}{}", self.prefix(), hash))
    }

    fn matches(
        &self,
        encoded: &[u8],
        plain: &[u8],
        _passphrase: Option<&[u8]>,
        charset: Charset,
    ) -> Result<bool> {
        // Only values carrying our own tag can match.
        let stored = match charset.decode(encoded) {
            Ok(s) => s,
            Err(_) => return Ok(false),
        };
        let Some(hash) = stored.strip_prefix(&self.prefix()) else {
            return Ok(false);
        };
        let expected = BASE64.encode(self.algorithm.digest(plain));
        Ok(ct_eq(hash.as_bytes(), expected.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn md5_base64_golden() {
        let out = DigestEncoder::md5_base64()
            .encode(b"asecret", None, None, Charset::Utf8)
            .unwrap();
        assert_eq!(out, b"ygWSaZhptnPLKB5JZjcklA==");
    }

    #[test]
    fn sha1_base64_golden() {
        let out = DigestEncoder::sha1_base64()
            .encode(b"asecret", None, None, Charset::Utf8)
            .unwrap();
        assert_eq!(out, b"rDszI4Mgv2OXvvUWJukxE9AJuGA=");
    }

    #[test]
    fn tagged_forms_and_type_sniff() {
        let enc = TaggedDigestEncoder::sha1();
        let out = enc.encode(b"asecret", None, None, Charset::Utf8).unwrap();
        assert_eq!(out, b"{SHA}rDszI4Mgv2OXvvUWJukxE9AJuGA=");
        assert!(enc.is_of_type(&out, Charset::Utf8));
        assert!(!enc.is_of_type(b"{MD5}xyz", Charset::Utf8));
    }

    #[test]
    fn tagged_match_requires_own_tag() {
        let enc = TaggedDigestEncoder::md5();
        let out = enc.encode(b"asecret", None, None, Charset::Utf8).unwrap();
        assert!(enc.matches(&out, b"asecret", None, Charset::Utf8).unwrap());
        assert!(!enc.matches(&out, b"other", None, Charset::Utf8).unwrap());
        // A {SHA} value never matches through the MD5 encoder.
        assert!(!enc
            .matches(b"{SHA}rDszI4Mgv2OXvvUWJukxE9AJuGA=", b"asecret", None, Charset::Utf8)
            .unwrap());
    }

    #[test]
    fn raw_digest_is_deterministic() {
        let enc = DigestEncoder::md5();
        let a = enc.encode(b"asecret", None, None, Charset::Utf8).unwrap();
        let b = enc.encode(b"asecret", None, None, Charset::Utf8).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 16);
    }

    #[test]
    fn decode_always_unsupported() {
        let err = DigestEncoder::sha1()
            .decode(b"whatever", None, Charset::Utf8)
            .unwrap_err();
        assert!(err.is_unsupported());
    }
}
