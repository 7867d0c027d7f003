//! SHA-512-crypt (`$6$`), the glibc shadow format.
//!
//! Stored form: `$6$[rounds=N$]salt$hash`.  The salt (at most 16
//! characters) and the optional round count are embedded in the stored
//! value, so verification re-derives both from the encoded bytes alone.
//! The round function itself comes from the `sha-crypt` crate; this module
//! owns the prefix, salt and rounds plumbing.

use sha_crypt::{sha512_crypt_b64, Sha512Params, ROUNDS_DEFAULT};

use crate::charset::Charset;
use crate::encoder::{ct_eq, Encoder};
use crate::errors::{EncoderError, Result};
use crate::schemes::md5_crypt::{generate_crypt_salt, truncate_salt};

pub const UNIX_SHA512_ID: &str = "unix-sha512";

const MAGIC: &str = "$6$";
const MAX_SALT_LEN: usize = 16;

/// Salt specification parsed back out of a stored hash (or supplied by the
/// caller in the same syntax).
struct SaltSpec {
    rounds: Option<u32>,
    salt: String,
}

fn parse_salt_spec(spec: &str) -> Result<SaltSpec> {
    let body = spec.strip_prefix(MAGIC).unwrap_or(spec);
    let (rounds, rest) = match body.strip_prefix("rounds=") {
        Some(tail) => {
            let Some((count, rest)) = tail.split_once('$') else {
                return Err(EncoderError::IllegalArgument(
                    "rounds specification missing terminating '$'".into(),
                ));
            };
            let rounds: u32 = count.parse().map_err(|_| {
                EncoderError::IllegalArgument(format!("invalid rounds value '{count}'"))
            })?;
            (Some(rounds), rest)
        }
        None => (None, body),
    };
    let salt = rest.split('$').next().unwrap_or("");
    let salt = truncate_salt(salt, MAX_SALT_LEN);
    if salt.len() < 2 {
        return Err(EncoderError::IllegalArgument(
            "salt must be at least 2 characters".into(),
        ));
    }
    Ok(SaltSpec { rounds, salt: salt.to_string() })
}

pub struct Sha512CryptEncoder;

impl Sha512CryptEncoder {
    fn crypt(&self, plain: &[u8], spec: &SaltSpec) -> Result<String> {
        let rounds = spec.rounds.unwrap_or(ROUNDS_DEFAULT as u32);
        let params = Sha512Params::new(rounds as usize)
            .map_err(|e| EncoderError::Crypto(format!("invalid rounds: {e:?}")))?;
        let hash = sha512_crypt_b64(plain, spec.salt.as_bytes(), &params)
            .map_err(|e| EncoderError::Crypto(format!("sha512-crypt failed: {e:?}")))?;
        Ok(match spec.rounds {
            Some(r) => format!("{MAGIC}rounds={r}${}${hash}", spec.salt),
            None => format!("{MAGIC}{}${hash}", spec.salt),
        })
    }
}

impl Encoder for Sha512CryptEncoder {
    fn id(&self) -> &str {
        UNIX_SHA512_ID
    }

    fn is_of_type(&self, encoded: &[u8], charset: Charset) -> bool {
        charset
            .decode(encoded)
            .map(|s| s.starts_with(MAGIC))
            .unwrap_or(false)
    }

    fn encode(
        &self,
        plain: &[u8],
        salt: Option<&[u8]>,
        _passphrase: Option<&[u8]>,
        charset: Charset,
    ) -> Result<Vec<u8>> {
        let spec = match salt {
            None => SaltSpec { rounds: None, salt: generate_crypt_salt(MAX_SALT_LEN) },
            Some(bytes) => parse_salt_spec(&charset.decode(bytes)?)?,
        };
        charset.encode(&self.crypt(plain, &spec)?)
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
        if !stored.starts_with(MAGIC) {
            return Err(EncoderError::Crypto(
                "encoded data does not carry the $6$ magic".into(),
            ));
        }
        let Some(hash_start) = stored.rfind('$') else {
            return Err(EncoderError::Crypto("expected end-of-salt '$'".into()));
        };
        let spec = parse_salt_spec(&stored[..hash_start])?;
        Ok(ct_eq(self.crypt(plain, &spec)?.as_bytes(), stored.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference vectors from the published SHA-crypt description.
    #[test]
    fn sha512_crypt_golden_vector() {
        let enc = Sha512CryptEncoder;
        let out = enc
            .encode(b"Hello world!", Some(b"$6$saltstring"), None, Charset::Utf8)
            .unwrap();
        assert_eq!(
            out,
            b"$6$saltstring$svn8UoSVapNtMuq1ukKS4tPQd8iKwSMHWjl/O817G3uBnIFNjnQJuesI68u4OTLiBFdcbYEdFCoEOfaS35inz1"
        );
    }

    #[test]
    fn sha512_crypt_custom_rounds_vector() {
        let enc = Sha512CryptEncoder;
        let out = enc
            .encode(
                b"Hello world!",
                Some(b"$6$rounds=10000$saltstringsaltstring"),
                None,
                Charset::Utf8,
            )
            .unwrap();
        assert_eq!(
            out.as_slice(),
            &b"$6$rounds=10000$saltstringsaltst$OW1/O6BYHV6BcXZu8QVeXbDWra3Oeqh0sbHbbMCVNSnCM/UrjmM0Dp8vOuZeHBy/YTBmSK6H9qs/y3RnOaw5v."[..]
        );
    }

    #[test]
    fn match_rederives_salt_and_rounds() {
        let enc = Sha512CryptEncoder;
        let out = enc
            .encode(b"asecret", Some(b"$6$rounds=1000$mysalt"), None, Charset::Utf8)
            .unwrap();
        assert!(enc.matches(&out, b"asecret", None, Charset::Utf8).unwrap());
        assert!(!enc.matches(&out, b"other", None, Charset::Utf8).unwrap());
    }

    #[test]
    fn generated_salt_roundtrip() {
        let enc = Sha512CryptEncoder;
        let out = enc.encode(b"asecret", None, None, Charset::Utf8).unwrap();
        assert!(enc.is_of_type(&out, Charset::Utf8));
        assert!(enc.matches(&out, b"asecret", None, Charset::Utf8).unwrap());
    }

    #[test]
    fn multibyte_salt_truncates_on_a_char_boundary() {
        let enc = Sha512CryptEncoder;
        let out = enc
            .encode(b"pw", Some(b"123456789012345\xe9x"), None, Charset::Latin1)
            .unwrap();
        assert!(enc.matches(&out, b"pw", None, Charset::Latin1).unwrap());
    }

    #[test]
    fn salt_longer_than_16_is_truncated() {
        let enc = Sha512CryptEncoder;
        let out = enc
            .encode(b"pw", Some(b"saltstringsaltstringEXTRA"), None, Charset::Utf8)
            .unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("$6$saltstringsaltst$"));
    }
}
