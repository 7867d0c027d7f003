//! FreeBSD MD5-crypt and its Apache variant.
//!
//! The algorithm is Poul-Henning Kamp's md5crypt: a thousand-round MD5
//! chain over password and salt, emitted as `<magic><salt>$<hash>` with the
//! crypt base64 alphabet.  Apache's htpasswd uses the identical routine
//! with the magic `$apr1$` substituted for `$1$`, so both encoders share
//! one core parameterised by the magic string.

use md5::Md5;
use sha2::Digest;

use crate::charset::Charset;
use crate::encoder::{ct_eq, random_bytes, Encoder};
use crate::errors::{EncoderError, Result};

pub const UNIX_MD5_ID: &str = "unix-md5";
pub const HTPASSWD_MD5_ID: &str = "htpasswd-md5";

const UNIX_MAGIC: &str = "$1$";
const APACHE_MAGIC: &str = "$apr1$";

/// crypt(3)'s base64 alphabet (not RFC 4648).
pub(crate) const ITOA64: &[u8; 64] =
    b"./0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Emit `n` characters of `v`, six bits at a time, least-significant first.
fn to64(mut v: u32, n: usize) -> String {
    let mut out = String::with_capacity(n);
    for _ in 0..n {
        out.push(ITOA64[(v & 0x3f) as usize] as char);
        v >>= 6;
    }
    out
}

/// The md5crypt core.  `salt` may carry the magic prefix and trailing
/// `$hash` text; it is refined to at most eight characters before use.
pub(crate) fn crypt_md5(password: &[u8], salt: &str, magic: &str) -> String {
    let sp = salt.strip_prefix(magic).unwrap_or(salt);
    let sp = sp.split('$').next().unwrap_or("");
    let sp = truncate_salt(sp, 8);
    let salt_bytes = sp.as_bytes();

    let mut ctx = Md5::new();
    ctx.update(password);
    ctx.update(magic.as_bytes());
    ctx.update(salt_bytes);

    let mut ctx1 = Md5::new();
    ctx1.update(password);
    ctx1.update(salt_bytes);
    ctx1.update(password);
    let alternate: [u8; 16] = ctx1.finalize().into();

    let mut remaining = password.len();
    while remaining > 0 {
        let take = remaining.min(16);
        ctx.update(&alternate[..take]);
        remaining -= take;
    }

    // The historical quirk: one bit of the password length at a time,
    // adding either a zero byte or the first password byte.
    let mut bits = password.len();
    while bits != 0 {
        if bits & 1 != 0 {
            ctx.update([0u8]);
        } else {
            ctx.update(&password[..1]);
        }
        bits >>= 1;
    }

    let mut interim: [u8; 16] = ctx.finalize().into();

    // One thousand stretching rounds to slow dictionary attacks down.
    for round in 0..1000 {
        let mut c = Md5::new();
        if round & 1 != 0 {
            c.update(password);
        } else {
            c.update(interim);
        }
        if round % 3 != 0 {
            c.update(salt_bytes);
        }
        if round % 7 != 0 {
            c.update(password);
        }
        if round & 1 != 0 {
            c.update(interim);
        } else {
            c.update(password);
        }
        interim = c.finalize().into();
    }

    let mut out = String::with_capacity(magic.len() + sp.len() + 23);
    out.push_str(magic);
    out.push_str(sp);
    out.push('$');
    for &(a, b, c) in &[(0, 6, 12), (1, 7, 13), (2, 8, 14), (3, 9, 15), (4, 10, 5)] {
        let v = (u32::from(interim[a]) << 16) | (u32::from(interim[b]) << 8) | u32::from(interim[c]);
        out.push_str(&to64(v, 4));
    }
    out.push_str(&to64(u32::from(interim[11]), 2));
    out
}

/// Truncate to at most `max` characters. Salts can arrive through lossy
/// charsets, so the cut must land on a char boundary, not a byte index.
pub(crate) fn truncate_salt(salt: &str, max: usize) -> &str {
    match salt.char_indices().nth(max) {
        Some((idx, _)) => &salt[..idx],
        None => salt,
    }
}

/// Generate a fresh salt from the crypt alphabet.
pub(crate) fn generate_crypt_salt(len: usize) -> String {
    random_bytes(len)
        .into_iter()
        .map(|b| ITOA64[(b & 0x3f) as usize] as char)
        .collect()
}

/// MD5-crypt encoder with a pluggable magic prefix.
pub struct Md5CryptEncoder {
    id: &'static str,
    magic: &'static str,
}

impl Md5CryptEncoder {
    /// Unix shadow form, `$1$salt$hash`.
    pub fn unix() -> Self {
        Self { id: UNIX_MD5_ID, magic: UNIX_MAGIC }
    }

    /// Apache htpasswd form, `$apr1$salt$hash`.
    pub fn htpasswd() -> Self {
        Self { id: HTPASSWD_MD5_ID, magic: APACHE_MAGIC }
    }
}

impl Encoder for Md5CryptEncoder {
    fn id(&self) -> &str {
        self.id
    }

    fn is_of_type(&self, encoded: &[u8], charset: Charset) -> bool {
        charset
            .decode(encoded)
            .map(|s| s.starts_with(self.magic))
            .unwrap_or(false)
    }

    fn encode(
        &self,
        plain: &[u8],
        salt: Option<&[u8]>,
        _passphrase: Option<&[u8]>,
        charset: Charset,
    ) -> Result<Vec<u8>> {
        let salt_string = match salt {
            None => generate_crypt_salt(8),
            Some(bytes) => {
                let s = charset.decode(bytes)?;
                if s.len() < 2 {
                    return Err(EncoderError::IllegalArgument(
                        "salt must be at least 2 characters".into(),
                    ));
                }
                s
            }
        };
        charset.encode(&crypt_md5(plain, &salt_string, self.magic))
    }

    fn matches(
        &self,
        encoded: &[u8],
        plain: &[u8],
        _passphrase: Option<&[u8]>,
        charset: Charset,
    ) -> Result<bool> {
        let stored = charset.decode(encoded)?;
        // Shadow conventions: "*" means no login, "!" means locked.
        if stored == "*" || stored.starts_with('!') {
            return Ok(false);
        }
        if !stored.starts_with(self.magic) {
            return Err(EncoderError::Crypto(format!(
                "encoded data does not carry the {} magic",
                self.magic
            )));
        }
        let Some(end) = stored[self.magic.len()..].find('$') else {
            return Err(EncoderError::Crypto("expected end-of-salt '$'".into()));
        };
        let salt = &stored[..self.magic.len() + end];
        let reencoded = self.encode(plain, Some(salt.as_bytes()), None, charset)?;
        Ok(ct_eq(encoded, &reencoded))
    }
}
