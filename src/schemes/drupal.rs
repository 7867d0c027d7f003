//! Drupal 7 password hashes (`$S$`).
//!
//! Drupal stretched the phpass design: SHA-512 instead of MD5, with the
//! iteration count stored as a single crypt-alphabet character after the
//! magic.  A stored value is `$S$` + count character + 8-character salt +
//! hash, the whole string truncated to 55 characters.  The first twelve
//! characters form the "setting" and are enough to re-run the hash.

use sha2::{Digest, Sha512};

use crate::charset::Charset;
use crate::encoder::{ct_eq, random_bytes, Encoder};
use crate::errors::{EncoderError, Result};
use crate::schemes::md5_crypt::ITOA64;

pub const DRUPAL7_ID: &str = "drupal7";

const MAGIC: &str = "$S$";
const SETTING_LEN: usize = 12;
const SALT_LEN: usize = 8;
const OUTPUT_LEN: usize = 55;

/// log2 of the iteration count used for newly generated hashes.
const HASH_COUNT_LOG2: usize = 15;
const MIN_COUNT_LOG2: usize = 7;
const MAX_COUNT_LOG2: usize = 30;

/// phpass base64: little-endian 6-bit groups over the crypt alphabet.
fn phpass_base64(input: &[u8]) -> String {
    let mut out = String::with_capacity(input.len().div_ceil(3) * 4);
    let mut i = 0;
    while i < input.len() {
        let mut value = u32::from(input[i]);
        i += 1;
        out.push(ITOA64[(value & 0x3f) as usize] as char);
        if i < input.len() {
            value |= u32::from(input[i]) << 8;
        }
        out.push(ITOA64[((value >> 6) & 0x3f) as usize] as char);
        if i >= input.len() {
            break;
        }
        i += 1;
        if i < input.len() {
            value |= u32::from(input[i]) << 16;
        }
        out.push(ITOA64[((value >> 12) & 0x3f) as usize] as char);
        if i >= input.len() {
            break;
        }
        i += 1;
        out.push(ITOA64[((value >> 18) & 0x3f) as usize] as char);
    }
    out
}

/// Run the Drupal stretch for a given setting string.
fn password_crypt(password: &[u8], setting: &str) -> Result<String> {
    if !setting.starts_with(MAGIC) || setting.len() < SETTING_LEN {
        return Err(EncoderError::Crypto(
            "setting must be $S$ followed by count and salt".into(),
        ));
    }
    let count_char = setting.as_bytes()[3];
    let count_log2 = ITOA64
        .iter()
        .position(|&c| c == count_char)
        .ok_or_else(|| EncoderError::Crypto("invalid count character".into()))?;
    if !(MIN_COUNT_LOG2..=MAX_COUNT_LOG2).contains(&count_log2) {
        return Err(EncoderError::Crypto(format!(
            "iteration count 2^{count_log2} out of range"
        )));
    }
    let salt = &setting[4..SETTING_LEN];

    let mut hash: [u8; 64] = {
        let mut ctx = Sha512::new();
        ctx.update(salt.as_bytes());
        ctx.update(password);
        ctx.finalize().into()
    };
    for _ in 0..(1u64 << count_log2) {
        let mut ctx = Sha512::new();
        ctx.update(hash);
        ctx.update(password);
        hash = ctx.finalize().into();
    }

    let mut out = String::with_capacity(OUTPUT_LEN);
    out.push_str(&setting[..SETTING_LEN]);
    out.push_str(&phpass_base64(&hash));
    out.truncate(OUTPUT_LEN);
    Ok(out)
}

/// Build a fresh setting string with the default iteration count.
fn generate_setting() -> String {
    let mut setting = String::with_capacity(SETTING_LEN);
    setting.push_str(MAGIC);
    setting.push(ITOA64[HASH_COUNT_LOG2] as char);
    // 6 random bytes give exactly 8 salt characters.
    setting.push_str(&phpass_base64(&random_bytes(6)));
    debug_assert_eq!(setting.len(), SETTING_LEN);
    setting
}

pub struct Drupal7Encoder;

impl Encoder for Drupal7Encoder {
    fn id(&self) -> &str {
        DRUPAL7_ID
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
        let setting = match salt {
            None => generate_setting(),
            Some(bytes) => charset.decode(bytes)?,
        };
        charset.encode(&password_crypt(plain, &setting)?)
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
        let Some(setting) = stored.get(..SETTING_LEN) else {
            return Err(EncoderError::Crypto(
                "encoded data too short to carry a setting".into(),
            ));
        };
        let reencoded = password_crypt(plain, setting)?;
        Ok(ct_eq(reencoded.as_bytes(), stored.as_bytes()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET1: &[u8] = b"asecret";
    const SECRET2: &[u8] = b"a slightly longer secret";
    const SECRET3: &[u8] = "a secret with other characters like $\u{a3}\"!&*(".as_bytes();

    #[test]
    fn golden_vectors() {
        let enc = Drupal7Encoder;
        let cases: &[(&[u8], &str, &str)] = &[
            (
                SECRET1,
                "$S$DnO4ij9KO",
                "$S$DnO4ij9KOjnBioZhI6.t.JLitZVShF7bkN/fFbUaua8nf27yTsc2",
            ),
            (
                SECRET2,
                "$S$D3M39kOc.",
                "$S$D3M39kOc.7Z1EpCad8FZfeTBJqFWyDfuMdxZuZFptqDL8HZKuz7x",
            ),
            (
                SECRET3,
                "$S$Dl7IOt27l",
                "$S$Dl7IOt27lwHIIEvpCFjJnnE2qkIKaiYx8MXJxH9NxH/kN.e1BAwC",
            ),
        ];
        for (plain, salt, expected) in cases {
            let out = enc
                .encode(plain, Some(salt.as_bytes()), None, Charset::Utf8)
                .unwrap();
            assert_eq!(out, expected.as_bytes());
            assert!(enc
                .matches(expected.as_bytes(), plain, None, Charset::Utf8)
                .unwrap());
        }
    }

    #[test]
    fn generated_setting_roundtrip() {
        let enc = Drupal7Encoder;
        let out = enc.encode(SECRET1, None, None, Charset::Utf8).unwrap();
        assert_eq!(out.len(), OUTPUT_LEN);
        assert!(out.starts_with(b"$S$D"));
        assert!(enc.matches(&out, SECRET1, None, Charset::Utf8).unwrap());
        assert!(!enc.matches(&out, b"wrong", None, Charset::Utf8).unwrap());
    }

    #[test]
    fn count_out_of_range_is_rejected() {
        // '.' is index 0, far below the minimum of 7.
        let err = password_crypt(b"pw", "$S$.abcdefgh").unwrap_err();
        assert!(matches!(err, EncoderError::Crypto(_)));
    }

    #[test]
    fn locked_and_nologin_never_match() {
        let enc = Drupal7Encoder;
        assert!(!enc.matches(b"*", SECRET1, None, Charset::Utf8).unwrap());
        assert!(!enc
            .matches(b"!$S$DnO4ij9KOjnBioZhI6.t.JLitZVShF7bkN/fFbUaua8nf27yTsc2", SECRET1, None, Charset::Utf8)
            .unwrap());
    }
}
