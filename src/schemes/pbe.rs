//! PBE-with-MD5-and-DES, the old JCE password-based encryption scheme.
//!
//! Key material comes from PBKDF1 over MD5: seventeen hash rounds of
//! passphrase-then-salt, with the first eight bytes used as the DES key
//! and the next eight as the CBC IV.  The output frame is one length byte,
//! the eight-byte salt, then the ciphertext.  When the caller supplies no
//! salt a fixed well-known salt is used, which keeps the output
//! deterministic for a given passphrase.

use cbc::cipher::block_padding::Pkcs7;
use cbc::cipher::{BlockDecryptMut, BlockEncryptMut, KeyIvInit};
use md5::{Digest, Md5};

use crate::charset::Charset;
use crate::encoder::{ct_eq, Encoder};
use crate::errors::{EncoderError, Result};

pub const PBE_MD5_DES_ID: &str = "pbe-md5-des";

const DEFAULT_SALT: [u8; 8] = [0x15, 0x8c, 0xa3, 0x4a, 0x66, 0x51, 0x2a, 0xbc];
const ROUNDS: usize = 17;

type DesCbcEnc = cbc::Encryptor<des::Des>;
type DesCbcDec = cbc::Decryptor<des::Des>;

/// PBKDF1: iterate the digest over passphrase || salt.
fn derive(passphrase: &[u8], salt: &[u8]) -> [u8; 16] {
    let mut ctx = Md5::new();
    ctx.update(passphrase);
    ctx.update(salt);
    let mut t: [u8; 16] = ctx.finalize().into();
    for _ in 1..ROUNDS {
        t = Md5::digest(t).into();
    }
    t
}

pub struct PbeMd5DesEncoder;

impl PbeMd5DesEncoder {
    fn require_passphrase<'a>(passphrase: Option<&'a [u8]>) -> Result<&'a [u8]> {
        match passphrase {
            Some(p) if !p.is_empty() => Ok(p),
            _ => Err(EncoderError::IllegalArgument(
                "a passphrase is required".into(),
            )),
        }
    }
}

impl Encoder for PbeMd5DesEncoder {
    fn id(&self) -> &str {
        PBE_MD5_DES_ID
    }

    fn encode(
        &self,
        plain: &[u8],
        salt: Option<&[u8]>,
        passphrase: Option<&[u8]>,
        _charset: Charset,
    ) -> Result<Vec<u8>> {
        let passphrase = Self::require_passphrase(passphrase)?;
        let salt: [u8; 8] = match salt {
            None => DEFAULT_SALT,
            Some(bytes) => bytes.try_into().map_err(|_| {
                EncoderError::IllegalArgument("salt must be exactly 8 bytes".into())
            })?,
        };
        let dk = derive(passphrase, &salt);
        let cipher = DesCbcEnc::new_from_slices(&dk[..8], &dk[8..])
            .map_err(|e| EncoderError::Crypto(format!("bad key or IV length: {e}")))?;
        let ciphertext = cipher.encrypt_padded_vec_mut::<Pkcs7>(plain);

        let mut out = Vec::with_capacity(1 + salt.len() + ciphertext.len());
        out.push(salt.len() as u8);
        out.extend_from_slice(&salt);
        out.extend_from_slice(&ciphertext);
        Ok(out)
    }

    fn decode(
        &self,
        encoded: &[u8],
        passphrase: Option<&[u8]>,
        _charset: Charset,
    ) -> Result<Vec<u8>> {
        let passphrase = Self::require_passphrase(passphrase)?;
        let salt_len = usize::from(*encoded.first().ok_or(EncoderError::DecodeFailed)?);
        let salt = encoded
            .get(1..1 + salt_len)
            .ok_or(EncoderError::DecodeFailed)?;
        let ciphertext = &encoded[1 + salt_len..];
        if ciphertext.is_empty() || ciphertext.len() % 8 != 0 {
            return Err(EncoderError::DecodeFailed);
        }
        let dk = derive(passphrase, salt);
        let cipher = DesCbcDec::new_from_slices(&dk[..8], &dk[8..])
            .map_err(|e| EncoderError::Crypto(format!("bad key or IV length: {e}")))?;
        cipher
            .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
            .map_err(|_| EncoderError::DecodeFailed)
    }

    fn matches(
        &self,
        encoded: &[u8],
        plain: &[u8],
        passphrase: Option<&[u8]>,
        charset: Charset,
    ) -> Result<bool> {
        match self.decode(encoded, passphrase, charset) {
            Ok(decoded) => Ok(ct_eq(&decoded, plain)),
            Err(EncoderError::DecodeFailed) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
