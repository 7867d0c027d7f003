//! Framed AES-CBC password encryption.
//!
//! The binary frame is self-describing: big-endian key size in bits, a
//! legacy 16-bit iteration field (zero in current frames), a 32-bit
//! iteration count, the salt length and salt, then the ciphertext.  The
//! key is derived from the passphrase with PBKDF2-HMAC-SHA1 and the CBC IV
//! is all zeros; both are fixed by the frames already in the wild, so
//! changing either would orphan existing data.

use aes::cipher::block_padding::Pkcs7;
use aes::cipher::{BlockCipher, BlockDecryptMut, BlockEncryptMut, KeyInit, KeyIvInit};
use pbkdf2::pbkdf2_hmac;
use sha1::Sha1;

use crate::charset::Charset;
use crate::encoder::{ct_eq, random_bytes, Encoder};
use crate::errors::{EncoderError, Result};

pub const AES_128_ID: &str = "aes-128";
pub const AES_192_ID: &str = "aes-192";
pub const AES_256_ID: &str = "aes-256";

const ITERATIONS: u32 = 1024;
const SALT_LEN: usize = 16;
const ZERO_IV: [u8; 16] = [0u8; 16];

struct Frame {
    key_bits: u16,
    iterations: u32,
    salt: Vec<u8>,
    ciphertext: Vec<u8>,
}

fn read_u16(data: &[u8], at: usize) -> Result<u16> {
    data.get(at..at + 2)
        .map(|b| u16::from_be_bytes([b[0], b[1]]))
        .ok_or_else(|| EncoderError::DecodeFailed)
}

fn read_u32(data: &[u8], at: usize) -> Result<u32> {
    data.get(at..at + 4)
        .map(|b| u32::from_be_bytes([b[0], b[1], b[2], b[3]]))
        .ok_or_else(|| EncoderError::DecodeFailed)
}

fn parse_frame(data: &[u8]) -> Result<Frame> {
    let key_bits = read_u16(data, 0)?;
    if !matches!(key_bits, 128 | 192 | 256) {
        return Err(EncoderError::DecodeFailed);
    }
    let legacy_iterations = read_u16(data, 2)?;
    // Old frames stored the iteration count in the 16-bit field; current
    // frames zero it and use the 32-bit field that follows.
    let (iterations, salt_len_at) = if legacy_iterations != 0 {
        (u32::from(legacy_iterations), 4)
    } else {
        (read_u32(data, 4)?, 8)
    };
    let salt_len = usize::from(read_u16(data, salt_len_at)?);
    let salt_at = salt_len_at + 2;
    let salt = data
        .get(salt_at..salt_at + salt_len)
        .ok_or(EncoderError::DecodeFailed)?
        .to_vec();
    let ciphertext = data[salt_at + salt_len..].to_vec();
    if ciphertext.is_empty() || ciphertext.len() % 16 != 0 {
        return Err(EncoderError::DecodeFailed);
    }
    Ok(Frame { key_bits, iterations, salt, ciphertext })
}

fn derive_key(passphrase: &[u8], salt: &[u8], iterations: u32, key_bits: u16) -> Vec<u8> {
    let mut key = vec![0u8; usize::from(key_bits) / 8];
    pbkdf2_hmac::<Sha1>(passphrase, salt, iterations, &mut key);
    key
}

fn cbc_encrypt<C>(key: &[u8], plain: &[u8]) -> Result<Vec<u8>>
where
    C: BlockCipher + BlockEncryptMut + KeyInit,
{
    let cipher = cbc::Encryptor::<C>::new_from_slices(key, &ZERO_IV)
        .map_err(|e| EncoderError::Crypto(format!("bad key or IV length: {e}")))?;
    Ok(cipher.encrypt_padded_vec_mut::<Pkcs7>(plain))
}

fn cbc_decrypt<C>(key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>>
where
    C: BlockCipher + BlockDecryptMut + KeyInit,
{
    let cipher = cbc::Decryptor::<C>::new_from_slices(key, &ZERO_IV)
        .map_err(|e| EncoderError::Crypto(format!("bad key or IV length: {e}")))?;
    cipher
        .decrypt_padded_vec_mut::<Pkcs7>(ciphertext)
        .map_err(|_| EncoderError::DecodeFailed)
}

fn encrypt(key_bits: u16, key: &[u8], plain: &[u8]) -> Result<Vec<u8>> {
    match key_bits {
        128 => cbc_encrypt::<aes::Aes128>(key, plain),
        192 => cbc_encrypt::<aes::Aes192>(key, plain),
        256 => cbc_encrypt::<aes::Aes256>(key, plain),
        other => Err(EncoderError::IllegalArgument(format!(
            "unsupported AES key size {other}"
        ))),
    }
}

fn decrypt(key_bits: u16, key: &[u8], ciphertext: &[u8]) -> Result<Vec<u8>> {
    match key_bits {
        128 => cbc_decrypt::<aes::Aes128>(key, ciphertext),
        192 => cbc_decrypt::<aes::Aes192>(key, ciphertext),
        256 => cbc_decrypt::<aes::Aes256>(key, ciphertext),
        other => Err(EncoderError::IllegalArgument(format!(
            "unsupported AES key size {other}"
        ))),
    }
}

/// Passphrase-keyed AES encoder at a fixed key size.
pub struct AesEncoder {
    id: &'static str,
    key_bits: u16,
}

impl AesEncoder {
    pub fn aes128() -> Self {
        Self { id: AES_128_ID, key_bits: 128 }
    }

    pub fn aes192() -> Self {
        Self { id: AES_192_ID, key_bits: 192 }
    }

    pub fn aes256() -> Self {
        Self { id: AES_256_ID, key_bits: 256 }
    }

    fn require_passphrase<'a>(passphrase: Option<&'a [u8]>) -> Result<&'a [u8]> {
        match passphrase {
            Some(p) if !p.is_empty() => Ok(p),
            _ => Err(EncoderError::IllegalArgument(
                "a passphrase is required".into(),
            )),
        }
    }
}

impl Encoder for AesEncoder {
    fn id(&self) -> &str {
        self.id
    }

    fn is_of_type(&self, encoded: &[u8], _charset: Charset) -> bool {
        parse_frame(encoded)
            .map(|f| f.key_bits == self.key_bits)
            .unwrap_or(false)
    }

    fn encode(
        &self,
        plain: &[u8],
        salt: Option<&[u8]>,
        passphrase: Option<&[u8]>,
        _charset: Charset,
    ) -> Result<Vec<u8>> {
        let passphrase = Self::require_passphrase(passphrase)?;
        // An explicitly empty salt means "no salting": a fixed zero block
        // keeps the derivation deterministic across calls.
        let salt = match salt {
            None => random_bytes(SALT_LEN),
            Some([]) => vec![0u8; SALT_LEN],
            Some(bytes) => bytes.to_vec(),
        };
        let key = derive_key(passphrase, &salt, ITERATIONS, self.key_bits);
        let ciphertext = encrypt(self.key_bits, &key, plain)?;

        let mut out = Vec::with_capacity(10 + salt.len() + ciphertext.len());
        out.extend_from_slice(&self.key_bits.to_be_bytes());
        out.extend_from_slice(&0u16.to_be_bytes());
        out.extend_from_slice(&ITERATIONS.to_be_bytes());
        out.extend_from_slice(&(salt.len() as u16).to_be_bytes());
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
        let frame = parse_frame(encoded)?;
        let key = derive_key(passphrase, &frame.salt, frame.iterations, frame.key_bits);
        decrypt(frame.key_bits, &key, &frame.ciphertext)
    }

    fn matches(
        &self,
        encoded: &[u8],
        plain: &[u8],
        passphrase: Option<&[u8]>,
        _charset: Charset,
    ) -> Result<bool> {
        let passphrase = Self::require_passphrase(passphrase)?;
        let Ok(frame) = parse_frame(encoded) else {
            return Ok(false);
        };
        let key = derive_key(passphrase, &frame.salt, frame.iterations, frame.key_bits);
        let ciphertext = encrypt(frame.key_bits, &key, plain)?;
        Ok(ct_eq(&ciphertext, &frame.ciphertext))
    }
}
