//! Keystore file holding the token database's RSA key material at rest.
//!
//! Layout on disk:
//!
//! ```text
//! [PCTK: 4 bytes][version: 1 byte][header_len: 4 bytes LE][header JSON][sealed key]
//! ```
//!
//! The header carries the Argon2id salt and the key size.  The sealed
//! section is the PKCS#8 DER of the private key, encrypted with
//! AES-256-GCM under a key derived from the database password; the
//! 12-byte nonce is prepended to the ciphertext.  Writes go through a
//! temp file and rename so a crash can never leave a torn keystore.

use std::fs;
use std::path::Path;

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use argon2::{Algorithm, Argon2, Params, Version};
use chrono::{DateTime, Utc};
use rand_core::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::errors::{EncoderError, Result};

const MAGIC: &[u8; 4] = b"PCTK";
pub const CURRENT_VERSION: u8 = 1;
const PREFIX_LEN: usize = 9;
const SALT_LEN: usize = 32;
const KEY_LEN: usize = 32;
const NONCE_LEN: usize = 12;

/// Metadata stored in front of the sealed key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeystoreHeader {
    pub version: u8,

    /// Argon2id salt (base64 in JSON).
    #[serde(serialize_with = "base64_encode", deserialize_with = "base64_decode")]
    pub salt: Vec<u8>,

    pub created_at: DateTime<Utc>,

    /// RSA modulus size of the sealed key.
    pub key_bits: usize,
}

fn derive_wrap_key(password: &[u8], salt: &[u8]) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let params = Params::new(65_536, 3, 4, Some(KEY_LEN))
        .map_err(|e| EncoderError::Crypto(format!("invalid Argon2 params: {e}")))?;
    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(password, salt, key.as_mut())
        .map_err(|e| EncoderError::Crypto(format!("Argon2id derivation failed: {e}")))?;
    Ok(key)
}

/// Seal the private key DER and write the keystore atomically.
pub fn write_keystore(path: &Path, password: &[u8], key_der: &[u8], key_bits: usize) -> Result<()> {
    let mut salt = vec![0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    let wrap_key = derive_wrap_key(password, &salt)?;

    let cipher = Aes256Gcm::new_from_slice(wrap_key.as_ref())
        .map_err(|e| EncoderError::Crypto(format!("invalid key length: {e}")))?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let sealed = cipher
        .encrypt(&nonce, key_der)
        .map_err(|e| EncoderError::Crypto(format!("keystore sealing failed: {e}")))?;

    let header = KeystoreHeader {
        version: CURRENT_VERSION,
        salt,
        created_at: Utc::now(),
        key_bits,
    };
    let header_bytes = serde_json::to_vec(&header)
        .map_err(|e| EncoderError::Serialization(format!("keystore header: {e}")))?;
    let header_len = u32::try_from(header_bytes.len())
        .map_err(|_| EncoderError::Serialization("keystore header too large".into()))?;

    let mut buf = Vec::with_capacity(PREFIX_LEN + header_bytes.len() + NONCE_LEN + sealed.len());
    buf.extend_from_slice(MAGIC);
    buf.push(CURRENT_VERSION);
    buf.extend_from_slice(&header_len.to_le_bytes());
    buf.extend_from_slice(&header_bytes);
    buf.extend_from_slice(&nonce);
    buf.extend_from_slice(&sealed);

    // Atomic write: temp file in the same directory, then rename.
    let parent = path.parent().unwrap_or(Path::new("."));
    let tmp_path = parent.join(format!(
        ".{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy()
    ));
    fs::write(&tmp_path, &buf)?;
    fs::rename(&tmp_path, path)?;
    Ok(())
}

/// Read a keystore and unseal the private key DER.
pub fn read_keystore(path: &Path, password: &[u8]) -> Result<(KeystoreHeader, Zeroizing<Vec<u8>>)> {
    let data = fs::read(path)?;
    if data.len() < PREFIX_LEN + NONCE_LEN {
        return Err(EncoderError::TokenState(
            "keystore file too small to be valid".into(),
        ));
    }
    if &data[0..4] != MAGIC {
        return Err(EncoderError::TokenState("missing PCTK magic bytes".into()));
    }
    let version = data[4];
    if version != CURRENT_VERSION {
        return Err(EncoderError::TokenState(format!(
            "unsupported keystore version {version}, expected {CURRENT_VERSION}"
        )));
    }
    let header_len = u32::from_le_bytes(
        data[5..9]
            .try_into()
            .map_err(|_| EncoderError::TokenState("bad header length".into()))?,
    ) as usize;
    let header_end = PREFIX_LEN + header_len;
    if header_end + NONCE_LEN >= data.len() {
        return Err(EncoderError::TokenState(
            "header length exceeds file size".into(),
        ));
    }
    let header: KeystoreHeader = serde_json::from_slice(&data[PREFIX_LEN..header_end])
        .map_err(|e| EncoderError::TokenState(format!("header JSON: {e}")))?;

    let wrap_key = derive_wrap_key(password, &header.salt)?;
    let cipher = Aes256Gcm::new_from_slice(wrap_key.as_ref())
        .map_err(|e| EncoderError::Crypto(format!("invalid key length: {e}")))?;
    let nonce = Nonce::from_slice(&data[header_end..header_end + NONCE_LEN]);
    let key_der = cipher
        .decrypt(nonce, &data[header_end + NONCE_LEN..])
        .map_err(|_| EncoderError::TokenState("keystore unseal failed: wrong password or corrupted file".into()))?;

    Ok((header, Zeroizing::new(key_der)))
}

// ---------------------------------------------------------------------------
// Serde helpers for base64-encoded Vec<u8> fields
// ---------------------------------------------------------------------------

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

pub(crate) fn base64_encode<S>(data: &[u8], serializer: S) -> std::result::Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_str(&BASE64.encode(data))
}

pub(crate) fn base64_decode<'de, D>(deserializer: D) -> std::result::Result<Vec<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    BASE64.decode(&s).map_err(serde::de::Error::custom)
}
