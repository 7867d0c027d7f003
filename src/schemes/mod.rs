//! The encoder implementations, one module per storage format family.

pub mod aes;
pub mod base64;
pub mod blowfish;
pub mod compound;
pub mod digest;
pub mod drupal;
pub mod md5_crypt;
pub mod pbe;
pub mod plain;
pub mod sha_crypt;
pub mod token;
pub mod unicode;
pub mod unix_des;

use std::sync::Arc;

pub use aes::AesEncoder;
pub use base64::Base64Encoder;
pub use blowfish::BlowfishEncoder;
pub use compound::CompoundEncoder;
pub use digest::{DigestEncoder, TaggedDigestEncoder};
pub use drupal::Drupal7Encoder;
pub use md5_crypt::Md5CryptEncoder;
pub use pbe::PbeMd5DesEncoder;
pub use plain::PlainEncoder;
pub use sha_crypt::Sha512CryptEncoder;
pub use token::TokenEncoder;
pub use unicode::UnicodeEncoder;
pub use unix_des::UnixDesEncoder;

use crate::encoder::Encoder;
use crate::token::TokenDatabase;

pub const AES_128_BASE64_ID: &str = "aes-128-base64";
pub const AES_192_BASE64_ID: &str = "aes-192-base64";
pub const AES_256_BASE64_ID: &str = "aes-256-base64";
pub const PBE_MD5_DES_BASE64_ID: &str = "pbe-md5-des-base64";
pub const TOKEN_BASE64_ID: &str = "token-base64";

fn wrap_base64(id: &str, inner: Box<dyn Encoder>) -> CompoundEncoder {
    CompoundEncoder::new(id, vec![inner, Box::new(Base64Encoder)])
}

/// `aes-128-base64`: the binary AES frame wrapped in transport base64.
pub fn aes128_base64() -> CompoundEncoder {
    wrap_base64(AES_128_BASE64_ID, Box::new(AesEncoder::aes128()))
}

/// `aes-192-base64`.
pub fn aes192_base64() -> CompoundEncoder {
    wrap_base64(AES_192_BASE64_ID, Box::new(AesEncoder::aes192()))
}

/// `aes-256-base64`.
pub fn aes256_base64() -> CompoundEncoder {
    wrap_base64(AES_256_BASE64_ID, Box::new(AesEncoder::aes256()))
}

/// `pbe-md5-des-base64`.
pub fn pbe_md5_des_base64() -> CompoundEncoder {
    wrap_base64(PBE_MD5_DES_BASE64_ID, Box::new(PbeMd5DesEncoder))
}

/// `token-base64`: token ciphertext wrapped once more for transports that
/// cannot carry the inner text as-is.
pub fn token_base64(db: Arc<TokenDatabase>) -> CompoundEncoder {
    wrap_base64(TOKEN_BASE64_ID, Box::new(TokenEncoder::new(db)))
}
