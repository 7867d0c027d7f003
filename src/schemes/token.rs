//! Encoder backed by a token database keypair.
//!
//! Unlike the passphrase ciphers, the key material never crosses the call
//! boundary: encryption is randomized RSA under the database's public key,
//! so salt and passphrase arguments are rejected outright and verification
//! must decode and compare rather than re-encode.

use std::sync::Arc;

use crate::charset::Charset;
use crate::encoder::{ct_eq, Encoder};
use crate::errors::{EncoderError, Result};
use crate::token::TokenDatabase;

pub const TOKEN_ID: &str = "token";

pub struct TokenEncoder {
    db: Arc<TokenDatabase>,
}

impl TokenEncoder {
    pub fn new(db: Arc<TokenDatabase>) -> Self {
        Self { db }
    }
}

impl Encoder for TokenEncoder {
    fn id(&self) -> &str {
        TOKEN_ID
    }

    fn encode(
        &self,
        plain: &[u8],
        salt: Option<&[u8]>,
        passphrase: Option<&[u8]>,
        charset: Charset,
    ) -> Result<Vec<u8>> {
        if salt.is_some() || passphrase.is_some() {
            return Err(EncoderError::IllegalArgument(
                "token encryption takes neither salt nor passphrase".into(),
            ));
        }
        charset.encode(&self.db.encrypt(plain)?)
    }

    fn decode(
        &self,
        encoded: &[u8],
        passphrase: Option<&[u8]>,
        charset: Charset,
    ) -> Result<Vec<u8>> {
        if passphrase.is_some() {
            return Err(EncoderError::IllegalArgument(
                "token decryption takes no passphrase".into(),
            ));
        }
        self.db.decrypt(&charset.decode(encoded)?)
    }

    fn matches(
        &self,
        encoded: &[u8],
        plain: &[u8],
        passphrase: Option<&[u8]>,
        charset: Charset,
    ) -> Result<bool> {
        // Encryption is randomized, so re-encoding can never reproduce the
        // stored bytes; decode and compare instead.
        match self.decode(encoded, passphrase, charset) {
            Ok(decoded) => Ok(ct_eq(&decoded, plain)),
            Err(EncoderError::DecodeFailed) => Ok(false),
            Err(e) => Err(e),
        }
    }
}
