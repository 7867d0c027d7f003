//! Standard base64 transport encoding.
//!
//! Reversible but secretless — it exists for stores that keep credentials
//! base64-wrapped, and as the outer stage of the `*-base64` compound
//! encoders.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;

use crate::charset::Charset;
use crate::encoder::Encoder;
use crate::errors::{EncoderError, Result};

pub const ID: &str = "base64";

pub struct Base64Encoder;

impl Encoder for Base64Encoder {
    fn id(&self) -> &str {
        ID
    }

    fn encode(
        &self,
        plain: &[u8],
        _salt: Option<&[u8]>,
        _passphrase: Option<&[u8]>,
        _charset: Charset,
    ) -> Result<Vec<u8>> {
        Ok(BASE64.encode(plain).into_bytes())
    }

    fn decode(
        &self,
        encoded: &[u8],
        _passphrase: Option<&[u8]>,
        _charset: Charset,
    ) -> Result<Vec<u8>> {
        BASE64
            .decode(encoded)
            .map_err(|e| EncoderError::Crypto(format!("invalid base64: {e}")))
    }
}
