//! Identity encoding: the stored value is the plaintext itself.

use crate::charset::Charset;
use crate::encoder::Encoder;
use crate::errors::Result;

pub const ID: &str = "plain";

/// Stores credentials verbatim.
///
/// `is_of_type` always says yes — any byte sequence could be plain text —
/// so this encoder must be registered *last* in any detection chain.
pub struct PlainEncoder;

impl Encoder for PlainEncoder {
    fn id(&self) -> &str {
        ID
    }

    fn is_of_type(&self, _encoded: &[u8], _charset: Charset) -> bool {
        true
    }

    fn encode(
        &self,
        plain: &[u8],
        _salt: Option<&[u8]>,
        _passphrase: Option<&[u8]>,
        _charset: Charset,
    ) -> Result<Vec<u8>> {
        Ok(plain.to_vec())
    }

    fn decode(
        &self,
        encoded: &[u8],
        _passphrase: Option<&[u8]>,
        _charset: Charset,
    ) -> Result<Vec<u8>> {
        Ok(encoded.to_vec())
    }
}
