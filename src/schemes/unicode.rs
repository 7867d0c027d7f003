//! Active Directory password encoding.
//!
//! AD's `unicodePwd` attribute takes the password surrounded by double
//! quotes and converted to UTF-16LE.  The quoting is part of the wire
//! format, so it happens here rather than in the connector.

use crate::charset::Charset;
use crate::encoder::Encoder;
use crate::errors::Result;

pub const ID: &str = "unicode";

pub struct UnicodeEncoder;

impl Encoder for UnicodeEncoder {
    fn id(&self) -> &str {
        ID
    }

    fn encode(
        &self,
        plain: &[u8],
        _salt: Option<&[u8]>,
        _passphrase: Option<&[u8]>,
        charset: Charset,
    ) -> Result<Vec<u8>> {
        let quoted = format!("\"{}\"", charset.decode(plain)?);
        let mut out = Vec::with_capacity(quoted.len() * 2);
        for unit in quoted.encode_utf16() {
            out.extend_from_slice(&unit.to_le_bytes());
        }
        Ok(out)
    }
}
