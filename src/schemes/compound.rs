//! Ordered encoder pipelines.
//!
//! A compound encoder applies its stages in order on encode and in reverse
//! on decode, presenting the whole pipeline under one ID.  Used for the
//! `*-base64` variants, where a binary cipher frame is wrapped in transport
//! base64.

use crate::charset::Charset;
use crate::encoder::Encoder;
use crate::errors::Result;

pub struct CompoundEncoder {
    id: String,
    stages: Vec<Box<dyn Encoder>>,
}

impl CompoundEncoder {
    /// Build a pipeline. Panics on an empty stage list, which has no
    /// meaningful encode or decode.
    pub fn new(id: impl Into<String>, stages: Vec<Box<dyn Encoder>>) -> Self {
        assert!(!stages.is_empty(), "compound encoder needs at least one stage");
        Self {
            id: id.into(),
            stages,
        }
    }
}

impl Encoder for CompoundEncoder {
    fn id(&self) -> &str {
        &self.id
    }

    fn is_of_type(&self, encoded: &[u8], charset: Charset) -> bool {
        // All stages must agree; in practice the innermost binary stage
        // cannot recognise its own output, so compounds stay undetectable
        // and rely on the stored scheme ID.
        self.stages.iter().all(|s| s.is_of_type(encoded, charset))
    }

    fn encode(
        &self,
        plain: &[u8],
        salt: Option<&[u8]>,
        passphrase: Option<&[u8]>,
        charset: Charset,
    ) -> Result<Vec<u8>> {
        let mut data = plain.to_vec();
        for stage in &self.stages {
            data = stage.encode(&data, salt, passphrase, charset)?;
        }
        Ok(data)
    }

    fn decode(
        &self,
        encoded: &[u8],
        passphrase: Option<&[u8]>,
        charset: Charset,
    ) -> Result<Vec<u8>> {
        let mut data = encoded.to_vec();
        for stage in self.stages.iter().rev() {
            data = stage.decode(&data, passphrase, charset)?;
        }
        Ok(data)
    }

    fn matches(
        &self,
        encoded: &[u8],
        plain: &[u8],
        passphrase: Option<&[u8]>,
        charset: Charset,
    ) -> Result<bool> {
        // Unwrap the outer stages, then let the innermost encoder apply its
        // own salt-aware comparison.
        let mut data = encoded.to_vec();
        for stage in self.stages[1..].iter().rev() {
            data = stage.decode(&data, passphrase, charset)?;
        }
        self.stages[0].matches(&data, plain, passphrase, charset)
    }
}
