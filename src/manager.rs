//! The encoder registry.
//!
//! A manager owns a set of encoders and addresses them by ID.  Insertion
//! order is significant: scheme detection walks the registry in the order
//! encoders were registered and returns the first claimant, so encoders
//! with strong signatures (magic prefixes, structured frames) must be
//! registered before permissive ones, and `plain`, which claims
//! everything, must come last.

use std::sync::Arc;

use tracing::debug;

use crate::charset::Charset;
use crate::encoder::Encoder;
use crate::errors::{EncoderError, Result};
use crate::schemes;
use crate::schemes::{
    AesEncoder, Base64Encoder, BlowfishEncoder, DigestEncoder, Drupal7Encoder, Md5CryptEncoder,
    PbeMd5DesEncoder, PlainEncoder, Sha512CryptEncoder, TaggedDigestEncoder, TokenEncoder,
    UnicodeEncoder, UnixDesEncoder,
};
use crate::token::TokenDatabase;

#[derive(Default)]
pub struct EncoderManager {
    encoders: Vec<Box<dyn Encoder>>,
}

impl EncoderManager {
    /// An empty registry. Most callers want
    /// [`with_default_encoders`](Self::with_default_encoders) instead.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with every scheme that needs no external state, in
    /// detection order.
    pub fn with_default_encoders() -> Self {
        let mut manager = Self::new();
        // Registration cannot fail here: all IDs are distinct constants.
        let encoders: Vec<Box<dyn Encoder>> = vec![
            // Strong textual signatures first.
            Box::new(TaggedDigestEncoder::md5()),
            Box::new(TaggedDigestEncoder::sha1()),
            Box::new(Md5CryptEncoder::unix()),
            Box::new(Md5CryptEncoder::htpasswd()),
            Box::new(Sha512CryptEncoder),
            Box::new(BlowfishEncoder),
            Box::new(Drupal7Encoder),
            // Structured binary frames.
            Box::new(AesEncoder::aes128()),
            Box::new(AesEncoder::aes192()),
            Box::new(AesEncoder::aes256()),
            Box::new(schemes::aes128_base64()),
            Box::new(schemes::aes192_base64()),
            Box::new(schemes::aes256_base64()),
            Box::new(PbeMd5DesEncoder),
            Box::new(schemes::pbe_md5_des_base64()),
            // Undetectable one-way schemes.
            Box::new(UnixDesEncoder),
            Box::new(DigestEncoder::md5()),
            Box::new(DigestEncoder::sha1()),
            Box::new(DigestEncoder::md5_base64()),
            Box::new(DigestEncoder::sha1_base64()),
            // Transport encodings, with the catch-all dead last.
            Box::new(UnicodeEncoder),
            Box::new(Base64Encoder),
            Box::new(PlainEncoder),
        ];
        for encoder in encoders {
            manager
                .register(encoder)
                .unwrap_or_else(|e| unreachable!("default registry is duplicate-free: {e}"));
        }
        manager
    }

    /// Add the token-database encoders. Called separately because they
    /// need a provisioned [`TokenDatabase`].
    pub fn register_token_encoders(&mut self, db: Arc<TokenDatabase>) -> Result<()> {
        self.register(Box::new(TokenEncoder::new(Arc::clone(&db))))?;
        self.register(Box::new(schemes::token_base64(db)))
    }

    /// Register an encoder at the end of the detection order.
    pub fn register(&mut self, encoder: Box<dyn Encoder>) -> Result<()> {
        let id = encoder.id().to_string();
        if self.by_id(&id).is_some() {
            return Err(EncoderError::IllegalArgument(format!(
                "an encoder with ID '{id}' is already registered"
            )));
        }
        debug!(id = %id, "registering encoder");
        self.encoders.push(encoder);
        Ok(())
    }

    /// Remove an encoder, returning it. An unknown ID is a caller bug,
    /// same as a duplicate registration.
    pub fn unregister(&mut self, id: &str) -> Result<Box<dyn Encoder>> {
        let pos = self
            .encoders
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| {
                EncoderError::IllegalArgument(format!("no encoder with ID '{id}' is registered"))
            })?;
        Ok(self.encoders.remove(pos))
    }

    pub fn by_id(&self, id: &str) -> Option<&dyn Encoder> {
        self.encoders
            .iter()
            .find(|e| e.id() == id)
            .map(|e| e.as_ref())
    }

    /// Registered IDs in detection order.
    pub fn ids(&self) -> Vec<&str> {
        self.encoders.iter().map(|e| e.id()).collect()
    }

    /// Guess which registered encoder produced `encoded`.
    ///
    /// Walks the registry in insertion order and returns the first encoder
    /// whose `is_of_type` claims the value; `candidates` restricts the walk
    /// to a subset of IDs.  The result is a hint, not proof.
    pub fn detect(
        &self,
        encoded: &[u8],
        charset: Charset,
        candidates: Option<&[&str]>,
    ) -> Option<&dyn Encoder> {
        self.encoders
            .iter()
            .filter(|e| candidates.map_or(true, |ids| ids.contains(&e.id())))
            .find(|e| e.is_of_type(encoded, charset))
            .map(|e| e.as_ref())
    }

    fn require(&self, id: &str) -> Result<&dyn Encoder> {
        self.by_id(id).ok_or_else(|| {
            EncoderError::IllegalArgument(format!("no encoder with ID '{id}' is registered"))
        })
    }

    /// Encode `plain` text with the named scheme (`plain` when `None`).
    pub fn encode(
        &self,
        plain: &str,
        id: Option<&str>,
        salt: Option<&[u8]>,
        passphrase: Option<&[u8]>,
        charset: Charset,
    ) -> Result<Vec<u8>> {
        let encoder = self.require(id.unwrap_or(schemes::plain::ID))?;
        encoder.encode(&charset.encode(plain)?, salt, passphrase, charset)
    }

    /// Decode an encoded value back to text with the named scheme
    /// (`plain` when `None`).
    pub fn decode(
        &self,
        encoded: &[u8],
        id: Option<&str>,
        passphrase: Option<&[u8]>,
        charset: Charset,
    ) -> Result<String> {
        let encoder = self.require(id.unwrap_or(schemes::plain::ID))?;
        charset.decode(&encoder.decode(encoded, passphrase, charset)?)
    }

    /// Verify `plain` text against an encoded value with the named scheme.
    pub fn matches(
        &self,
        encoded: &[u8],
        plain: &str,
        id: &str,
        passphrase: Option<&[u8]>,
        charset: Charset,
    ) -> Result<bool> {
        self.require(id)?
            .matches(encoded, &charset.encode(plain)?, passphrase, charset)
    }
}
