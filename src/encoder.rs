//! The `Encoder` contract.
//!
//! An encoder is a named, stateless-per-call strategy implementing one
//! password storage format.  One-way encoders (digests, crypt-style hashes)
//! only ever re-derive and compare; reversible encoders (ciphers) can also
//! decode given the right passphrase.

use subtle::ConstantTimeEq;

use crate::charset::Charset;
use crate::errors::{EncoderError, Result};

/// A strategy for encoding some plaintext into a stored credential form,
/// and optionally back again.
pub trait Encoder: Send + Sync {
    /// Stable identifier used for registry lookup and for selecting the
    /// right encoder when re-encoding across systems.
    fn id(&self) -> &str;

    /// Best-effort structural check that `encoded` *could* have been
    /// produced by this encoder.
    ///
    /// Unreliable by design: false negatives are fine, and a positive
    /// result is only a hint for detection ordering, never proof.  Only use
    /// it when the stored scheme ID is unknown.
    fn is_of_type(&self, _encoded: &[u8], _charset: Charset) -> bool {
        false
    }

    /// Encode plaintext for storage.
    ///
    /// One-way encoders ignore `passphrase`; cipher encoders require it.
    /// Salted schemes generate a salt when none is supplied and embed it in
    /// the encoded value.
    fn encode(
        &self,
        plain: &[u8],
        salt: Option<&[u8]>,
        passphrase: Option<&[u8]>,
        charset: Charset,
    ) -> Result<Vec<u8>>;

    /// Decode an encoded value back to the original plaintext.
    ///
    /// One-way encoders always fail with `UnsupportedOperation` — a hash
    /// cannot be inverted, and callers relying on decode for such a scheme
    /// have a configuration bug, not a transient error.
    fn decode(
        &self,
        _encoded: &[u8],
        _passphrase: Option<&[u8]>,
        _charset: Charset,
    ) -> Result<Vec<u8>> {
        Err(EncoderError::UnsupportedOperation(self.id().to_string()))
    }

    /// Check whether `plain` would produce `encoded` if it were encoded.
    ///
    /// One-way encoders re-derive the salt (and cost) from `encoded` and
    /// recompute; reversible encoders decode and compare.  The default
    /// covers unsalted one-way schemes: re-encode and compare in constant
    /// time.
    fn matches(
        &self,
        encoded: &[u8],
        plain: &[u8],
        passphrase: Option<&[u8]>,
        charset: Charset,
    ) -> Result<bool> {
        let reencoded = self.encode(plain, None, passphrase, charset)?;
        Ok(ct_eq(encoded, &reencoded))
    }
}

/// Constant-time equality over byte slices.
///
/// `subtle` already yields false for mismatched lengths without a timing
/// dependence on the content.
pub(crate) fn ct_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

/// Generate `count` cryptographically random bytes for salts and noise.
pub(crate) fn random_bytes(count: usize) -> Vec<u8> {
    use rand_core::RngCore;
    let mut bytes = vec![0u8; count];
    rand_core::OsRng.fill_bytes(&mut bytes);
    bytes
}
