//! Password encoding, verification and migration codecs for legacy
//! identity stores.
//!
//! The crate is organised around the [`encoder::Encoder`] trait: one
//! implementation per storage format, addressed by a stable ID through an
//! [`manager::EncoderManager`] registry.  Reversible schemes (ciphers,
//! token-backed RSA) can also decode; one-way schemes verify by
//! re-deriving from the salt embedded in the stored value.

pub mod charset;
pub mod cli;
pub mod encoder;
pub mod errors;
pub mod manager;
pub mod schemes;
pub mod token;

pub use charset::Charset;
pub use encoder::Encoder;
pub use errors::{EncoderError, Result};
pub use manager::EncoderManager;
