use thiserror::Error;

/// All errors that can occur in passcodec.
#[derive(Debug, Error)]
pub enum EncoderError {
    // --- Cryptographic failures ---
    #[error("Encoding failed: {0}")]
    Crypto(String),

    #[error("Decoding failed: wrong passphrase or corrupted data")]
    DecodeFailed,

    // --- Charset conversion ---
    #[error("Charset conversion failed: {0}")]
    Charset(String),

    // --- Structural misuse ---
    #[error("Encoder '{0}' is one-way and cannot decode")]
    UnsupportedOperation(String),

    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    // --- Token database ---
    #[error("Token database provisioning failed: {0}")]
    Provision(String),

    #[error("Token database state error: {0}")]
    TokenState(String),

    // --- CLI ---
    #[error("Command failed: {0}")]
    Command(String),

    // --- IO / serialization ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl EncoderError {
    /// True for "decode requested on a one-way scheme", a caller-logic
    /// bug rather than bad data.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, EncoderError::UnsupportedOperation(_))
    }

    /// True for argument misuse (unknown ID, duplicate registration,
    /// salt/passphrase where forbidden or missing where required).
    pub fn is_illegal_argument(&self) -> bool {
        matches!(self, EncoderError::IllegalArgument(_))
    }
}

/// Convenience type alias for passcodec results.
pub type Result<T> = std::result::Result<T, EncoderError>;
