//! Error types for signature and key handling.

use thiserror::Error;

/// Result type for crypto operations
pub type CryptoResult<T> = std::result::Result<T, CryptoError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// Packed signature did not have the expected width
    #[error("Malformed signature: expected {expected} bytes, got {actual}")]
    MalformedSignature { expected: usize, actual: usize },

    /// Public or private key could not be decoded
    #[error("Malformed key: {0}")]
    MalformedKey(String),

    /// The underlying signature scheme failed
    #[error("Signer failure: {0}")]
    SignerFailure(String),
}
