//! Settlement errors
//!
//! Pure domain errors with no transport dependencies

use thiserror::Error;
use zk_settlement_crypto::CryptoError;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SettlementError {
    #[error("Invalid field '{field}': {reason}")]
    InvalidFieldRange { field: String, reason: String },

    #[error("Batch too large: padding target {target} is smaller than batch size {actual}")]
    BatchTooLarge { target: usize, actual: usize },

    #[error("Padding target {target} exceeds the circuit length {max}")]
    TargetTooLarge { target: usize, max: usize },

    #[error("Malformed signature: {0}")]
    MalformedSignature(String),

    #[error("Malformed key: {0}")]
    MalformedKey(String),

    #[error("Invalid batch: {0}")]
    InvalidBatch(String),

    #[error("Length mismatch: {array} has {actual} entries, expected {expected}")]
    LengthMismatch {
        array: String,
        expected: usize,
        actual: usize,
    },

    #[error("Signer failure: {0}")]
    SignerFailure(String),

    #[error("Prover failure: {0}")]
    ProverFailure(String),
}

impl SettlementError {
    pub(crate) fn field(field: &str, reason: impl Into<String>) -> Self {
        Self::InvalidFieldRange {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// Errors caused by the caller's input rather than a failing capability
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::SignerFailure(_) | Self::ProverFailure(_))
    }

    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidFieldRange { .. } => "INVALID_FIELD_RANGE",
            Self::BatchTooLarge { .. } => "BATCH_TOO_LARGE",
            Self::TargetTooLarge { .. } => "TARGET_TOO_LARGE",
            Self::MalformedSignature(_) => "MALFORMED_SIGNATURE",
            Self::MalformedKey(_) => "MALFORMED_KEY",
            Self::InvalidBatch(_) => "INVALID_BATCH",
            Self::LengthMismatch { .. } => "LENGTH_MISMATCH",
            Self::SignerFailure(_) => "SIGNER_FAILURE",
            Self::ProverFailure(_) => "PROVER_FAILURE",
        }
    }
}

impl From<CryptoError> for SettlementError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::MalformedSignature { .. } => Self::MalformedSignature(err.to_string()),
            CryptoError::MalformedKey(reason) => Self::MalformedKey(reason),
            CryptoError::SignerFailure(reason) => Self::SignerFailure(reason),
        }
    }
}

pub type Result<T> = std::result::Result<T, SettlementError>;
