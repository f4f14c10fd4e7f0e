//! Error types for proof generation.

use thiserror::Error;
use zk_settlement_domain::SettlementError;

/// Result type for prover operations
pub type ProverResult<T> = std::result::Result<T, ProverError>;

#[derive(Error, Debug)]
pub enum ProverError {
    /// The proof input itself is unusable
    #[error(transparent)]
    InvalidInput(#[from] SettlementError),

    /// A circuit artifact the operation needs was not loaded
    #[error("Artifact not available: {0}")]
    ArtifactMissing(String),

    /// The selected backend is not configured on this host
    #[error("Prover backend not configured: {0}")]
    NotConfigured(String),

    /// Proof generation or an external prover failed
    #[error("Prover failure: {0}")]
    ProverFailure(String),

    #[error("Hash error: {0}")]
    HashError(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ProverError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidInput(inner) => inner.code(),
            Self::ArtifactMissing(_) => "ARTIFACT_MISSING",
            Self::NotConfigured(_) => "BACKEND_NOT_CONFIGURED",
            Self::ProverFailure(_) | Self::HashError(_) | Self::Io(_) | Self::Json(_) => {
                "PROVER_FAILURE"
            }
        }
    }
}

impl From<ProverError> for SettlementError {
    fn from(err: ProverError) -> Self {
        match err {
            ProverError::InvalidInput(inner) => inner,
            other => SettlementError::ProverFailure(other.to_string()),
        }
    }
}
