//! Core error types

use thiserror::Error;

/// Core error type for zk-settlement
#[derive(Debug, Error)]
pub enum CoreError {
    /// Configuration could not be parsed or contained an invalid value
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
