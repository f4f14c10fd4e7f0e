//! Core functionality shared across the zk-settlement workspace.
//!
//! This crate provides configuration loading, logging initialisation and the
//! core error type used by the settlement agent and its backends.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{AgentConfig, LoggingConfig, ProverBackend, ProverConfig, ServerConfig};
pub use error::{CoreError, Result};
