//! Configuration management for the settlement agent.
//!
//! Configuration is layered: built-in defaults, then an optional TOML file,
//! then environment variable overrides.

use serde::{Deserialize, Serialize};
#[cfg(feature = "toml")]
use std::path::Path;
use std::path::PathBuf;

use crate::error::{CoreError, Result};

/// Environment variable naming the TOML configuration file
pub const CONFIG_PATH_ENV: &str = "ZK_SETTLEMENT_CONFIG";

/// Default request body limit (10 MiB)
pub const DEFAULT_BODY_LIMIT_BYTES: usize = 10 * 1024 * 1024;

/// Default circuit length: the largest padding target accepted
pub const DEFAULT_MAX_BATCH_LEN: usize = 1024;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AgentConfig {
    pub server: ServerConfig,
    pub prover: ProverConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub body_limit_bytes: usize,
}

/// Proof generation backend
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ProverBackend {
    /// Artifact-backed prover running inside the agent process
    #[default]
    InProcess,
    /// Prover engine executed as a separate process
    External,
}

impl std::str::FromStr for ProverBackend {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "inprocess" | "in-process" => Ok(Self::InProcess),
            // "rust" is the name older clients use for the out-of-process engine
            "external" | "rust" => Ok(Self::External),
            other => Err(CoreError::Config(format!("unknown prover backend '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ProverConfig {
    pub default_backend: ProverBackend,
    /// Circuit length; requests padded beyond it are rejected
    pub max_batch_len: usize,
    /// Directory holding verification key, verifier sources and proving key.
    /// Mock mode is used when unset.
    pub artifacts_dir: Option<PathBuf>,
    /// Executable used by the external backend
    pub external_command: Option<PathBuf>,
    pub external_args: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for ProverConfig {
    fn default() -> Self {
        Self {
            default_backend: ProverBackend::default(),
            max_batch_len: DEFAULT_MAX_BATCH_LEN,
            artifacts_dir: None,
            external_command: None,
            external_args: Vec::new(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            body_limit_bytes: DEFAULT_BODY_LIMIT_BYTES,
        }
    }
}

impl AgentConfig {
    #[cfg(feature = "toml")]
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from `ZK_SETTLEMENT_CONFIG` (if set) and apply
    /// environment overrides.
    #[cfg(feature = "toml")]
    pub fn load() -> anyhow::Result<Self> {
        let mut config = match std::env::var_os(CONFIG_PATH_ENV) {
            Some(path) => Self::from_file(&path).map_err(|e| {
                anyhow::anyhow!("failed to load config from {:?}: {}", path, e)
            })?,
            None => Self::default(),
        };
        config.apply_env(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Apply environment overrides using the given lookup.
    ///
    /// `JS_PROVER_PORT` is honoured for deployments that predate the
    /// `ZK_SETTLEMENT_PORT` name.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("ZK_SETTLEMENT_HOST") {
            self.server.host = host;
        }

        if let Some(port) = lookup("ZK_SETTLEMENT_PORT").or_else(|| lookup("JS_PROVER_PORT")) {
            self.server.port = port
                .parse()
                .map_err(|_| CoreError::Config(format!("invalid port '{}'", port)))?;
        }

        if let Some(dir) = lookup("ZK_SETTLEMENT_ARTIFACTS_DIR") {
            self.prover.artifacts_dir = Some(PathBuf::from(dir));
        }

        if let Some(command) = lookup("ZK_SETTLEMENT_PROVER_COMMAND") {
            self.prover.external_command = Some(PathBuf::from(command));
        }

        if let Some(max) = lookup("ZK_SETTLEMENT_MAX_BATCH_LEN") {
            self.prover.max_batch_len = max
                .parse()
                .map_err(|_| CoreError::Config(format!("invalid max batch length '{}'", max)))?;
        }

        if let Some(backend) = lookup("ZK_SETTLEMENT_PROVER_BACKEND") {
            self.prover.default_backend = backend.parse()?;
        }

        if let Some(json) = lookup("ZK_SETTLEMENT_LOG_JSON") {
            self.logging.json = matches!(json.as_str(), "1" | "true" | "TRUE" | "yes");
        }

        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
