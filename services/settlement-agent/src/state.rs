use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use zk_settlement_core::{AgentConfig, ProverBackend};
use zk_settlement_crypto::Ed25519Signer;
use zk_settlement_prover::{CommandProver, InProcessProver, Prover, ProverError};

/// Prover backends available to the agent
#[derive(Clone)]
pub struct ProverRegistry {
    default_backend: ProverBackend,
    in_process: Option<Arc<dyn Prover>>,
    external: Option<Arc<dyn Prover>>,
}

impl ProverRegistry {
    pub fn new(
        default_backend: ProverBackend,
        in_process: Option<Arc<dyn Prover>>,
        external: Option<Arc<dyn Prover>>,
    ) -> Self {
        Self {
            default_backend,
            in_process,
            external,
        }
    }

    pub fn from_config(config: &AgentConfig) -> anyhow::Result<Self> {
        let prover = &config.prover;

        let in_process = match &prover.artifacts_dir {
            Some(dir) => InProcessProver::from_artifacts_dir(dir)
                .with_context(|| format!("loading circuit artifacts from {:?}", dir))?,
            None => InProcessProver::mock(),
        };
        if in_process.is_mock() {
            info!("in-process prover running in mock mode");
        }

        let external = prover.external_command.as_ref().map(|program| {
            info!(program = ?program, "external prover configured");
            Arc::new(CommandProver::new(program, prover.external_args.clone())) as Arc<dyn Prover>
        });

        Ok(Self::new(
            prover.default_backend,
            Some(Arc::new(in_process) as Arc<dyn Prover>),
            external,
        ))
    }

    pub fn default_backend(&self) -> ProverBackend {
        self.default_backend
    }

    /// Resolve `requested`, falling back to the configured default.
    pub fn select(&self, requested: Option<ProverBackend>) -> Result<Arc<dyn Prover>, ProverError> {
        let backend = requested.unwrap_or(self.default_backend);
        let prover = match backend {
            ProverBackend::InProcess => &self.in_process,
            ProverBackend::External => &self.external,
        };
        prover.clone().ok_or_else(|| {
            ProverError::NotConfigured(format!("prover backend {:?} is not configured", backend))
        })
    }
}

struct Inner {
    config: AgentConfig,
    signer: Ed25519Signer,
    provers: ProverRegistry,
}

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

impl AppState {
    pub fn from_config(config: AgentConfig) -> anyhow::Result<Self> {
        let provers = ProverRegistry::from_config(&config)?;
        Ok(Self::with_provers(config, provers))
    }

    pub fn with_provers(config: AgentConfig, provers: ProverRegistry) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                signer: Ed25519Signer::new(),
                provers,
            }),
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.inner.config
    }

    pub fn signer(&self) -> &Ed25519Signer {
        &self.inner.signer
    }

    pub fn provers(&self) -> &ProverRegistry {
        &self.inner.provers
    }

    /// Circuit length accepted by the padding routes
    pub fn max_batch_len(&self) -> usize {
        self.inner.config.prover.max_batch_len
    }
}
