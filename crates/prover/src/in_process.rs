//! In-process prover.
//!
//! Loads circuit artifacts from a directory:
//! - `verification_key.json` (required)
//! - `verifier.sol`, `batch_verifier.sol` (optional)
//! - `circuit_final.zkey` (optional proving key)
//!
//! Without artifacts the prover runs in mock mode: proofs are deterministic
//! Groth16-shaped placeholders that are structurally valid but
//! cryptographically meaningless, while the public signals are the real
//! Poseidon commitment over the trace.
//!
//! # Fail-Visible Pattern
//! Once an artifacts directory is loaded, mock proofs are never produced:
//! a missing proving key is `ArtifactMissing`, and a proving key without a
//! linked witness generator is `ProverFailure`.

use ark_bn254::Fq;
use ark_ff::PrimeField;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use zk_settlement_domain::ProofInput;

use crate::error::{ProverError, ProverResult};
use crate::poseidon::{field_to_decimal, public_signals};
use crate::prover::Prover;
use crate::types::{Proof, ProofOutput, VerificationKey, CURVE_BN128, PROTOCOL_GROTH16};

pub const VERIFICATION_KEY_FILE: &str = "verification_key.json";
pub const VERIFIER_CONTRACT_FILE: &str = "verifier.sol";
pub const BATCH_VERIFIER_CONTRACT_FILE: &str = "batch_verifier.sol";
pub const PROVING_KEY_FILE: &str = "circuit_final.zkey";

/// Number of public signals: trace commitment plus two signer halves per leg
pub const PUBLIC_SIGNAL_COUNT: usize = 5;

const MOCK_CONTEXT: &str = "zk-settlement mock groth16 proof";
const MOCK_VKEY_CONTEXT: &str = "zk-settlement mock verification key";

#[derive(Debug, Clone, Default)]
pub struct InProcessProver {
    verification_key: Option<VerificationKey>,
    verifier_contract: Option<String>,
    batch_verifier_contract: Option<String>,
    proving_key: Option<Vec<u8>>,
    artifacts_dir: Option<PathBuf>,
}

impl InProcessProver {
    /// Prover without circuit artifacts (TESTING ONLY)
    pub fn mock() -> Self {
        Self::default()
    }

    /// Load circuit artifacts from `dir`.
    pub fn from_artifacts_dir(dir: &Path) -> ProverResult<Self> {
        let vkey_path = dir.join(VERIFICATION_KEY_FILE);
        let vkey_json = std::fs::read_to_string(&vkey_path).map_err(|e| {
            ProverError::ArtifactMissing(format!(
                "verification key missing at {:?}: {}",
                vkey_path, e
            ))
        })?;
        let verification_key: VerificationKey = serde_json::from_str(&vkey_json)?;
        if !verification_key.is_consistent() {
            return Err(ProverError::ProverFailure(format!(
                "verification key at {:?} declares {} public signals but has {} IC points",
                vkey_path,
                verification_key.n_public,
                verification_key.ic.len()
            )));
        }

        let prover = Self {
            verification_key: Some(verification_key),
            verifier_contract: read_optional(&dir.join(VERIFIER_CONTRACT_FILE))?,
            batch_verifier_contract: read_optional(&dir.join(BATCH_VERIFIER_CONTRACT_FILE))?,
            proving_key: read_optional_bytes(&dir.join(PROVING_KEY_FILE))?,
            artifacts_dir: Some(dir.to_path_buf()),
        };

        info!(
            artifacts_dir = ?dir,
            proving_key = prover.proving_key.is_some(),
            verifier = prover.verifier_contract.is_some(),
            batch_verifier = prover.batch_verifier_contract.is_some(),
            "circuit artifacts loaded"
        );
        if let Some(vkey) = &prover.verification_key {
            if vkey.n_public != PUBLIC_SIGNAL_COUNT {
                warn!(
                    expected = PUBLIC_SIGNAL_COUNT,
                    actual = vkey.n_public,
                    "verification key does not match settlement public signals"
                );
            }
        }
        if prover.proving_key.is_none() {
            warn!("no proving key in artifacts directory; in-process proof generation disabled");
        }
        Ok(prover)
    }

    pub fn is_mock(&self) -> bool {
        self.verification_key.is_none() && self.proving_key.is_none()
    }

    /// Check a mock proof against the input it claims to cover.
    pub fn verify_proof(&self, input: &ProofInput, output: &ProofOutput) -> ProverResult<bool> {
        if !self.is_mock() {
            return Err(ProverError::ProverFailure(
                "in-process verification is only available in mock mode".to_string(),
            ));
        }
        if output.proof.protocol != PROTOCOL_GROTH16 || output.proof.curve != CURVE_BN128 {
            return Ok(false);
        }
        let expected = self.generate_proof(input)?;
        Ok(&expected == output)
    }

    fn mock_proof(signals: &[String]) -> Proof {
        let mut hasher = blake3::Hasher::new_derive_key(MOCK_CONTEXT);
        for signal in signals {
            hasher.update(signal.as_bytes());
            hasher.update(&[0]);
        }
        let mut reader = hasher.finalize_xof();
        let mut next = || {
            let mut buf = [0u8; 32];
            reader.fill(&mut buf);
            field_to_decimal(Fq::from_be_bytes_mod_order(&buf))
        };

        Proof {
            pi_a: vec![next(), next(), "1".to_string()],
            pi_b: vec![
                vec![next(), next()],
                vec![next(), next()],
                vec!["1".to_string(), "0".to_string()],
            ],
            pi_c: vec![next(), next(), "1".to_string()],
            protocol: PROTOCOL_GROTH16.to_string(),
            curve: CURVE_BN128.to_string(),
        }
    }

    fn mock_verification_key() -> VerificationKey {
        let mut reader = blake3::Hasher::new_derive_key(MOCK_VKEY_CONTEXT).finalize_xof();
        let mut next = || {
            let mut buf = [0u8; 32];
            reader.fill(&mut buf);
            field_to_decimal(Fq::from_be_bytes_mod_order(&buf))
        };
        let mut g1 = || vec![next(), next(), "1".to_string()];
        let g1_points: Vec<Vec<String>> = (0..PUBLIC_SIGNAL_COUNT + 2).map(|_| g1()).collect();

        let mut reader = blake3::Hasher::new_derive_key(MOCK_VKEY_CONTEXT)
            .update(b"g2")
            .finalize_xof();
        let mut next = || {
            let mut buf = [0u8; 32];
            reader.fill(&mut buf);
            field_to_decimal(Fq::from_be_bytes_mod_order(&buf))
        };
        let mut g2 = || {
            vec![
                vec![next(), next()],
                vec![next(), next()],
                vec!["1".to_string(), "0".to_string()],
            ]
        };

        VerificationKey {
            protocol: PROTOCOL_GROTH16.to_string(),
            curve: CURVE_BN128.to_string(),
            n_public: PUBLIC_SIGNAL_COUNT,
            vk_alpha_1: g1_points[0].clone(),
            vk_beta_2: g2(),
            vk_gamma_2: g2(),
            vk_delta_2: g2(),
            ic: g1_points[1..].to_vec(),
            extra: serde_json::Map::new(),
        }
    }
}

fn read_optional(path: &Path) -> ProverResult<Option<String>> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

fn read_optional_bytes(path: &Path) -> ProverResult<Option<Vec<u8>>> {
    match std::fs::read(path) {
        Ok(contents) => Ok(Some(contents)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl Prover for InProcessProver {
    fn name(&self) -> &'static str {
        "inprocess"
    }

    fn generate_proof(&self, input: &ProofInput) -> ProverResult<ProofOutput> {
        input.validate()?;

        if self.proving_key.is_some() {
            return Err(ProverError::ProverFailure(format!(
                "{} loaded from {:?} but no witness generator is linked into this process; \
                 select the external backend",
                PROVING_KEY_FILE, self.artifacts_dir
            )));
        }
        if !self.is_mock() {
            return Err(ProverError::ArtifactMissing(format!(
                "{} not found in artifacts directory {:?}",
                PROVING_KEY_FILE, self.artifacts_dir
            )));
        }

        let public_signals = public_signals(input)?;
        let proof = Self::mock_proof(&public_signals);
        debug!(entries = input.len(), "mock proof generated");
        Ok(ProofOutput {
            proof,
            public_signals,
        })
    }

    fn verification_key(&self) -> ProverResult<VerificationKey> {
        match &self.verification_key {
            Some(vkey) => Ok(vkey.clone()),
            None => Ok(Self::mock_verification_key()),
        }
    }

    fn verifier_contract(&self, batched: bool) -> ProverResult<String> {
        let (contract, file) = if batched {
            (&self.batch_verifier_contract, BATCH_VERIFIER_CONTRACT_FILE)
        } else {
            (&self.verifier_contract, VERIFIER_CONTRACT_FILE)
        };
        contract.clone().ok_or_else(|| {
            ProverError::ArtifactMissing(format!(
                "{} not found in artifacts directory {:?}",
                file, self.artifacts_dir
            ))
        })
    }
}
