//! Groth16 proof artifacts in their snarkjs JSON shape.
//!
//! Field elements are decimal strings; G1 points carry three projective
//! coordinates and G2 points three pairs.

use serde::{Deserialize, Serialize};

pub const PROTOCOL_GROTH16: &str = "groth16";
pub const CURVE_BN128: &str = "bn128";

/// Groth16 proof
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proof {
    pub pi_a: Vec<String>,
    pub pi_b: Vec<Vec<String>>,
    pub pi_c: Vec<String>,
    pub protocol: String,
    pub curve: String,
}

impl Proof {
    /// Check the point shapes before the proof leaves this process.
    pub fn is_well_formed(&self) -> bool {
        self.pi_a.len() == 3
            && self.pi_c.len() == 3
            && self.pi_b.len() == 3
            && self.pi_b.iter().all(|pair| pair.len() == 2)
    }
}

/// Proof plus the public signals it commits to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofOutput {
    pub proof: Proof,
    pub public_signals: Vec<String>,
}

/// Groth16 verification key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationKey {
    pub protocol: String,
    pub curve: String,
    #[serde(rename = "nPublic")]
    pub n_public: usize,
    pub vk_alpha_1: Vec<String>,
    pub vk_beta_2: Vec<Vec<String>>,
    pub vk_gamma_2: Vec<Vec<String>>,
    pub vk_delta_2: Vec<Vec<String>>,
    #[serde(rename = "IC")]
    pub ic: Vec<Vec<String>>,
    /// Fields this crate does not interpret (`vk_alphabeta_12`, ...)
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl VerificationKey {
    pub fn is_consistent(&self) -> bool {
        self.ic.len() == self.n_public + 1
    }
}
