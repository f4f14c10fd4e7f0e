//! Proof generation capability.

use crate::calldata::format_solidity_calldata;
use crate::error::ProverResult;
use crate::types::{ProofOutput, VerificationKey};
use zk_settlement_domain::ProofInput;

/// Trait for settlement proof generation (dependency injection)
///
/// Backends are interchangeable; callers never branch on which one is active.
pub trait Prover: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    fn generate_proof(&self, input: &ProofInput) -> ProverResult<ProofOutput>;

    fn verification_key(&self) -> ProverResult<VerificationKey>;

    /// Solidity verifier source; `batched` selects the batch verifier.
    fn verifier_contract(&self, batched: bool) -> ProverResult<String>;

    /// Prove, then render the proof as Solidity calldata.
    fn solidity_calldata(&self, input: &ProofInput) -> ProverResult<String> {
        let output = self.generate_proof(input)?;
        format_solidity_calldata(&output.proof, &output.public_signals)
    }
}
