//! Settlement proof generation.
//!
//! Turns a [`ProofInput`](zk_settlement_domain::ProofInput) into a Groth16
//! proof over BN254 through one of two interchangeable backends:
//!
//! - [`InProcessProver`]: circuit artifacts loaded into this process
//! - [`CommandProver`]: an external proving engine driven over stdin/stdout
//!
//! Public signals bind the proof to the batch through a circom-compatible
//! Poseidon commitment over the serialized trace.

pub mod calldata;
pub mod command;
pub mod error;
pub mod in_process;
pub mod poseidon;
pub mod prover;
pub mod types;

pub use calldata::format_solidity_calldata;
pub use command::CommandProver;
pub use error::{ProverError, ProverResult};
pub use in_process::{InProcessProver, PUBLIC_SIGNAL_COUNT};
pub use poseidon::{public_signals, trace_commitment};
pub use prover::Prover;
pub use types::{Proof, ProofOutput, VerificationKey};
