//! Settlement batch normalization.
//!
//! Pure domain logic with no I/O dependencies:
//! - Canonical request encodings signed off-chain and fed to the circuit
//! - Padding of a batch to the fixed circuit length
//! - Per-entry signing and verification through an injected [`Signer`]
//! - Assembly of the proof input handed to a prover
//!
//! [`Signer`]: zk_settlement_crypto::Signer

pub mod batch;
pub mod error;
pub mod orchestrator;
pub mod padding;
pub mod proof_input;
pub mod request;
pub mod wire;

pub use batch::{Batch, Leg};
pub use error::{Result, SettlementError};
pub use orchestrator::{SignedBatch, SigningOrchestrator};
pub use padding::{BatchPadder, PaddedBatch, DEFAULT_MAX_TARGET_LEN};
pub use proof_input::{ProofInput, ProofInputAssembler, SignedLeg};
pub use request::{
    Address, FieldTrace, Request, RequestHash, ADDR_LENGTH, FEE_LENGTH, HASH_LENGTH,
    LEG_MESSAGE_LENGTH, NONCE_LENGTH, TRACE_ENTRY_LENGTH,
};
pub use wire::{decode_requests, RequestWire, WireUint};
