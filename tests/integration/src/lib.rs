//! Cross-crate integration tests for the settlement pipeline
//!
//! This test suite validates:
//! - Signing and verification of both legs over a whole batch
//! - Padding to circuit length and proof input assembly
//! - Proof generation and calldata through both prover backends

pub mod test_utils;

#[cfg(test)]
mod settlement_flow_tests;

#[cfg(all(test, unix))]
mod command_backend_tests;
