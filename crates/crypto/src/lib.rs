//! Signature primitives for the zk-settlement pipeline.
//!
//! This crate provides the signing capability consumed by batch preparation:
//!
//! - **Keys**: public and private keys in their two-field-element form
//! - **Signature codec**: lossless `R8 || S` packing into 64 bytes
//! - **Signer**: the injected signature scheme trait, with an Ed25519
//!   implementation
//!
//! # Security Principles
//!
//! - Never roll custom cryptographic primitives
//! - Private keys are zeroized on drop and never logged
//! - Signatures must be verified before trust

pub mod codec;
pub mod ed25519;
pub mod error;
pub mod keys;
pub mod signer;

#[cfg(test)]
mod test_vectors;

pub use codec::{
    Signature, SignatureCodec, PACKED_SIGNATURE_LENGTH, R8_LENGTH, S_LENGTH,
};
pub use ed25519::{Ed25519Signer, SignerMetrics};
pub use error::{CryptoError, CryptoResult};
pub use keys::{KeyPair, PrivateKey, PublicKey, KEY_HALF_LENGTH, PACKED_KEY_LENGTH};
pub use signer::Signer;
