//! Settlement Request Domain Model
//!
//! A `Request` is one settlement event between a user and a provider. Its
//! encodings are fixed-layout big-endian byte strings; the off-chain signer
//! and the circuit must agree on them bit for bit.

use serde::{Deserialize, Serialize};
use std::ops::Deref;

/// Width of the nonce in bytes
pub const NONCE_LENGTH: usize = 8;

/// Width of an account address in bytes
pub const ADDR_LENGTH: usize = 20;

/// Width of a fee in bytes
pub const FEE_LENGTH: usize = 16;

/// Width of the request content digest in bytes
pub const HASH_LENGTH: usize = 32;

/// Length of a signed leg message (`serialize_request` / `serialize_response`)
pub const LEG_MESSAGE_LENGTH: usize = NONCE_LENGTH + 2 * ADDR_LENGTH + FEE_LENGTH + HASH_LENGTH;

/// Length of one prover trace entry (`serialize`)
pub const TRACE_ENTRY_LENGTH: usize =
    NONCE_LENGTH + 2 * ADDR_LENGTH + 2 * FEE_LENGTH + HASH_LENGTH;

pub type Address = [u8; ADDR_LENGTH];
pub type RequestHash = [u8; HASH_LENGTH];

/// Fixed-layout byte encoding of a request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldTrace(Vec<u8>);

impl FieldTrace {
    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }
}

impl From<Vec<u8>> for FieldTrace {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl Deref for FieldTrace {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl AsRef<[u8]> for FieldTrace {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Settlement request
///
/// Immutable after construction. A no-op request (zero fees, zero hash) only
/// exists to fill a batch up to the circuit length.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Request {
    nonce: u64,
    user_address: Address,
    provider_address: Address,
    req_fee: u128,
    res_fee: u128,
    request_hash: RequestHash,
}

impl Request {
    pub fn new(
        nonce: u64,
        user_address: Address,
        provider_address: Address,
        req_fee: u128,
        res_fee: u128,
        request_hash: RequestHash,
    ) -> Self {
        Self {
            nonce,
            user_address,
            provider_address,
            req_fee,
            res_fee,
            request_hash,
        }
    }

    /// Padding entry: nonce and addresses only
    pub fn noop(nonce: u64, user_address: Address, provider_address: Address) -> Self {
        Self::new(nonce, user_address, provider_address, 0, 0, [0u8; HASH_LENGTH])
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn user_address(&self) -> &Address {
        &self.user_address
    }

    pub fn provider_address(&self) -> &Address {
        &self.provider_address
    }

    pub fn req_fee(&self) -> u128 {
        self.req_fee
    }

    pub fn res_fee(&self) -> u128 {
        self.res_fee
    }

    pub fn request_hash(&self) -> &RequestHash {
        &self.request_hash
    }

    pub fn is_noop(&self) -> bool {
        self.req_fee == 0 && self.res_fee == 0 && self.request_hash == [0u8; HASH_LENGTH]
    }

    /// Message signed for the request leg:
    /// `nonce | user | provider | req_fee | request_hash`
    pub fn serialize_request(&self) -> FieldTrace {
        self.encode(&[self.req_fee], LEG_MESSAGE_LENGTH)
    }

    /// Message signed for the response leg:
    /// `nonce | user | provider | res_fee | request_hash`
    pub fn serialize_response(&self) -> FieldTrace {
        self.encode(&[self.res_fee], LEG_MESSAGE_LENGTH)
    }

    /// Full trace entry handed to the prover:
    /// `nonce | user | provider | req_fee | res_fee | request_hash`
    pub fn serialize(&self) -> FieldTrace {
        self.encode(&[self.req_fee, self.res_fee], TRACE_ENTRY_LENGTH)
    }

    fn encode(&self, fees: &[u128], capacity: usize) -> FieldTrace {
        let mut out = Vec::with_capacity(capacity);
        out.extend_from_slice(&self.nonce.to_be_bytes());
        out.extend_from_slice(&self.user_address);
        out.extend_from_slice(&self.provider_address);
        for fee in fees {
            out.extend_from_slice(&fee.to_be_bytes());
        }
        out.extend_from_slice(&self.request_hash);
        debug_assert_eq!(out.len(), capacity);
        FieldTrace(out)
    }
}
