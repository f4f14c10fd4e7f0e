//! Per-entry signing and verification over a batch.
//!
//! Signer calls are issued strictly in index order. A failing signer call
//! aborts the batch; a signature that merely does not verify is recorded as
//! `false` and the remaining entries are still checked.

use serde::Serialize;
use tracing::{debug, info, warn};
use zk_settlement_crypto::{PrivateKey, PublicKey, Signature, SignatureCodec, Signer};

use crate::batch::Leg;
use crate::error::{Result, SettlementError};
use crate::request::Request;

/// Signatures produced by [`SigningOrchestrator::sign_and_verify`], split
/// into the arrays the circuit consumes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignedBatch {
    #[serde(with = "hex_bytes")]
    pub packed_public_key: [u8; 32],
    pub signatures: Vec<Signature>,
    /// Self-verification outcome per entry
    pub valid: Vec<bool>,
}

impl SignedBatch {
    pub fn r8(&self) -> Vec<[u8; 32]> {
        self.signatures.iter().map(|sig| sig.r8).collect()
    }

    pub fn s(&self) -> Vec<[u8; 32]> {
        self.signatures.iter().map(|sig| sig.s).collect()
    }

    pub fn all_valid(&self) -> bool {
        self.valid.iter().all(|v| *v)
    }
}

mod hex_bytes {
    use serde::Serializer;

    pub fn serialize<S: Serializer>(bytes: &[u8; 32], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&format!("0x{}", hex::encode(bytes)))
    }
}

pub struct SigningOrchestrator<'a, S: Signer> {
    signer: &'a S,
}

impl<'a, S: Signer> SigningOrchestrator<'a, S> {
    pub fn new(signer: &'a S) -> Self {
        Self { signer }
    }

    /// Sign the `leg` message of every request, in order.
    pub fn sign(
        &self,
        requests: &[Request],
        private_key: &PrivateKey,
        leg: Leg,
    ) -> Result<Vec<Signature>> {
        let mut signatures = Vec::with_capacity(requests.len());
        for (index, request) in requests.iter().enumerate() {
            let message = leg.message(request);
            signatures.push(self.signer.sign(&message, private_key)?);
            debug!(index, nonce = request.nonce(), leg = leg.as_str(), "entry signed");
        }

        info!(count = signatures.len(), leg = leg.as_str(), "batch signed");
        Ok(signatures)
    }

    /// Verify each signature against the `leg` message of its request.
    ///
    /// The public key is unpacked once and shared across all entries.
    pub fn verify(
        &self,
        requests: &[Request],
        signatures: &[Signature],
        public_key: &PublicKey,
        leg: Leg,
    ) -> Result<Vec<bool>> {
        if requests.len() != signatures.len() {
            return Err(SettlementError::InvalidBatch(format!(
                "{} requests but {} signatures",
                requests.len(),
                signatures.len()
            )));
        }

        let point = self
            .signer
            .unpack_point(&SignatureCodec::pack_public_key(public_key))
            .map_err(|err| SettlementError::MalformedKey(err.to_string()))?;

        let mut results = Vec::with_capacity(requests.len());
        for (index, (request, signature)) in requests.iter().zip(signatures).enumerate() {
            let message = leg.message(request);
            let valid = self.signer.verify(&message, signature, &point)?;
            if !valid {
                warn!(index, nonce = request.nonce(), leg = leg.as_str(), "signature rejected");
            }
            results.push(valid);
        }

        let rejected = results.iter().filter(|v| !**v).count();
        info!(
            count = results.len(),
            rejected,
            leg = leg.as_str(),
            "batch verified"
        );
        Ok(results)
    }

    /// Sign every entry and immediately check each signature against the
    /// matching public key.
    pub fn sign_and_verify(
        &self,
        requests: &[Request],
        private_key: &PrivateKey,
        public_key: &PublicKey,
        leg: Leg,
    ) -> Result<SignedBatch> {
        let signatures = self.sign(requests, private_key, leg)?;
        let valid = self.verify(requests, &signatures, public_key, leg)?;

        Ok(SignedBatch {
            packed_public_key: SignatureCodec::pack_public_key(public_key),
            signatures,
            valid,
        })
    }
}
