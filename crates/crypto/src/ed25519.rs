//! Ed25519 signer
//!
//! Concrete [`Signer`] backed by `ed25519-dalek`:
//! - the 32-byte seed is the packed private key
//! - the compressed verifying key is the packed public point
//! - the 64-byte signature is `R || S`, mapped onto `R8 || S`
//!
//! Signing is deterministic for a given key and message.

use ed25519_dalek::{Signer as _, SigningKey, Verifier as _, VerifyingKey};
use rand::RngCore;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;
use zeroize::Zeroize;

use crate::codec::{Signature, SignatureCodec};
use crate::error::{CryptoError, CryptoResult};
use crate::keys::{KeyPair, PrivateKey, PublicKey, PACKED_KEY_LENGTH};
use crate::signer::Signer;

/// Counters for observability.
#[derive(Debug, Default)]
pub struct SignerMetrics {
    pub signatures_created_total: AtomicU64,
    pub verifications_total: AtomicU64,
    pub verifications_failed_total: AtomicU64,
}

#[derive(Debug, Default)]
pub struct Ed25519Signer {
    metrics: SignerMetrics,
}

impl Ed25519Signer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metrics(&self) -> &SignerMetrics {
        &self.metrics
    }

    fn signing_key(private_key: &PrivateKey) -> SigningKey {
        let mut seed = private_key.to_bytes();
        let signing_key = SigningKey::from_bytes(&seed);
        seed.zeroize();
        signing_key
    }
}

impl Signer for Ed25519Signer {
    type Point = VerifyingKey;

    fn generate_keypair(&self) -> CryptoResult<KeyPair> {
        let mut seed = [0u8; PACKED_KEY_LENGTH];
        rand::rngs::OsRng
            .try_fill_bytes(&mut seed)
            .map_err(|e| CryptoError::SignerFailure(format!("entropy source failed: {}", e)))?;

        let private_key = PrivateKey::from_bytes(&seed);
        seed.zeroize();

        let public_key = self.derive_public_key(&private_key)?;
        Ok(KeyPair {
            public_key,
            private_key,
        })
    }

    fn derive_public_key(&self, private_key: &PrivateKey) -> CryptoResult<PublicKey> {
        let verifying_key = Self::signing_key(private_key).verifying_key();
        Ok(PublicKey::from_bytes(verifying_key.as_bytes()))
    }

    fn sign(&self, message: &[u8], private_key: &PrivateKey) -> CryptoResult<Signature> {
        let signature = Self::signing_key(private_key).sign(message);
        self.metrics
            .signatures_created_total
            .fetch_add(1, Ordering::Relaxed);
        SignatureCodec::unpack(&signature.to_bytes())
    }

    fn verify(
        &self,
        message: &[u8],
        signature: &Signature,
        point: &VerifyingKey,
    ) -> CryptoResult<bool> {
        let packed = SignatureCodec::pack(signature);
        let signature = ed25519_dalek::Signature::from_bytes(&packed);
        let valid = point.verify(message, &signature).is_ok();

        self.metrics.verifications_total.fetch_add(1, Ordering::Relaxed);
        if !valid {
            self.metrics
                .verifications_failed_total
                .fetch_add(1, Ordering::Relaxed);
            debug!("ed25519 verification rejected signature");
        }
        Ok(valid)
    }

    fn pack_point(&self, point: &VerifyingKey) -> [u8; PACKED_KEY_LENGTH] {
        point.to_bytes()
    }

    fn unpack_point(&self, packed: &[u8; PACKED_KEY_LENGTH]) -> CryptoResult<VerifyingKey> {
        VerifyingKey::from_bytes(packed)
            .map_err(|e| CryptoError::MalformedKey(format!("not a curve point: {}", e)))
    }
}
