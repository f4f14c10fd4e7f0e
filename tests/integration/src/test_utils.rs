//! Fixtures shared by the integration tests

use zk_settlement_crypto::{Ed25519Signer, PrivateKey, PublicKey, Signer};
use zk_settlement_domain::Request;

/// Deterministic signing identity
pub struct TestSigner {
    pub signer: Ed25519Signer,
    pub private_key: PrivateKey,
    pub public_key: PublicKey,
}

impl TestSigner {
    /// Keys derived from a fixed seed so runs are reproducible
    pub fn from_seed(seed: u8) -> Self {
        let signer = Ed25519Signer::new();
        let private_key = PrivateKey::from_bytes(&[seed; 32]);
        let public_key = signer
            .derive_public_key(&private_key)
            .expect("any 32-byte seed is a valid Ed25519 secret");
        Self {
            signer,
            private_key,
            public_key,
        }
    }
}

/// Requests for one user/provider pair with the given nonces
pub fn batch(nonces: &[u64]) -> Vec<Request> {
    nonces
        .iter()
        .map(|&nonce| {
            let mut hash = [0u8; 32];
            hash[24..].copy_from_slice(&nonce.to_be_bytes());
            Request::new(
                nonce,
                [0x11; 20],
                [0x22; 20],
                u128::from(nonce) * 1_000,
                u128::from(nonce) * 10,
                hash,
            )
        })
        .collect()
}

/// Initialize tracing once, ignoring repeat calls from other tests
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}
