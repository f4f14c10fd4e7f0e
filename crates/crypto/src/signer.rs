//! Signature scheme capability.

use crate::codec::{Signature, SignatureCodec, PACKED_SIGNATURE_LENGTH};
use crate::error::CryptoResult;
use crate::keys::{KeyPair, PrivateKey, PublicKey, PACKED_KEY_LENGTH};

/// Curve signature capability consumed by the settlement pipeline
/// (dependency injection).
///
/// Implementations perform any one-time library setup in their constructor;
/// every method afterwards is side-effect free apart from the cryptographic
/// work itself.
pub trait Signer: Send + Sync {
    /// Unpacked curve point used for verification
    type Point: Clone + Send + Sync;

    fn generate_keypair(&self) -> CryptoResult<KeyPair>;

    fn derive_public_key(&self, private_key: &PrivateKey) -> CryptoResult<PublicKey>;

    fn sign(&self, message: &[u8], private_key: &PrivateKey) -> CryptoResult<Signature>;

    /// Verify a signature against an unpacked point.
    ///
    /// A well-formed but wrong signature is `Ok(false)`, not an error.
    fn verify(&self, message: &[u8], signature: &Signature, point: &Self::Point)
        -> CryptoResult<bool>;

    fn pack_point(&self, point: &Self::Point) -> [u8; PACKED_KEY_LENGTH];

    fn unpack_point(&self, packed: &[u8; PACKED_KEY_LENGTH]) -> CryptoResult<Self::Point>;

    fn pack_signature(&self, signature: &Signature) -> [u8; PACKED_SIGNATURE_LENGTH] {
        SignatureCodec::pack(signature)
    }

    /// Unpack a public key given in its two-field-element form.
    fn public_key_point(&self, public_key: &PublicKey) -> CryptoResult<Self::Point> {
        self.unpack_point(&SignatureCodec::pack_public_key(public_key))
    }
}
