//! Fixed-width signature and public key packing.
//!
//! A signature is carried as 64 bytes: the 32-byte curve point `R8`
//! followed by the 32-byte scalar `S`. Nothing here performs curve
//! arithmetic; point validation is left to the [`Signer`](crate::Signer).

use serde::{Deserialize, Serialize};

use crate::error::{CryptoError, CryptoResult};
use crate::keys::{PublicKey, PACKED_KEY_LENGTH};

/// Width of the `R8` point component
pub const R8_LENGTH: usize = 32;

/// Width of the `S` scalar component
pub const S_LENGTH: usize = 32;

/// Width of a packed signature
pub const PACKED_SIGNATURE_LENGTH: usize = R8_LENGTH + S_LENGTH;

/// Curve signature split into its two fixed-width halves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PackedSignatureRepr", into = "String")]
pub struct Signature {
    pub r8: [u8; R8_LENGTH],
    pub s: [u8; S_LENGTH],
}

impl Signature {
    pub fn new(r8: [u8; R8_LENGTH], s: [u8; S_LENGTH]) -> Self {
        Self { r8, s }
    }
}

/// Wire form of a packed signature: `0x` hex text or a JSON byte array.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum PackedSignatureRepr {
    Hex(String),
    Bytes(Vec<u8>),
}

impl TryFrom<PackedSignatureRepr> for Signature {
    type Error = CryptoError;

    fn try_from(value: PackedSignatureRepr) -> CryptoResult<Self> {
        match value {
            PackedSignatureRepr::Bytes(bytes) => SignatureCodec::unpack(&bytes),
            PackedSignatureRepr::Hex(text) => {
                let digits = text.strip_prefix("0x").unwrap_or(&text);
                let bytes = hex::decode(digits).map_err(|_| {
                    CryptoError::MalformedSignature {
                        expected: PACKED_SIGNATURE_LENGTH,
                        actual: digits.len() / 2,
                    }
                })?;
                SignatureCodec::unpack(&bytes)
            }
        }
    }
}

impl From<Signature> for String {
    fn from(signature: Signature) -> Self {
        format!("0x{}", hex::encode(SignatureCodec::pack(&signature)))
    }
}

/// Lossless packing of signatures and public keys
pub struct SignatureCodec;

impl SignatureCodec {
    /// `R8 || S`
    pub fn pack(signature: &Signature) -> [u8; PACKED_SIGNATURE_LENGTH] {
        let mut out = [0u8; PACKED_SIGNATURE_LENGTH];
        out[..R8_LENGTH].copy_from_slice(&signature.r8);
        out[R8_LENGTH..].copy_from_slice(&signature.s);
        out
    }

    pub fn unpack(bytes: &[u8]) -> CryptoResult<Signature> {
        if bytes.len() != PACKED_SIGNATURE_LENGTH {
            return Err(CryptoError::MalformedSignature {
                expected: PACKED_SIGNATURE_LENGTH,
                actual: bytes.len(),
            });
        }

        let mut r8 = [0u8; R8_LENGTH];
        let mut s = [0u8; S_LENGTH];
        r8.copy_from_slice(&bytes[..R8_LENGTH]);
        s.copy_from_slice(&bytes[R8_LENGTH..]);
        Ok(Signature { r8, s })
    }

    /// Split a packed 32-byte public key into its two big-endian halves.
    pub fn unpack_public_key(bytes: &[u8]) -> CryptoResult<PublicKey> {
        let packed: &[u8; PACKED_KEY_LENGTH] = bytes.try_into().map_err(|_| {
            CryptoError::MalformedKey(format!(
                "packed public key must be {} bytes, got {}",
                PACKED_KEY_LENGTH,
                bytes.len()
            ))
        })?;
        Ok(PublicKey::from_bytes(packed))
    }

    pub fn pack_public_key(key: &PublicKey) -> [u8; PACKED_KEY_LENGTH] {
        key.to_bytes()
    }
}
