//! Key material in its two-field-element form.
//!
//! A packed 32-byte key is carried across the JSON boundary as two 128-bit
//! field elements: the big-endian high half and low half of the packed bytes.

use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::{CryptoError, CryptoResult};

/// Width of one key half in bytes
pub const KEY_HALF_LENGTH: usize = 16;

/// Width of a packed key in bytes
pub const PACKED_KEY_LENGTH: usize = 2 * KEY_HALF_LENGTH;

/// One key half as it arrives on the wire: a `0x` hex string, a decimal
/// string, or a plain JSON number.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum FieldHalf {
    Text(String),
    Number(u64),
}

impl FieldHalf {
    fn parse(&self) -> CryptoResult<u128> {
        match self {
            FieldHalf::Number(n) => Ok(u128::from(*n)),
            FieldHalf::Text(text) => parse_field_half(text),
        }
    }
}

/// Parse a 128-bit key half from `0x`-prefixed hex or decimal text.
pub fn parse_field_half(text: &str) -> CryptoResult<u128> {
    let text = text.trim();
    let parsed = match text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
    {
        Some(hex_digits) => u128::from_str_radix(hex_digits, 16),
        None => text.parse::<u128>(),
    };
    parsed.map_err(|e| CryptoError::MalformedKey(format!("invalid key half '{}': {}", text, e)))
}

fn split_halves(bytes: &[u8; PACKED_KEY_LENGTH]) -> [u128; 2] {
    let mut hi = [0u8; KEY_HALF_LENGTH];
    let mut lo = [0u8; KEY_HALF_LENGTH];
    hi.copy_from_slice(&bytes[..KEY_HALF_LENGTH]);
    lo.copy_from_slice(&bytes[KEY_HALF_LENGTH..]);
    [u128::from_be_bytes(hi), u128::from_be_bytes(lo)]
}

fn join_halves(halves: &[u128; 2]) -> [u8; PACKED_KEY_LENGTH] {
    let mut out = [0u8; PACKED_KEY_LENGTH];
    out[..KEY_HALF_LENGTH].copy_from_slice(&halves[0].to_be_bytes());
    out[KEY_HALF_LENGTH..].copy_from_slice(&halves[1].to_be_bytes());
    out
}

/// Public key as two field elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "[FieldHalf; 2]", into = "[String; 2]")]
pub struct PublicKey([u128; 2]);

impl PublicKey {
    pub fn from_halves(hi: u128, lo: u128) -> Self {
        Self([hi, lo])
    }

    pub fn from_bytes(bytes: &[u8; PACKED_KEY_LENGTH]) -> Self {
        Self(split_halves(bytes))
    }

    pub fn halves(&self) -> [u128; 2] {
        self.0
    }

    /// Packed 32-byte form
    pub fn to_bytes(&self) -> [u8; PACKED_KEY_LENGTH] {
        join_halves(&self.0)
    }

    /// Halves rendered as `0x` hex strings
    pub fn to_hex_halves(&self) -> [String; 2] {
        [format!("0x{:x}", self.0[0]), format!("0x{:x}", self.0[1])]
    }
}

impl TryFrom<[FieldHalf; 2]> for PublicKey {
    type Error = CryptoError;

    fn try_from(value: [FieldHalf; 2]) -> CryptoResult<Self> {
        Ok(Self([value[0].parse()?, value[1].parse()?]))
    }
}

impl From<PublicKey> for [String; 2] {
    fn from(key: PublicKey) -> Self {
        key.to_hex_halves()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.to_bytes()))
    }
}

/// Private key as two field elements. Zeroized on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop, Serialize, Deserialize)]
#[serde(try_from = "[FieldHalf; 2]", into = "[String; 2]")]
pub struct PrivateKey([u128; 2]);

impl PrivateKey {
    pub fn from_halves(hi: u128, lo: u128) -> Self {
        Self([hi, lo])
    }

    pub fn from_bytes(bytes: &[u8; PACKED_KEY_LENGTH]) -> Self {
        Self(split_halves(bytes))
    }

    /// Packed 32-byte form. Callers should zeroize the returned buffer.
    pub fn to_bytes(&self) -> [u8; PACKED_KEY_LENGTH] {
        join_halves(&self.0)
    }

    pub fn to_hex_halves(&self) -> [String; 2] {
        [format!("0x{:x}", self.0[0]), format!("0x{:x}", self.0[1])]
    }
}

impl TryFrom<[FieldHalf; 2]> for PrivateKey {
    type Error = CryptoError;

    fn try_from(value: [FieldHalf; 2]) -> CryptoResult<Self> {
        Ok(Self([value[0].parse()?, value[1].parse()?]))
    }
}

impl From<PrivateKey> for [String; 2] {
    fn from(key: PrivateKey) -> Self {
        key.to_hex_halves()
    }
}

impl fmt::Debug for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PrivateKey([REDACTED])")
    }
}

/// Key pair produced by a signer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyPair {
    #[serde(rename = "pubkey")]
    pub public_key: PublicKey,
    #[serde(rename = "privkey")]
    pub private_key: PrivateKey,
}
