//! JSON boundary representation of settlement requests.
//!
//! Integers above the JSON safe-integer range travel as decimal strings and
//! are decoded into fixed-width integers on entry. Addresses and the request
//! hash are hex, left-padded to their fixed width.

use serde::{Deserialize, Serialize};

use crate::error::{Result, SettlementError};
use crate::request::{Address, Request, RequestHash, HASH_LENGTH};

/// Unsigned integer as a JSON number or as decimal (or `0x` hex) text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireUint {
    Number(u64),
    Text(String),
}

impl Default for WireUint {
    fn default() -> Self {
        WireUint::Number(0)
    }
}

impl From<u128> for WireUint {
    fn from(value: u128) -> Self {
        WireUint::Text(value.to_string())
    }
}

impl WireUint {
    fn decode(&self, field: &str) -> Result<u128> {
        match self {
            WireUint::Number(n) => Ok(u128::from(*n)),
            WireUint::Text(text) => {
                let text = text.trim();
                let parsed = match text.strip_prefix("0x") {
                    Some(digits) => u128::from_str_radix(digits, 16),
                    None => text.parse::<u128>(),
                };
                parsed.map_err(|e| {
                    SettlementError::field(
                        field,
                        format!("'{}' is not a 128-bit unsigned integer: {}", text, e),
                    )
                })
            }
        }
    }
}

/// Settlement request as received over JSON
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestWire {
    pub nonce: WireUint,
    #[serde(default)]
    pub req_fee: WireUint,
    pub user_address: String,
    pub provider_address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_hash: Option<String>,
    #[serde(default)]
    pub res_fee: WireUint,
}

impl TryFrom<&RequestWire> for Request {
    type Error = SettlementError;

    fn try_from(wire: &RequestWire) -> Result<Self> {
        let nonce = u64::try_from(wire.nonce.decode("nonce")?)
            .map_err(|_| SettlementError::field("nonce", "exceeds 64 bits"))?;
        let user_address: Address = decode_fixed_hex("userAddress", &wire.user_address)?;
        let provider_address: Address =
            decode_fixed_hex("providerAddress", &wire.provider_address)?;
        let req_fee = wire.req_fee.decode("reqFee")?;
        let res_fee = wire.res_fee.decode("resFee")?;
        let request_hash: RequestHash = match &wire.request_hash {
            Some(text) => decode_fixed_hex("requestHash", text)?,
            None => [0u8; HASH_LENGTH],
        };

        Ok(Request::new(
            nonce,
            user_address,
            provider_address,
            req_fee,
            res_fee,
            request_hash,
        ))
    }
}

impl TryFrom<RequestWire> for Request {
    type Error = SettlementError;

    fn try_from(wire: RequestWire) -> Result<Self> {
        Request::try_from(&wire)
    }
}

impl From<&Request> for RequestWire {
    fn from(request: &Request) -> Self {
        Self {
            nonce: WireUint::Text(request.nonce().to_string()),
            req_fee: WireUint::from(request.req_fee()),
            user_address: format!("0x{}", hex::encode(request.user_address())),
            provider_address: format!("0x{}", hex::encode(request.provider_address())),
            request_hash: Some(format!("0x{}", hex::encode(request.request_hash()))),
            res_fee: WireUint::from(request.res_fee()),
        }
    }
}

/// Decode a batch of wire requests, failing on the first invalid entry.
pub fn decode_requests(wires: &[RequestWire]) -> Result<Vec<Request>> {
    wires
        .iter()
        .enumerate()
        .map(|(index, wire)| {
            Request::try_from(wire).map_err(|err| match err {
                SettlementError::InvalidFieldRange { field, reason } => {
                    SettlementError::InvalidFieldRange {
                        field: format!("requests[{}].{}", index, field),
                        reason,
                    }
                }
                other => other,
            })
        })
        .collect()
}

/// Decode hex text into a fixed-width big-endian byte array, left-padding
/// shorter values with zeros.
fn decode_fixed_hex<const N: usize>(field: &str, text: &str) -> Result<[u8; N]> {
    let text = text.trim();
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    let significant = digits.trim_start_matches('0');

    if significant.len() > 2 * N {
        return Err(SettlementError::field(
            field,
            format!("value exceeds {} bytes", N),
        ));
    }

    let padded = format!("{:0>width$}", significant, width = 2 * N);
    let bytes = hex::decode(&padded)
        .map_err(|e| SettlementError::field(field, format!("invalid hex '{}': {}", text, e)))?;

    let mut out = [0u8; N];
    out.copy_from_slice(&bytes);
    Ok(out)
}
