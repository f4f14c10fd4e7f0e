//! Poseidon hash functions for batch commitments.
//!
//! circomlib-compatible Poseidon over the BN254 scalar field, so that a
//! commitment computed here matches one computed inside the circuit.

use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};
use light_poseidon::{Poseidon, PoseidonHasher};
use zk_settlement_crypto::PublicKey;
use zk_settlement_domain::{FieldTrace, ProofInput};

use crate::error::{ProverError, ProverResult};

/// Bytes packed into one field element. 31 bytes always fit below the modulus.
pub const CHUNK_LENGTH: usize = 31;

fn poseidon_hash(inputs: &[Fr]) -> ProverResult<Fr> {
    let mut hasher = Poseidon::<Fr>::new_circom(inputs.len())
        .map_err(|err| ProverError::HashError(err.to_string()))?;
    hasher
        .hash(inputs)
        .map_err(|err| ProverError::HashError(err.to_string()))
}

fn to_bytes(value: Fr) -> ProverResult<[u8; 32]> {
    let bytes = value.into_bigint().to_bytes_be();
    if bytes.len() > 32 {
        return Err(ProverError::HashError(
            "Poseidon output exceeds 32 bytes".to_string(),
        ));
    }
    let mut output = [0u8; 32];
    output[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(output)
}

/// Hash two 32-byte big-endian values
pub fn poseidon_hash_2(a: &[u8; 32], b: &[u8; 32]) -> ProverResult<[u8; 32]> {
    let inputs = [
        Fr::from_be_bytes_mod_order(a),
        Fr::from_be_bytes_mod_order(b),
    ];
    to_bytes(poseidon_hash(&inputs)?)
}

/// Hash one trace entry, split into 31-byte big-endian chunks.
pub fn entry_hash(entry: &FieldTrace) -> ProverResult<Fr> {
    let chunks: Vec<Fr> = entry
        .chunks(CHUNK_LENGTH)
        .map(Fr::from_be_bytes_mod_order)
        .collect();
    if chunks.is_empty() {
        return Err(ProverError::HashError("empty trace entry".to_string()));
    }
    poseidon_hash(&chunks)
}

/// Sequential commitment over the whole trace:
/// `acc_0 = 0`, `acc_{i+1} = H(acc_i, H(entry_i))`.
pub fn trace_commitment(trace: &[FieldTrace]) -> ProverResult<Fr> {
    trace.iter().try_fold(Fr::from(0u64), |acc, entry| {
        poseidon_hash(&[acc, entry_hash(entry)?])
    })
}

/// Public signals of a settlement proof, in circuit order:
/// trace commitment, request signer halves, response signer halves.
/// An absent leg contributes two zeros.
pub fn public_signals(input: &ProofInput) -> ProverResult<Vec<String>> {
    let commitment = trace_commitment(&input.serialized_input)?;
    let mut signals = vec![field_to_decimal(commitment)];
    for signer in [&input.req_signer, &input.res_signer] {
        let halves = signer.as_ref().map(PublicKey::halves).unwrap_or([0, 0]);
        signals.extend(halves.iter().map(u128::to_string));
    }
    Ok(signals)
}

/// Decimal rendering used by snarkjs JSON
pub fn field_to_decimal<F: PrimeField>(value: F) -> String {
    value.into_bigint().to_string()
}
