//! Solidity calldata formatting.
//!
//! Renders a Groth16 proof and its public signals as the argument list of a
//! generated `verifyProof(a, b, c, input)` call, in the same shape snarkjs
//! produces: every value is a 32-byte `0x` hex word, and the coordinates of
//! each G2 pair are swapped.

use ark_bn254::Fq;
use ark_ff::{BigInteger, PrimeField};
use std::str::FromStr;

use crate::error::{ProverError, ProverResult};
use crate::types::Proof;

fn word(decimal: &str) -> ProverResult<String> {
    let value = Fq::from_str(decimal).map_err(|_| {
        ProverError::ProverFailure(format!("'{}' is not a BN254 field element", decimal))
    })?;
    let bytes = value.into_bigint().to_bytes_be();
    let mut padded = [0u8; 32];
    padded[32 - bytes.len()..].copy_from_slice(&bytes);
    Ok(format!("\"0x{}\"", hex::encode(padded)))
}

fn words(values: &[String]) -> ProverResult<String> {
    let rendered = values
        .iter()
        .map(|v| word(v))
        .collect::<ProverResult<Vec<_>>>()?;
    Ok(format!("[{}]", rendered.join(",")))
}

/// `[a0,a1],[[b01,b00],[b11,b10]],[c0,c1],[signals...]`
pub fn format_solidity_calldata(proof: &Proof, public_signals: &[String]) -> ProverResult<String> {
    if !proof.is_well_formed() {
        return Err(ProverError::ProverFailure(
            "proof points have unexpected shape".to_string(),
        ));
    }

    let a = words(&proof.pi_a[..2])?;
    let b = format!(
        "[{},{}]",
        words(&[proof.pi_b[0][1].clone(), proof.pi_b[0][0].clone()])?,
        words(&[proof.pi_b[1][1].clone(), proof.pi_b[1][0].clone()])?
    );
    let c = words(&proof.pi_c[..2])?;
    let inputs = words(public_signals)?;

    Ok(format!("{},{},{},{}", a, b, c, inputs))
}
