//! External prover engine driven over stdin/stdout

use std::fs;
use std::path::PathBuf;
use zk_settlement_domain::{Leg, ProofInput, ProofInputAssembler, SignedLeg, SigningOrchestrator};
use zk_settlement_prover::{CommandProver, Prover, ProverError};

use crate::test_utils::{batch, TestSigner};

const ENGINE: &str = r#"#!/bin/sh
input=$(cat)
for field in serializedInput reqSigner reqR8 reqS; do
  case "$input" in
    *"\"$field\""*) ;;
    *) echo "missing proof input field $field" >&2; exit 4 ;;
  esac
done
case "$1" in
  generate_proof)
    echo '{"proof":{"pi_a":["1","2","1"],"pi_b":[["3","4"],["5","6"],["1","0"]],"pi_c":["7","8","1"],"protocol":"groth16","curve":"bn128"},"publicSignals":["1","2","3","4","5"]}'
    ;;
  generate_calldata)
    printf '%s' '["0x01"],[["0x02","0x03"],["0x04","0x05"]],["0x06"],["0x07"]'
    ;;
  *)
    echo "unsupported operation $1" >&2
    exit 3
    ;;
esac
"#;

fn engine(name: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!(
        "zk-settlement-it-engine-{}-{}.sh",
        name,
        std::process::id()
    ));
    fs::write(&path, ENGINE).unwrap();
    path
}

fn signed_request_leg_input() -> ProofInput {
    let signer = TestSigner::from_seed(6);
    let requests = batch(&[1, 2]);
    let signatures = SigningOrchestrator::new(&signer.signer)
        .sign(&requests, &signer.private_key, Leg::Request)
        .unwrap();
    ProofInputAssembler::prepare(
        requests,
        4,
        Some(SignedLeg::new(signer.public_key, signatures)),
        None,
    )
    .unwrap()
}

#[test]
fn test_external_engine_receives_proof_input() {
    let path = engine("proof");
    let prover = CommandProver::new("sh", vec![path.to_string_lossy().into_owned()]);
    let input = signed_request_leg_input();

    let output = prover.generate_proof(&input).unwrap();
    assert_eq!(output.public_signals.len(), 5);
    assert!(output.proof.is_well_formed());

    let calldata = prover.solidity_calldata(&input).unwrap();
    assert!(calldata.starts_with("[\"0x01\"]"));
    fs::remove_file(&path).unwrap();
}

#[test]
fn test_external_engine_rejects_unsupported_operation() {
    let path = engine("unsupported");
    let prover = CommandProver::new("sh", vec![path.to_string_lossy().into_owned()]);

    // The verification key request carries no proof input.
    match prover.verification_key() {
        Err(ProverError::ProverFailure(msg)) => assert!(msg.contains("missing proof input")),
        other => panic!("Expected ProverFailure, got {:?}", other),
    }
    fs::remove_file(&path).unwrap();
}

#[test]
fn test_invalid_input_never_reaches_engine() {
    let prover = CommandProver::new("/nonexistent/prover-engine", vec![]);
    let mut input = signed_request_leg_input();
    input.req_s.as_mut().unwrap().pop();
    assert!(matches!(
        prover.generate_proof(&input),
        Err(ProverError::InvalidInput(_))
    ));
}
