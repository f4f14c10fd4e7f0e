//! End-to-end settlement flow
//!
//! 1. Sign both legs of a batch
//! 2. Verify the signatures against the signer key
//! 3. Pad to circuit length and assemble the proof input
//! 4. Prove with the in-process backend and render calldata

use zk_settlement_crypto::{PublicKey, Signer};
use zk_settlement_domain::{
    Batch, BatchPadder, Leg, ProofInput, ProofInputAssembler, SettlementError, SignedLeg,
    SigningOrchestrator,
};
use zk_settlement_prover::{
    format_solidity_calldata, public_signals, InProcessProver, Prover, PUBLIC_SIGNAL_COUNT,
};

use crate::test_utils::{batch, init_tracing, TestSigner};

const CIRCUIT_LEN: usize = 8;

fn signed_input(signer: &TestSigner, nonces: &[u64]) -> ProofInput {
    let requests = batch(nonces);
    let orchestrator = SigningOrchestrator::new(&signer.signer);
    let req = orchestrator
        .sign(&requests, &signer.private_key, Leg::Request)
        .unwrap();
    let res = orchestrator
        .sign(&requests, &signer.private_key, Leg::Response)
        .unwrap();

    ProofInputAssembler::prepare(
        requests,
        CIRCUIT_LEN,
        Some(SignedLeg::new(signer.public_key, req)),
        Some(SignedLeg::new(signer.public_key, res)),
    )
    .unwrap()
}

#[test]
fn test_end_to_end_settlement_flow() {
    init_tracing();
    let signer = TestSigner::from_seed(7);
    let requests = batch(&[1, 2, 3]);
    let orchestrator = SigningOrchestrator::new(&signer.signer);

    tracing::info!("Step 1: signing both legs");
    let request_leg = orchestrator
        .sign_and_verify(&requests, &signer.private_key, &signer.public_key, Leg::Request)
        .unwrap();
    let response_leg = orchestrator
        .sign_and_verify(&requests, &signer.private_key, &signer.public_key, Leg::Response)
        .unwrap();
    assert!(request_leg.all_valid());
    assert!(response_leg.all_valid());
    assert_ne!(request_leg.signatures, response_leg.signatures);

    tracing::info!("Step 2: independent verification");
    let valid = orchestrator
        .verify(&requests, &response_leg.signatures, &signer.public_key, Leg::Response)
        .unwrap();
    assert_eq!(valid, vec![true; 3]);

    tracing::info!("Step 3: padding and assembly");
    let input = ProofInputAssembler::prepare(
        requests.clone(),
        CIRCUIT_LEN,
        Some(SignedLeg::new(signer.public_key, request_leg.signatures.clone())),
        Some(SignedLeg::new(signer.public_key, response_leg.signatures.clone())),
    )
    .unwrap();
    assert_eq!(input.len(), CIRCUIT_LEN);
    assert_eq!(input.req_r8.as_ref().unwrap()[..3], request_leg.r8()[..]);
    assert_eq!(input.res_s.as_ref().unwrap()[..3], response_leg.s()[..]);
    input.validate().unwrap();

    tracing::info!("Step 4: proving");
    let prover = InProcessProver::mock();
    let output = prover.generate_proof(&input).unwrap();
    assert_eq!(output.public_signals.len(), PUBLIC_SIGNAL_COUNT);
    assert_eq!(output.public_signals, public_signals(&input).unwrap());
    assert!(prover.verify_proof(&input, &output).unwrap());

    let calldata = prover.solidity_calldata(&input).unwrap();
    assert_eq!(
        calldata,
        format_solidity_calldata(&output.proof, &output.public_signals).unwrap()
    );
}

#[test]
fn test_proof_input_survives_json_boundary() {
    let signer = TestSigner::from_seed(3);
    let input = signed_input(&signer, &[10, 11]);

    let json = serde_json::to_string(&input).unwrap();
    let decoded: ProofInput = serde_json::from_str(&json).unwrap();
    assert_eq!(decoded, input);

    let prover = InProcessProver::mock();
    assert_eq!(
        prover.generate_proof(&decoded).unwrap(),
        prover.generate_proof(&input).unwrap()
    );
}

#[test]
fn test_proof_binds_to_batch_content() {
    let signer = TestSigner::from_seed(9);
    let prover = InProcessProver::mock();
    let first = prover.generate_proof(&signed_input(&signer, &[1, 2])).unwrap();
    let second = prover.generate_proof(&signed_input(&signer, &[1, 3])).unwrap();
    assert_ne!(first.public_signals[0], second.public_signals[0]);
    assert_ne!(first.proof, second.proof);

    let tampered_input = signed_input(&signer, &[1, 3]);
    assert!(!prover.verify_proof(&tampered_input, &first).unwrap());
}

#[test]
fn test_padding_reuses_last_signature() {
    let signer = TestSigner::from_seed(1);
    let requests = batch(&[5, 6, 7]);
    let signatures = SigningOrchestrator::new(&signer.signer)
        .sign(&requests, &signer.private_key, Leg::Request)
        .unwrap();

    let padded = BatchPadder::new(5)
        .pad(Batch::with_signatures(requests, Some(signatures), None).unwrap())
        .unwrap();

    let nonces: Vec<u64> = padded.requests.iter().map(|r| r.nonce()).collect();
    assert_eq!(nonces, vec![5, 6, 7, 8, 9]);
    assert!(padded.requests[3..].iter().all(|r| r.is_noop()));

    let sigs = padded.request_signatures.unwrap();
    assert_eq!(sigs[3], sigs[2]);
    assert_eq!(sigs[4], sigs[2]);
    assert!(padded.response_signatures.is_none());
}

#[test]
fn test_wrong_key_rejects_every_entry() {
    let signer = TestSigner::from_seed(1);
    let stranger = TestSigner::from_seed(2);
    let requests = batch(&[1, 2]);
    let orchestrator = SigningOrchestrator::new(&signer.signer);
    let signatures = orchestrator
        .sign(&requests, &signer.private_key, Leg::Request)
        .unwrap();

    let right = orchestrator
        .verify(&requests, &signatures, &signer.public_key, Leg::Request)
        .unwrap();
    let wrong = orchestrator
        .verify(&requests, &signatures, &stranger.public_key, Leg::Request)
        .unwrap();
    assert_eq!(right, vec![true, true]);
    assert_eq!(wrong, vec![false, false]);
}

#[test]
fn test_short_signature_array_is_length_mismatch() {
    let signer = TestSigner::from_seed(4);
    let requests = batch(&[1, 2, 3, 4, 5]);
    let trace = requests.iter().map(|r| r.serialize()).collect();
    let signatures = SigningOrchestrator::new(&signer.signer)
        .sign(&requests[..4], &signer.private_key, Leg::Response)
        .unwrap();

    let result = ProofInputAssembler::assemble(
        trace,
        None,
        Some(SignedLeg::new(signer.public_key, signatures)),
    );
    match result {
        Err(SettlementError::LengthMismatch {
            expected, actual, ..
        }) => {
            assert_eq!(expected, 5);
            assert_eq!(actual, 4);
        }
        other => panic!("Expected LengthMismatch, got {:?}", other),
    }
}

#[test]
fn test_signer_key_survives_packing() {
    let signer = TestSigner::from_seed(5);
    let packed = signer.public_key.to_bytes();
    let point = signer.signer.unpack_point(&packed).unwrap();
    assert_eq!(signer.signer.pack_point(&point), packed);
    assert_eq!(PublicKey::from_bytes(&packed), signer.public_key);
}
