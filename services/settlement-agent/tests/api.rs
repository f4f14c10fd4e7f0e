use axum::{
    body::{self, Body},
    http::{Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use settlement_agent::{app_router, AppState};
use tower::util::ServiceExt;
use zk_settlement_core::AgentConfig;

const BODY_LIMIT: usize = usize::MAX;

fn test_app() -> Router {
    let state = AppState::from_config(AgentConfig::default()).expect("default state");
    app_router(state)
}

fn requests(nonces: &[u64]) -> Value {
    Value::Array(
        nonces
            .iter()
            .map(|nonce| {
                json!({
                    "nonce": nonce,
                    "reqFee": "340282366920938463463374607431768211455",
                    "userAddress": "0x1111111111111111111111111111111111111111",
                    "providerAddress": "0x2222222222222222222222222222222222222222",
                    "requestHash": "0xabcdef",
                    "resFee": 7
                })
            })
            .collect(),
    )
}

/// Unverified request leg: the assembler only shapes signatures.
fn proof_input_body(nonces: &[u64], l: usize) -> Value {
    let signature = format!("0x{}", "11".repeat(64));
    json!({
        "requests": requests(nonces),
        "l": l,
        "reqPubkey": ["0x1", "0x2"],
        "reqSignatures": vec![signature; nonces.len()]
    })
}

async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Vec<u8>) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let bytes = body::to_bytes(response.into_body(), BODY_LIMIT)
        .await
        .unwrap();
    (status, bytes.to_vec())
}

async fn send_json(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let (status, bytes) = send(app, method, uri, body).await;
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn keypair(app: Router) -> Value {
    let (status, value) = send_json(app, "GET", "/sign-keypair", None).await;
    assert_eq!(status, StatusCode::OK);
    value
}

#[tokio::test]
async fn health_reports_default_backend() {
    let (status, value) = send_json(test_app(), "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["status"], "healthy");
    assert_eq!(value["service"], "settlement-agent");
    assert_eq!(value["proverBackend"], "inprocess");
}

#[tokio::test]
async fn keypair_halves_are_hex() {
    let value = keypair(test_app()).await;
    for key in ["pubkey", "privkey"] {
        let halves = value[key].as_array().unwrap();
        assert_eq!(halves.len(), 2);
        assert!(halves.iter().all(|h| h.as_str().unwrap().starts_with("0x")));
    }
}

#[tokio::test]
async fn signatures_verify_only_under_signing_key() {
    let app = test_app();
    let signer = keypair(app.clone()).await;
    let other = keypair(app.clone()).await;

    let (status, signed) = send_json(
        app.clone(),
        "POST",
        "/signature",
        Some(json!({
            "requests": requests(&[1, 2]),
            "privKey": signer["privkey"],
            "signResponse": false
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let signatures = signed["signatures"].as_array().unwrap();
    assert_eq!(signatures.len(), 2);
    assert_eq!(signatures[0].as_str().unwrap().len(), 2 + 128);

    let check = |pub_key: Value, sign_response: bool| {
        json!({
            "requests": requests(&[1, 2]),
            "pubKey": pub_key,
            "signatures": signed["signatures"],
            "signResponse": sign_response
        })
    };

    let (status, valid) =
        send_json(app.clone(), "POST", "/check-sign", Some(check(signer["pubkey"].clone(), false))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(valid, json!([true, true]));

    let (_, wrong_key) =
        send_json(app.clone(), "POST", "/check-sign", Some(check(other["pubkey"].clone(), false))).await;
    assert_eq!(wrong_key, json!([false, false]));

    let (_, wrong_leg) =
        send_json(app, "POST", "/check-sign", Some(check(signer["pubkey"].clone(), true))).await;
    assert_eq!(wrong_leg, json!([false, false]));
}

#[tokio::test]
async fn proof_input_pads_to_circuit_length() {
    let (status, value) = send_json(
        test_app(),
        "POST",
        "/proof-input",
        Some(proof_input_body(&[5, 6, 7], 5)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let trace = value["serializedInput"].as_array().unwrap();
    assert_eq!(trace.len(), 5);
    assert!(trace.iter().all(|entry| entry.as_array().unwrap().len() == 112));
    assert_eq!(value["reqR8"].as_array().unwrap().len(), 5);
    assert_eq!(value["reqSigner"], json!(["0x1", "0x2"]));
    assert!(value.get("resR8").is_none());
}

#[tokio::test]
async fn oversized_batch_is_client_error() {
    let (status, value) = send_json(
        test_app(),
        "POST",
        "/proof-input",
        Some(json!({ "requests": requests(&[1, 2, 3]), "l": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["errorCode"], "BATCH_TOO_LARGE");
}

#[tokio::test]
async fn out_of_range_fee_names_the_entry() {
    let mut batch = requests(&[1, 2]);
    batch[1]["resFee"] = json!("340282366920938463463374607431768211456");
    let (status, value) = send_json(
        test_app(),
        "POST",
        "/proof-input",
        Some(json!({ "requests": batch, "l": 4 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["errorCode"], "INVALID_FIELD_RANGE");
    assert!(value["error"].as_str().unwrap().contains("requests[1].resFee"));
}

#[tokio::test]
async fn combined_proof_and_calldata_with_signed_legs() {
    let app = test_app();
    let signer = keypair(app.clone()).await;
    let mut legs = Vec::new();
    for sign_response in [false, true] {
        let (_, signed) = send_json(
            app.clone(),
            "POST",
            "/signature",
            Some(json!({
                "requests": requests(&[5, 6, 7]),
                "privKey": signer["privkey"],
                "signResponse": sign_response
            })),
        )
        .await;
        legs.push(signed["signatures"].clone());
    }
    let body = json!({
        "requests": requests(&[5, 6, 7]),
        "l": 4,
        "reqPubkey": signer["pubkey"],
        "reqSignatures": legs[0],
        "resPubkey": signer["pubkey"],
        "resSignatures": legs[1]
    });

    let (status, output) =
        send_json(app.clone(), "POST", "/proof-combined", Some(body.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(output["proof"]["protocol"], "groth16");
    assert_eq!(output["publicSignals"].as_array().unwrap().len(), 5);

    let (status, calldata) = send(app, "POST", "/solidity-calldata-combined", Some(body)).await;
    assert_eq!(status, StatusCode::OK);
    let calldata = String::from_utf8(calldata).unwrap();
    assert!(calldata.starts_with("[\"0x"));
}

#[tokio::test]
async fn proof_accepts_prepared_input() {
    let app = test_app();
    let (_, input) = send_json(
        app.clone(),
        "POST",
        "/proof-input",
        Some(proof_input_body(&[1], 2)),
    )
    .await;

    let (status, first) = send_json(app.clone(), "POST", "/proof", Some(input.clone())).await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = send_json(app, "POST", "/proof?backend=inprocess", Some(input)).await;
    assert_eq!(first, second);
}

#[tokio::test]
async fn unsigned_batch_cannot_be_proven() {
    let (status, value) = send_json(
        test_app(),
        "POST",
        "/proof-combined",
        Some(json!({ "requests": requests(&[1]), "l": 2 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["errorCode"], "INVALID_BATCH");
}

#[tokio::test]
async fn external_backend_without_command_is_unavailable() {
    let (status, value) = send_json(
        test_app(),
        "POST",
        "/proof-combined?backend=rust",
        Some(proof_input_body(&[1], 2)),
    )
    .await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(value["errorCode"], "BACKEND_NOT_CONFIGURED");
}

#[tokio::test]
async fn unknown_backend_is_rejected() {
    let (status, value) = send_json(test_app(), "GET", "/vkey?backend=gpu", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["errorCode"], "INVALID_BACKEND");
}

#[tokio::test]
async fn mock_vkey_and_missing_contracts() {
    let app = test_app();
    let (status, vkey) = send_json(app.clone(), "GET", "/vkey", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(vkey["protocol"], "groth16");
    assert_eq!(vkey["nPublic"], 5);

    for uri in ["/verifier-contract", "/batch-verifier-contract"] {
        let (status, value) = send_json(app.clone(), "GET", uri, None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(value["errorCode"], "ARTIFACT_MISSING");
    }
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let request = Request::builder()
        .method("POST")
        .uri("/signature")
        .header("content-type", "application/json")
        .body(Body::from("{\"requests\": ["))
        .unwrap();
    let response = test_app().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = body::to_bytes(response.into_body(), BODY_LIMIT).await.unwrap();
    let value: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(value["errorCode"], "INVALID_JSON");
}

#[tokio::test]
async fn body_limit_is_enforced() {
    let mut config = AgentConfig::default();
    config.server.body_limit_bytes = 256;
    let app = app_router(AppState::from_config(config).unwrap());

    let (status, value) = send_json(
        app,
        "POST",
        "/proof-input",
        Some(json!({ "requests": requests(&[1, 2, 3, 4]), "l": 8 })),
    )
    .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(value["errorCode"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn absurd_circuit_length_is_rejected() {
    let app = test_app();
    for uri in ["/proof-input", "/proof-combined", "/solidity-calldata-combined"] {
        let (status, value) = send_json(
            app.clone(),
            "POST",
            uri,
            Some(proof_input_body(&[1], 1_099_511_627_776)),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(value["errorCode"], "TARGET_TOO_LARGE");
    }
}

#[tokio::test]
async fn configured_circuit_length_bounds_padding() {
    let mut config = AgentConfig::default();
    config.prover.max_batch_len = 4;
    let app = app_router(AppState::from_config(config).unwrap());

    let (status, value) =
        send_json(app.clone(), "POST", "/proof-input", Some(proof_input_body(&[1, 2], 5))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(value["errorCode"], "TARGET_TOO_LARGE");

    let (status, value) =
        send_json(app, "POST", "/proof-input", Some(proof_input_body(&[1, 2], 4))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(value["serializedInput"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn loaded_artifacts_without_proving_key_refuse_to_prove() {
    use zk_settlement_prover::{InProcessProver, Prover};

    let dir = std::env::temp_dir().join(format!(
        "settlement-agent-vkey-only-{}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&dir);
    std::fs::create_dir_all(&dir).unwrap();
    let vkey = InProcessProver::mock().verification_key().unwrap();
    std::fs::write(
        dir.join("verification_key.json"),
        serde_json::to_vec(&vkey).unwrap(),
    )
    .unwrap();

    let mut config = AgentConfig::default();
    config.prover.artifacts_dir = Some(dir.clone());
    let app = app_router(AppState::from_config(config).unwrap());

    let (status, _) = send_json(app.clone(), "GET", "/vkey", None).await;
    assert_eq!(status, StatusCode::OK);

    for uri in ["/proof-combined", "/solidity-calldata-combined"] {
        let (status, value) =
            send_json(app.clone(), "POST", uri, Some(proof_input_body(&[1], 2))).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(value["errorCode"], "ARTIFACT_MISSING");
    }

    std::fs::remove_dir_all(&dir).unwrap();
}
