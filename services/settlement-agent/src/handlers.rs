use axum::{
    extract::{rejection::JsonRejection, Query, State},
    response::Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::info;
use zk_settlement_core::ProverBackend;
use zk_settlement_crypto::{KeyPair, PrivateKey, PublicKey, Signature, Signer};
use zk_settlement_domain::{
    decode_requests, BatchPadder, Leg, ProofInput, ProofInputAssembler, RequestWire,
    SettlementError, SignedLeg, SigningOrchestrator,
};
use zk_settlement_prover::{ProofOutput, Prover, ProverResult, VerificationKey};

use crate::error::ApiError;
use crate::state::AppState;

pub const SERVICE_NAME: &str = "settlement-agent";

type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Default, Deserialize)]
pub struct BackendQuery {
    pub backend: Option<String>,
}

impl BackendQuery {
    fn resolve(&self) -> ApiResult<Option<ProverBackend>> {
        self.backend
            .as_deref()
            .map(str::parse::<ProverBackend>)
            .transpose()
            .map_err(|e| ApiError::bad_request("INVALID_BACKEND", e.to_string()))
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignatureRequest {
    pub requests: Vec<RequestWire>,
    pub priv_key: PrivateKey,
    pub sign_response: bool,
}

#[derive(Debug, Serialize)]
pub struct SignatureResponse {
    pub signatures: Vec<Signature>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckSignRequest {
    pub requests: Vec<RequestWire>,
    pub pub_key: PublicKey,
    pub signatures: Vec<Signature>,
    pub sign_response: bool,
}

/// Body shared by `/proof-input` and the combined proving routes
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofInputRequest {
    pub requests: Vec<RequestWire>,
    /// Circuit length
    pub l: usize,
    #[serde(default)]
    pub req_pubkey: Option<PublicKey>,
    #[serde(default)]
    pub req_signatures: Option<Vec<Signature>>,
    #[serde(default)]
    pub res_pubkey: Option<PublicKey>,
    #[serde(default)]
    pub res_signatures: Option<Vec<Signature>>,
}

impl ProofInputRequest {
    /// Pad and assemble, rejecting a target above the circuit length before
    /// any work is done.
    fn prepare(self, max_batch_len: usize) -> Result<ProofInput, SettlementError> {
        let padder = BatchPadder::new(self.l).with_max_len(max_batch_len);
        padder.check_target()?;

        let requests = decode_requests(&self.requests)?;
        let request_leg = SignedLeg::pair(Leg::Request, self.req_pubkey, self.req_signatures)?;
        let response_leg = SignedLeg::pair(Leg::Response, self.res_pubkey, self.res_signatures)?;
        ProofInputAssembler::prepare_with(&padder, requests, request_leg, response_leg)
    }
}

/// Run a prover operation off the async runtime.
async fn run_prover<T, F>(prover: Arc<dyn Prover>, job: F) -> ApiResult<T>
where
    T: Send + 'static,
    F: FnOnce(&dyn Prover) -> ProverResult<T> + Send + 'static,
{
    tokio::task::spawn_blocking(move || job(prover.as_ref()))
        .await
        .map_err(|e| ApiError::internal("PROVER_FAILURE", format!("prover task aborted: {}", e)))?
        .map_err(ApiError::from)
}

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": SERVICE_NAME,
        "proverBackend": state.provers().default_backend(),
        "timestamp": Utc::now().to_rfc3339()
    }))
}

pub async fn sign_keypair(State(state): State<AppState>) -> ApiResult<Json<KeyPair>> {
    let keypair = state
        .signer()
        .generate_keypair()
        .map_err(SettlementError::from)?;
    info!(public_key = %keypair.public_key, "keypair generated");
    Ok(Json(keypair))
}

pub async fn signature(
    State(state): State<AppState>,
    payload: Result<Json<SignatureRequest>, JsonRejection>,
) -> ApiResult<Json<SignatureResponse>> {
    let Json(body) = payload?;
    let requests = decode_requests(&body.requests)?;
    let leg = Leg::from_sign_response(body.sign_response);

    let signatures = SigningOrchestrator::new(state.signer()).sign(&requests, &body.priv_key, leg)?;
    Ok(Json(SignatureResponse { signatures }))
}

pub async fn check_sign(
    State(state): State<AppState>,
    payload: Result<Json<CheckSignRequest>, JsonRejection>,
) -> ApiResult<Json<Vec<bool>>> {
    let Json(body) = payload?;
    let requests = decode_requests(&body.requests)?;
    let leg = Leg::from_sign_response(body.sign_response);

    let valid = SigningOrchestrator::new(state.signer()).verify(
        &requests,
        &body.signatures,
        &body.pub_key,
        leg,
    )?;
    Ok(Json(valid))
}

pub async fn proof_input(
    State(state): State<AppState>,
    payload: Result<Json<ProofInputRequest>, JsonRejection>,
) -> ApiResult<Json<ProofInput>> {
    let Json(body) = payload?;
    Ok(Json(body.prepare(state.max_batch_len())?))
}

pub async fn proof(
    State(state): State<AppState>,
    Query(query): Query<BackendQuery>,
    payload: Result<Json<ProofInput>, JsonRejection>,
) -> ApiResult<Json<ProofOutput>> {
    let Json(input) = payload?;
    prove(&state, &query, input).await
}

pub async fn proof_combined(
    State(state): State<AppState>,
    Query(query): Query<BackendQuery>,
    payload: Result<Json<ProofInputRequest>, JsonRejection>,
) -> ApiResult<Json<ProofOutput>> {
    let Json(body) = payload?;
    let input = body.prepare(state.max_batch_len())?;
    prove(&state, &query, input).await
}

async fn prove(state: &AppState, query: &BackendQuery, input: ProofInput) -> ApiResult<Json<ProofOutput>> {
    let prover = state.provers().select(query.resolve()?)?;
    info!(backend = prover.name(), entries = input.len(), "proof generation started");
    let output = run_prover(prover, move |p| p.generate_proof(&input)).await?;
    info!(signals = output.public_signals.len(), "proof generation completed");
    Ok(Json(output))
}

pub async fn solidity_calldata(
    State(state): State<AppState>,
    Query(query): Query<BackendQuery>,
    payload: Result<Json<ProofInput>, JsonRejection>,
) -> ApiResult<String> {
    let Json(input) = payload?;
    calldata(&state, &query, input).await
}

pub async fn solidity_calldata_combined(
    State(state): State<AppState>,
    Query(query): Query<BackendQuery>,
    payload: Result<Json<ProofInputRequest>, JsonRejection>,
) -> ApiResult<String> {
    let Json(body) = payload?;
    let input = body.prepare(state.max_batch_len())?;
    calldata(&state, &query, input).await
}

async fn calldata(state: &AppState, query: &BackendQuery, input: ProofInput) -> ApiResult<String> {
    let prover = state.provers().select(query.resolve()?)?;
    let calldata = run_prover(prover.clone(), move |p| p.solidity_calldata(&input)).await?;
    info!(backend = prover.name(), "solidity calldata generated");
    Ok(calldata)
}

pub async fn vkey(
    State(state): State<AppState>,
    Query(query): Query<BackendQuery>,
) -> ApiResult<Json<VerificationKey>> {
    let prover = state.provers().select(query.resolve()?)?;
    let vkey = run_prover(prover, |p| p.verification_key()).await?;
    Ok(Json(vkey))
}

pub async fn verifier_contract(
    State(state): State<AppState>,
    Query(query): Query<BackendQuery>,
) -> ApiResult<String> {
    contract(&state, &query, false).await
}

pub async fn batch_verifier_contract(
    State(state): State<AppState>,
    Query(query): Query<BackendQuery>,
) -> ApiResult<String> {
    contract(&state, &query, true).await
}

async fn contract(state: &AppState, query: &BackendQuery, batched: bool) -> ApiResult<String> {
    let prover = state.provers().select(query.resolve()?)?;
    run_prover(prover, move |p| p.verifier_contract(batched)).await
}
