//! HTTP agent for the zk-settlement pipeline.
//!
//! Exposes keypair generation, batch signing and verification, proof input
//! preparation and proof generation over JSON. Proving routes accept a
//! `?backend=` query selecting the prover backend for that call.

pub mod error;
pub mod handlers;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};

pub use error::ApiError;
pub use state::{AppState, ProverRegistry};

pub fn app_router(state: AppState) -> Router {
    let body_limit = state.config().server.body_limit_bytes;
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(handlers::health))
        .route("/sign-keypair", get(handlers::sign_keypair))
        .route("/signature", post(handlers::signature))
        .route("/check-sign", post(handlers::check_sign))
        .route("/proof-input", post(handlers::proof_input))
        .route("/proof", post(handlers::proof))
        .route("/proof-combined", post(handlers::proof_combined))
        .route("/solidity-calldata", post(handlers::solidity_calldata))
        .route(
            "/solidity-calldata-combined",
            post(handlers::solidity_calldata_combined),
        )
        .route("/vkey", get(handlers::vkey))
        .route("/verifier-contract", get(handlers::verifier_contract))
        .route(
            "/batch-verifier-contract",
            get(handlers::batch_verifier_contract),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(cors)
        .with_state(state)
}
