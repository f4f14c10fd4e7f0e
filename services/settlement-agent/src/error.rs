use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::{error, warn};
use zk_settlement_domain::SettlementError;
use zk_settlement_prover::ProverError;

pub const CODE_INVALID_JSON: &str = "INVALID_JSON";
pub const CODE_PAYLOAD_TOO_LARGE: &str = "PAYLOAD_TOO_LARGE";

/// Error returned from a handler, rendered as `{ error, errorCode }`
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    pub fn unavailable(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::SERVICE_UNAVAILABLE, code, message)
    }

    pub fn internal(code: &'static str, message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, code, message)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn code(&self) -> &'static str {
        self.code
    }
}

impl From<SettlementError> for ApiError {
    fn from(err: SettlementError) -> Self {
        if err.is_client_error() {
            Self::bad_request(err.code(), err.to_string())
        } else {
            Self::internal(err.code(), err.to_string())
        }
    }
}

impl From<ProverError> for ApiError {
    fn from(err: ProverError) -> Self {
        match err {
            ProverError::InvalidInput(inner) => inner.into(),
            ProverError::ArtifactMissing(_) | ProverError::NotConfigured(_) => {
                Self::unavailable(err.code(), err.to_string())
            }
            other => Self::internal(other.code(), other.to_string()),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return Self::new(
                StatusCode::PAYLOAD_TOO_LARGE,
                CODE_PAYLOAD_TOO_LARGE,
                rejection.body_text(),
            );
        }
        Self::bad_request(CODE_INVALID_JSON, rejection.body_text())
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorResponse {
    error: String,
    error_code: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(code = self.code, "{}", self.message);
        } else {
            warn!(code = self.code, "{}", self.message);
        }
        let body = ErrorResponse {
            error: self.message,
            error_code: self.code,
        };
        (self.status, Json(body)).into_response()
    }
}
