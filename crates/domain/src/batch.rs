//! Batches of requests with their per-leg signature arrays.

use serde::{Deserialize, Serialize};
use zk_settlement_crypto::Signature;

use crate::error::{Result, SettlementError};
use crate::request::{FieldTrace, Request};

/// Which side of a settlement a signature covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Leg {
    Request,
    Response,
}

impl Leg {
    /// Map the wire `signResponse` flag
    pub fn from_sign_response(sign_response: bool) -> Self {
        if sign_response {
            Leg::Response
        } else {
            Leg::Request
        }
    }

    /// Message signed for this leg
    pub fn message(self, request: &Request) -> FieldTrace {
        match self {
            Leg::Request => request.serialize_request(),
            Leg::Response => request.serialize_response(),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Leg::Request => "request",
            Leg::Response => "response",
        }
    }
}

/// Requests plus an optional signature array per leg.
///
/// Every present signature array has exactly one entry per request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Batch {
    requests: Vec<Request>,
    request_signatures: Option<Vec<Signature>>,
    response_signatures: Option<Vec<Signature>>,
}

impl Batch {
    pub fn new(requests: Vec<Request>) -> Self {
        Self {
            requests,
            request_signatures: None,
            response_signatures: None,
        }
    }

    /// Attach signature arrays, checking them against the request count.
    pub fn with_signatures(
        requests: Vec<Request>,
        request_signatures: Option<Vec<Signature>>,
        response_signatures: Option<Vec<Signature>>,
    ) -> Result<Self> {
        let expected = requests.len();
        for (leg, signatures) in [
            (Leg::Request, &request_signatures),
            (Leg::Response, &response_signatures),
        ] {
            if let Some(signatures) = signatures {
                if signatures.len() != expected {
                    return Err(SettlementError::InvalidBatch(format!(
                        "{} batch has {} requests but {} {} signatures",
                        leg.as_str(),
                        expected,
                        signatures.len(),
                        leg.as_str()
                    )));
                }
            }
        }

        Ok(Self {
            requests,
            request_signatures,
            response_signatures,
        })
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn signatures(&self, leg: Leg) -> Option<&[Signature]> {
        match leg {
            Leg::Request => self.request_signatures.as_deref(),
            Leg::Response => self.response_signatures.as_deref(),
        }
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        Vec<Request>,
        Option<Vec<Signature>>,
        Option<Vec<Signature>>,
    ) {
        (
            self.requests,
            self.request_signatures,
            self.response_signatures,
        )
    }
}
