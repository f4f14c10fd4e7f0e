//! Proof input assembly.
//!
//! Pure data shaping: no signature is checked here. Callers that want
//! verified input run [`SigningOrchestrator::verify`](crate::SigningOrchestrator::verify)
//! before assembly.

use serde::{Deserialize, Serialize};
use tracing::info;
use zk_settlement_crypto::{PublicKey, Signature};

use crate::batch::{Batch, Leg};
use crate::error::{Result, SettlementError};
use crate::padding::{BatchPadder, PaddedBatch};
use crate::request::{FieldTrace, Request, TRACE_ENTRY_LENGTH};

/// Signer key and signatures for one leg
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedLeg {
    pub signer: PublicKey,
    pub signatures: Vec<Signature>,
}

impl SignedLeg {
    pub fn new(signer: PublicKey, signatures: Vec<Signature>) -> Self {
        Self { signer, signatures }
    }

    /// Pair an optional signer key with optional signatures. A leg is either
    /// fully present or fully absent.
    pub fn pair(
        leg: Leg,
        signer: Option<PublicKey>,
        signatures: Option<Vec<Signature>>,
    ) -> Result<Option<Self>> {
        match (signer, signatures) {
            (Some(signer), Some(signatures)) => Ok(Some(Self::new(signer, signatures))),
            (None, None) => Ok(None),
            _ => Err(SettlementError::InvalidBatch(format!(
                "{} leg needs both a signer key and signatures",
                leg.as_str()
            ))),
        }
    }
}

/// The artifact handed to a prover
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProofInput {
    pub serialized_input: Vec<FieldTrace>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub req_signer: Option<PublicKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub req_r8: Option<Vec<[u8; 32]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub req_s: Option<Vec<[u8; 32]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub res_signer: Option<PublicKey>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub res_r8: Option<Vec<[u8; 32]>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub res_s: Option<Vec<[u8; 32]>>,
}

impl ProofInput {
    /// Circuit length `L`
    pub fn len(&self) -> usize {
        self.serialized_input.len()
    }

    pub fn is_empty(&self) -> bool {
        self.serialized_input.is_empty()
    }

    /// Check the structural invariants of an input that arrived from outside
    /// the assembler.
    pub fn validate(&self) -> Result<()> {
        if self.serialized_input.is_empty() {
            return Err(SettlementError::InvalidBatch(
                "serializedInput is empty".to_string(),
            ));
        }
        for (index, entry) in self.serialized_input.iter().enumerate() {
            if entry.len() != TRACE_ENTRY_LENGTH {
                return Err(SettlementError::field(
                    &format!("serializedInput[{}]", index),
                    format!("expected {} bytes, got {}", TRACE_ENTRY_LENGTH, entry.len()),
                ));
            }
        }

        let expected = self.len();
        let legs = [
            ("req", &self.req_signer, &self.req_r8, &self.req_s),
            ("res", &self.res_signer, &self.res_r8, &self.res_s),
        ];
        let mut present = 0;
        for (prefix, signer, r8, s) in legs {
            match (signer, r8, s) {
                (None, None, None) => {}
                (Some(_), Some(r8), Some(s)) => {
                    check_len(&format!("{}R8", prefix), expected, r8.len())?;
                    check_len(&format!("{}S", prefix), expected, s.len())?;
                    present += 1;
                }
                _ => {
                    return Err(SettlementError::InvalidBatch(format!(
                        "{prefix}Signer, {prefix}R8 and {prefix}S must be given together"
                    )))
                }
            }
        }
        if present == 0 {
            return Err(SettlementError::InvalidBatch(
                "proof input carries no signed leg".to_string(),
            ));
        }
        Ok(())
    }
}

fn check_len(array: &str, expected: usize, actual: usize) -> Result<()> {
    if expected != actual {
        return Err(SettlementError::LengthMismatch {
            array: array.to_string(),
            expected,
            actual,
        });
    }
    Ok(())
}

fn split(signatures: &[Signature]) -> (Vec<[u8; 32]>, Vec<[u8; 32]>) {
    signatures.iter().map(|sig| (sig.r8, sig.s)).unzip()
}

pub struct ProofInputAssembler;

impl ProofInputAssembler {
    /// Build a [`ProofInput`] from a padded trace and one or two signed legs.
    pub fn assemble(
        trace: Vec<FieldTrace>,
        request_leg: Option<SignedLeg>,
        response_leg: Option<SignedLeg>,
    ) -> Result<ProofInput> {
        if request_leg.is_none() && response_leg.is_none() {
            return Err(SettlementError::InvalidBatch(
                "at least one signed leg is required".to_string(),
            ));
        }

        let expected = trace.len();
        let mut input = ProofInput {
            serialized_input: trace,
            req_signer: None,
            req_r8: None,
            req_s: None,
            res_signer: None,
            res_r8: None,
            res_s: None,
        };

        if let Some(leg) = request_leg {
            check_len("reqSignatures", expected, leg.signatures.len())?;
            let (r8, s) = split(&leg.signatures);
            input.req_signer = Some(leg.signer);
            input.req_r8 = Some(r8);
            input.req_s = Some(s);
        }
        if let Some(leg) = response_leg {
            check_len("resSignatures", expected, leg.signatures.len())?;
            let (r8, s) = split(&leg.signatures);
            input.res_signer = Some(leg.signer);
            input.res_r8 = Some(r8);
            input.res_s = Some(s);
        }

        Ok(input)
    }

    /// Assemble from a padded batch, attaching each leg's signer key.
    pub fn from_padded(
        padded: PaddedBatch,
        request_signer: Option<PublicKey>,
        response_signer: Option<PublicKey>,
    ) -> Result<ProofInput> {
        let request_leg =
            SignedLeg::pair(Leg::Request, request_signer, padded.request_signatures)?;
        let response_leg =
            SignedLeg::pair(Leg::Response, response_signer, padded.response_signatures)?;
        Self::assemble(padded.trace, request_leg, response_leg)
    }

    /// Pad `requests` to `target_len` and assemble the proof input.
    pub fn prepare(
        requests: Vec<Request>,
        target_len: usize,
        request_leg: Option<SignedLeg>,
        response_leg: Option<SignedLeg>,
    ) -> Result<ProofInput> {
        Self::prepare_with(
            &BatchPadder::new(target_len),
            requests,
            request_leg,
            response_leg,
        )
    }

    /// [`prepare`](Self::prepare) with an explicitly configured padder.
    pub fn prepare_with(
        padder: &BatchPadder,
        requests: Vec<Request>,
        request_leg: Option<SignedLeg>,
        response_leg: Option<SignedLeg>,
    ) -> Result<ProofInput> {
        padder.check_target()?;
        let (request_signer, request_signatures) = unzip_leg(request_leg);
        let (response_signer, response_signatures) = unzip_leg(response_leg);

        let real_len = requests.len();
        let batch = Batch::with_signatures(requests, request_signatures, response_signatures)?;
        let padded = padder.pad(batch)?;
        let input = Self::from_padded(padded, request_signer, response_signer)?;

        info!(real_len, target_len = padder.target_len(), "proof input prepared");
        Ok(input)
    }
}

fn unzip_leg(leg: Option<SignedLeg>) -> (Option<PublicKey>, Option<Vec<Signature>>) {
    match leg {
        Some(leg) => (Some(leg.signer), Some(leg.signatures)),
        None => (None, None),
    }
}
