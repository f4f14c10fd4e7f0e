//! Batch padding to the fixed circuit length.
//!
//! A circuit has a fixed number of input slots, so a batch of N real requests
//! is grown to exactly L entries. Appended entries are no-op requests that
//! continue the nonce sequence of the last real request; their signatures are
//! verbatim copies of the last real signature of each leg and are not
//! expected to verify against the no-op encoding.

use tracing::debug;
use zk_settlement_crypto::Signature;

use crate::batch::Batch;
use crate::error::{Result, SettlementError};
use crate::request::{FieldTrace, Request};

/// Batch grown to exactly `target_len` entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddedBatch {
    pub requests: Vec<Request>,
    pub trace: Vec<FieldTrace>,
    pub request_signatures: Option<Vec<Signature>>,
    pub response_signatures: Option<Vec<Signature>>,
    /// Number of real (non-padding) entries at the front
    pub real_len: usize,
}

impl PaddedBatch {
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn padding_len(&self) -> usize {
        self.requests.len() - self.real_len
    }
}

/// Upper bound on the padding target unless a circuit-specific one is set
pub const DEFAULT_MAX_TARGET_LEN: usize = 1 << 16;

#[derive(Debug, Clone, Copy)]
pub struct BatchPadder {
    target_len: usize,
    max_len: usize,
}

impl BatchPadder {
    pub fn new(target_len: usize) -> Self {
        Self {
            target_len,
            max_len: DEFAULT_MAX_TARGET_LEN,
        }
    }

    /// Reject targets above `max_len`, normally the circuit length.
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn target_len(&self) -> usize {
        self.target_len
    }

    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Check the target against the configured bound.
    pub fn check_target(&self) -> Result<()> {
        if self.target_len > self.max_len {
            return Err(SettlementError::TargetTooLarge {
                target: self.target_len,
                max: self.max_len,
            });
        }
        Ok(())
    }

    pub fn pad(&self, batch: Batch) -> Result<PaddedBatch> {
        self.check_target()?;

        let real_len = batch.len();
        if real_len == 0 {
            return Err(SettlementError::InvalidBatch(
                "cannot pad an empty batch".to_string(),
            ));
        }
        if self.target_len < real_len {
            return Err(SettlementError::BatchTooLarge {
                target: self.target_len,
                actual: real_len,
            });
        }

        let (mut requests, mut request_signatures, mut response_signatures) = batch.into_parts();
        let extra = self.target_len - real_len;

        if extra > 0 {
            let last = requests[real_len - 1].clone();
            u64::try_from(extra)
                .ok()
                .and_then(|extra| last.nonce().checked_add(extra))
                .ok_or_else(|| {
                    SettlementError::field(
                        "nonce",
                        format!(
                            "padding from nonce {} by {} entries overflows 64 bits",
                            last.nonce(),
                            extra
                        ),
                    )
                })?;

            requests.reserve(extra);
            for offset in 1..=extra as u64 {
                requests.push(Request::noop(
                    last.nonce() + offset,
                    *last.user_address(),
                    *last.provider_address(),
                ));
            }

            replicate_last(request_signatures.as_mut(), extra);
            replicate_last(response_signatures.as_mut(), extra);
        }

        let trace = requests.iter().map(Request::serialize).collect();

        debug!(
            real_len,
            target_len = self.target_len,
            padded = extra,
            "batch padded"
        );

        Ok(PaddedBatch {
            requests,
            trace,
            request_signatures,
            response_signatures,
            real_len,
        })
    }
}

fn replicate_last(signatures: Option<&mut Vec<Signature>>, extra: usize) {
    if let Some(signatures) = signatures {
        if let Some(last) = signatures.last().copied() {
            signatures.extend(std::iter::repeat(last).take(extra));
        }
    }
}
