//! Out-of-process prover.
//!
//! Runs an external proving engine once per operation:
//! `<program> [args...] <operation>`, with the JSON request on stdin and the
//! JSON result on stdout. A non-zero exit status is a prover failure carrying
//! the engine's stderr.

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};
use tracing::{debug, error};
use zk_settlement_domain::ProofInput;

use crate::error::{ProverError, ProverResult};
use crate::prover::Prover;
use crate::types::{ProofOutput, VerificationKey};

pub const OP_GENERATE_PROOF: &str = "generate_proof";
pub const OP_GENERATE_CALLDATA: &str = "generate_calldata";
pub const OP_VERIFICATION_KEY: &str = "verification_key";
pub const OP_VERIFIER_CONTRACT: &str = "verifier_contract";

#[derive(Debug, Clone)]
pub struct CommandProver {
    program: PathBuf,
    args: Vec<String>,
}

impl CommandProver {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &PathBuf {
        &self.program
    }

    fn run(&self, operation: &str, request: &Value) -> ProverResult<Vec<u8>> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .arg(operation)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| {
                ProverError::NotConfigured(format!(
                    "cannot start prover command {:?}: {}",
                    self.program, e
                ))
            })?;

        if let Some(mut stdin) = child.stdin.take() {
            let written = serde_json::to_writer(&mut stdin, request)
                .map_err(std::io::Error::from)
                .and_then(|()| stdin.flush());
            drop(stdin);
            if let Err(e) = written {
                // The engine stopped reading; reap it before reporting.
                let _ = child.kill();
                let status = child.wait();
                error!(operation, status = ?status, "external prover closed its input");
                return Err(ProverError::ProverFailure(format!(
                    "{} did not accept its input: {}",
                    operation, e
                )));
            }
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            error!(
                operation,
                status = ?output.status,
                "external prover failed"
            );
            return Err(ProverError::ProverFailure(format!(
                "{} exited with {}: {}",
                operation,
                output.status,
                stderr.trim()
            )));
        }

        debug!(operation, bytes = output.stdout.len(), "external prover completed");
        Ok(output.stdout)
    }

    fn run_json<T: DeserializeOwned>(&self, operation: &str, request: &Value) -> ProverResult<T> {
        let stdout = self.run(operation, request)?;
        serde_json::from_slice(&stdout).map_err(|e| {
            ProverError::ProverFailure(format!(
                "{} returned malformed JSON: {}",
                operation, e
            ))
        })
    }

    /// Text results may come back raw or as a JSON string.
    fn run_text(&self, operation: &str, request: &Value) -> ProverResult<String> {
        let stdout = self.run(operation, request)?;
        match serde_json::from_slice::<Value>(&stdout) {
            Ok(Value::String(text)) => Ok(text),
            _ => String::from_utf8(stdout).map_err(|e| {
                ProverError::ProverFailure(format!("{} returned non-UTF-8 output: {}", operation, e))
            }),
        }
    }
}

impl Prover for CommandProver {
    fn name(&self) -> &'static str {
        "external"
    }

    fn generate_proof(&self, input: &ProofInput) -> ProverResult<ProofOutput> {
        input.validate()?;
        let output: ProofOutput = self.run_json(OP_GENERATE_PROOF, &serde_json::to_value(input)?)?;
        if !output.proof.is_well_formed() {
            return Err(ProverError::ProverFailure(
                "external prover returned a malformed proof".to_string(),
            ));
        }
        Ok(output)
    }

    fn verification_key(&self) -> ProverResult<VerificationKey> {
        self.run_json(OP_VERIFICATION_KEY, &json!({}))
    }

    fn verifier_contract(&self, batched: bool) -> ProverResult<String> {
        self.run_text(OP_VERIFIER_CONTRACT, &json!({ "batched": batched }))
    }

    fn solidity_calldata(&self, input: &ProofInput) -> ProverResult<String> {
        input.validate()?;
        self.run_text(OP_GENERATE_CALLDATA, &serde_json::to_value(input)?)
    }
}
