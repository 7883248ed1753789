//! IBM Quantum provider integration.
//!
//! Speaks the IBM Quantum jobs API: circuits are transformed into a qobj
//! payload and submitted with hub/group/project routing from the provider
//! configuration.

use super::http::HttpClient;
use super::types::{BoxFuture, ProviderError, QuantumProvider, ResultError, SubmissionError};
use serde_json::{json, Map, Value};
use uuid::Uuid;

const DEFAULT_BASE_URL: &str = "https://api.quantum-computing.ibm.com";
const DEFAULT_BACKEND: &str = "ibmq_qasm_simulator";
const DEFAULT_SHOTS: u64 = 1024;

/// Configuration for the IBM Quantum provider.
#[derive(Clone, Debug)]
pub struct IbmConfig {
    /// API token, forwarded verbatim as a bearer credential.
    pub api_token: String,
    /// IBM Quantum hub.
    pub hub: String,
    /// IBM Quantum group.
    pub group: String,
    /// IBM Quantum project.
    pub project: String,
}

impl IbmConfig {
    /// Creates a configuration with the open-access hub/group/project.
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            hub: "ibm-q".to_string(),
            group: "open".to_string(),
            project: "main".to_string(),
        }
    }
}

/// IBM Quantum provider.
pub struct IbmProvider<C: HttpClient> {
    http: C,
    config: IbmConfig,
    base_url: String,
}

impl<C: HttpClient> IbmProvider<C> {
    /// Creates a new provider against the production IBM Quantum API.
    pub fn new(http: C, config: IbmConfig) -> Self {
        Self::with_base_url(http, config, DEFAULT_BASE_URL.to_string())
    }

    /// Creates a new provider with a custom base URL (useful for testing).
    pub fn with_base_url(http: C, config: IbmConfig, base_url: String) -> Self {
        Self {
            http,
            config,
            base_url,
        }
    }

    fn job_url(&self, external_id: &str) -> String {
        format!("{}/v1/jobs/{}", self.base_url, external_id)
    }

    /// Transforms the generic circuit description into a qobj payload.
    fn transform_circuit(circuit: &Value) -> Value {
        let gates = circuit.get("gates").cloned().unwrap_or_else(|| json!([]));
        let num_qubits = circuit.get("num_qubits").and_then(Value::as_u64).unwrap_or(2);
        let qobj_id = Uuid::new_v4().simple().to_string();

        json!({
            "qobj_id": format!("qobj_{}", &qobj_id[..8]),
            "type": "QASM",
            "schema_version": "1.3.0",
            "experiments": [{
                "instructions": gates,
                "header": { "n_qubits": num_qubits }
            }]
        })
    }
}

fn parse_json(body: &[u8]) -> Result<Value, ProviderError> {
    serde_json::from_slice(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("invalid JSON from IBM: {}", e)))
}

impl<C: HttpClient> QuantumProvider for IbmProvider<C> {
    fn name(&self) -> &str {
        "ibm"
    }

    fn submit<'a>(
        &'a self,
        circuit: &'a Value,
        config: &'a Map<String, Value>,
    ) -> BoxFuture<'a, Result<String, SubmissionError>> {
        Box::pin(async move {
            let backend = config
                .get("backend")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_BACKEND);
            let shots = config
                .get("shots")
                .and_then(Value::as_u64)
                .unwrap_or(DEFAULT_SHOTS);

            let payload = json!({
                "backend": backend,
                "shots": shots,
                "qobj": Self::transform_circuit(circuit),
                "hub": self.config.hub,
                "group": self.config.group,
                "project": self.config.project,
            });

            let url = format!("{}/v1/jobs", self.base_url);
            let body = self
                .http
                .post_json_with_bearer(&url, &payload.to_string(), &self.config.api_token)
                .await
                .map_err(|e| SubmissionError::new(self.name(), e))?;

            let response = parse_json(&body).map_err(|e| SubmissionError::new(self.name(), e))?;
            response
                .get("id")
                .and_then(Value::as_str)
                .map(str::to_string)
                .ok_or_else(|| {
                    SubmissionError::new(
                        self.name(),
                        ProviderError::InvalidResponse(
                            "submission response missing 'id'".to_string(),
                        ),
                    )
                })
        })
    }

    fn status<'a>(&'a self, external_id: &'a str) -> BoxFuture<'a, Result<Value, ProviderError>> {
        Box::pin(async move {
            let body = self
                .http
                .get_with_bearer(&self.job_url(external_id), &self.config.api_token)
                .await?;
            parse_json(&body)
        })
    }

    fn result<'a>(&'a self, external_id: &'a str) -> BoxFuture<'a, Result<Value, ResultError>> {
        Box::pin(async move {
            let url = format!("{}/result", self.job_url(external_id));
            match self.http.get_with_bearer(&url, &self.config.api_token).await {
                Ok(body) => Ok(parse_json(&body)?),
                // The result endpoint answers 404 until the job is done.
                Err(ProviderError::HttpStatus { code: 404, .. }) => {
                    Err(ResultError::NotAvailable {
                        provider: self.name().to_string(),
                        external_id: external_id.to_string(),
                    })
                }
                Err(e) => Err(e.into()),
            }
        })
    }

    fn cancel<'a>(&'a self, external_id: &'a str) -> BoxFuture<'a, Result<bool, ProviderError>> {
        Box::pin(async move {
            let url = format!("{}/cancel", self.job_url(external_id));
            match self
                .http
                .post_json_with_bearer(&url, "{}", &self.config.api_token)
                .await
            {
                Ok(_) => Ok(true),
                // A refusal is "no guarantee", not a transport failure.
                Err(ProviderError::HttpStatus { .. }) => Ok(false),
                Err(e) => Err(e),
            }
        })
    }
}
