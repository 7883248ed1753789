//! Google Quantum AI provider integration.
//!
//! Programs are client-named: the external id is the fully-qualified
//! program name (`projects/{project}/programs/{hex}`), minted at submission
//! and used verbatim in status/result/cancel URLs.

use super::http::HttpClient;
use super::types::{BoxFuture, ProviderError, QuantumProvider, ResultError, SubmissionError};
use serde_json::{json, Map, Value};
use uuid::Uuid;

const DEFAULT_BASE_URL: &str = "https://quantum.googleapis.com";
const DEFAULT_PROCESSOR: &str = "simulator";
const DEFAULT_REPETITIONS: u64 = 1000;

/// Configuration for the Google Quantum AI provider.
#[derive(Clone, Debug)]
pub struct GoogleConfig {
    /// Google Cloud project id the programs are created under.
    pub project_id: String,
    /// Service-account credential, forwarded verbatim as a bearer token.
    pub service_account_key: String,
}

impl GoogleConfig {
    pub fn new(project_id: impl Into<String>, service_account_key: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            service_account_key: service_account_key.into(),
        }
    }
}

/// Google Quantum AI provider.
pub struct GoogleProvider<C: HttpClient> {
    http: C,
    config: GoogleConfig,
    base_url: String,
}

impl<C: HttpClient> GoogleProvider<C> {
    /// Creates a new provider against the production Quantum AI API.
    pub fn new(http: C, config: GoogleConfig) -> Self {
        Self::with_base_url(http, config, DEFAULT_BASE_URL.to_string())
    }

    /// Creates a new provider with a custom base URL (useful for testing).
    pub fn with_base_url(http: C, config: GoogleConfig, base_url: String) -> Self {
        Self {
            http,
            config,
            base_url,
        }
    }

    /// Transforms the generic circuit description into a cirq program.
    fn transform_circuit(circuit: &Value) -> Value {
        let moments = circuit.get("gates").cloned().unwrap_or_else(|| json!([]));
        json!({
            "program": {
                "language": { "gate_set": "sqrt_iswap" },
                "circuit": {
                    "scheduling_strategy": "MOMENT_BY_MOMENT",
                    "moments": moments
                }
            }
        })
    }
}

fn parse_json(body: &[u8]) -> Result<Value, ProviderError> {
    serde_json::from_slice(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("invalid JSON from Google: {}", e)))
}

impl<C: HttpClient> QuantumProvider for GoogleProvider<C> {
    fn name(&self) -> &str {
        "google"
    }

    fn submit<'a>(
        &'a self,
        circuit: &'a Value,
        config: &'a Map<String, Value>,
    ) -> BoxFuture<'a, Result<String, SubmissionError>> {
        Box::pin(async move {
            let processor = config
                .get("processor")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_PROCESSOR);
            let repetitions = config
                .get("repetitions")
                .and_then(Value::as_u64)
                .unwrap_or(DEFAULT_REPETITIONS);

            let program_name = format!(
                "projects/{}/programs/{}",
                self.config.project_id,
                Uuid::new_v4().simple()
            );
            let payload = json!({
                "name": program_name,
                "code": {
                    "language": { "gate_set": "sqrt_iswap" },
                    "circuit": Self::transform_circuit(circuit)
                },
                "processor": processor,
                "run_context": { "repetitions": repetitions }
            });

            let url = format!("{}/v1/projects/{}/programs", self.base_url, self.config.project_id);
            self.http
                .post_json_with_bearer(&url, &payload.to_string(), &self.config.service_account_key)
                .await
                .map_err(|e| SubmissionError::new(self.name(), e))?;

            Ok(program_name)
        })
    }

    fn status<'a>(&'a self, external_id: &'a str) -> BoxFuture<'a, Result<Value, ProviderError>> {
        Box::pin(async move {
            let url = format!("{}/v1/{}", self.base_url, external_id);
            let body = self
                .http
                .get_with_bearer(&url, &self.config.service_account_key)
                .await?;
            parse_json(&body)
        })
    }

    fn result<'a>(&'a self, external_id: &'a str) -> BoxFuture<'a, Result<Value, ResultError>> {
        Box::pin(async move {
            let url = format!("{}/v1/{}/results", self.base_url, external_id);
            match self
                .http
                .get_with_bearer(&url, &self.config.service_account_key)
                .await
            {
                Ok(body) => Ok(parse_json(&body)?),
                // Results are absent until execution succeeds.
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
            let url = format!("{}/v1/{}:cancel", self.base_url, external_id);
            match self
                .http
                .post_json_with_bearer(&url, "{}", &self.config.service_account_key)
                .await
            {
                Ok(_) => Ok(true),
                Err(ProviderError::HttpStatus { .. }) => Ok(false),
                Err(e) => Err(e),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockHttpClient;

    fn test_provider(mock: MockHttpClient) -> GoogleProvider<MockHttpClient> {
        GoogleProvider::new(mock, GoogleConfig::new("demo-project", "demo_key"))
    }

    #[test]
    fn test_provider_name() {
        let provider = test_provider(MockHttpClient::json("{}"));
        assert_eq!(provider.name(), "google");
    }

    #[test]
    fn test_transform_circuit_shape() {
        let circuit = json!({ "gates": [{ "type": "h", "qubit": 0 }] });
        let program = GoogleProvider::<MockHttpClient>::transform_circuit(&circuit);

        assert_eq!(program["program"]["language"]["gate_set"], "sqrt_iswap");
        assert_eq!(
            program["program"]["circuit"]["scheduling_strategy"],
            "MOMENT_BY_MOMENT"
        );
        assert_eq!(
            program["program"]["circuit"]["moments"].as_array().unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_submit_returns_program_name() {
        let provider = test_provider(MockHttpClient::json("{}"));

        let external_id = provider
            .submit(&json!({ "gates": [] }), &Map::new())
            .await
            .unwrap();

        assert!(external_id.starts_with("projects/demo-project/programs/"));
        assert_eq!(
            provider.http.seen_urls(),
            vec!["https://quantum.googleapis.com/v1/projects/demo-project/programs".to_string()]
        );
    }

    #[tokio::test]
    async fn test_submit_distinct_program_names() {
        let provider = test_provider(MockHttpClient::json("{}"));

        let first = provider.submit(&json!({}), &Map::new()).await.unwrap();
        let second = provider.submit(&json!({}), &Map::new()).await.unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn test_submit_failure_carries_provider() {
        let provider = test_provider(MockHttpClient::new(Err(ProviderError::HttpError(
            "connection reset".to_string(),
        ))));

        let err = provider.submit(&json!({}), &Map::new()).await.unwrap_err();
        assert_eq!(err.provider, "google");
    }

    #[tokio::test]
    async fn test_status_uses_program_name_url() {
        let provider = test_provider(MockHttpClient::json(
            r#"{"execution_status":{"state":"SUCCESS"}}"#,
        ));

        let payload = provider
            .status("projects/demo-project/programs/abc123")
            .await
            .unwrap();
        assert_eq!(payload["execution_status"]["state"], "SUCCESS");
        assert_eq!(
            provider.http.seen_urls(),
            vec!["https://quantum.googleapis.com/v1/projects/demo-project/programs/abc123".to_string()]
        );
    }

    #[tokio::test]
    async fn test_result_not_found_maps_to_not_available() {
        let provider = test_provider(MockHttpClient::new(Err(ProviderError::HttpStatus {
            code: 404,
            url: "https://quantum.googleapis.com/v1/x/results".to_string(),
        })));

        let err = provider.result("x").await.unwrap_err();
        assert!(matches!(err, ResultError::NotAvailable { .. }));
    }

    #[tokio::test]
    async fn test_cancel_refused_returns_false() {
        let provider = test_provider(MockHttpClient::new(Err(ProviderError::HttpStatus {
            code: 400,
            url: "https://quantum.googleapis.com/v1/x:cancel".to_string(),
        })));
        assert!(!provider.cancel("x").await.unwrap());
    }
}
