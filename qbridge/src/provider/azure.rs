//! Azure Quantum provider integration.
//!
//! Azure job ids are client-assigned: submission PUTs the job document
//! under a workspace-scoped id minted by this provider, which becomes the
//! external id for all later operations.

use super::http::HttpClient;
use super::types::{BoxFuture, ProviderError, QuantumProvider, ResultError, SubmissionError};
use serde_json::{json, Map, Value};
use uuid::Uuid;

const DEFAULT_BASE_URL: &str = "https://management.azure.com";
const API_VERSION: &str = "2022-09-12-preview";
const DEFAULT_TARGET: &str = "microsoft.simulator";

/// Configuration for the Azure Quantum provider.
#[derive(Clone, Debug)]
pub struct AzureConfig {
    /// Azure subscription the workspace lives in.
    pub subscription_id: String,
    /// Resource group of the workspace.
    pub resource_group: String,
    /// Quantum workspace name.
    pub workspace_name: String,
    /// Access token, forwarded verbatim as a bearer credential.
    pub access_token: String,
}

impl AzureConfig {
    pub fn new(
        subscription_id: impl Into<String>,
        resource_group: impl Into<String>,
        workspace_name: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            subscription_id: subscription_id.into(),
            resource_group: resource_group.into(),
            workspace_name: workspace_name.into(),
            access_token: access_token.into(),
        }
    }
}

/// Azure Quantum provider.
pub struct AzureProvider<C: HttpClient> {
    http: C,
    config: AzureConfig,
    base_url: String,
}

impl<C: HttpClient> AzureProvider<C> {
    /// Creates a new provider against the production Azure management API.
    pub fn new(http: C, config: AzureConfig) -> Self {
        Self::with_base_url(http, config, DEFAULT_BASE_URL.to_string())
    }

    /// Creates a new provider with a custom base URL (useful for testing).
    pub fn with_base_url(http: C, config: AzureConfig, base_url: String) -> Self {
        Self {
            http,
            config,
            base_url,
        }
    }

    fn job_url(&self, external_id: &str) -> String {
        self.job_url_with(external_id, "")
    }

    fn job_url_with(&self, external_id: &str, suffix: &str) -> String {
        format!(
            "{}/subscriptions/{}/resourceGroups/{}/providers/Microsoft.Quantum/workspaces/{}/jobs/{}{}?api-version={}",
            self.base_url,
            self.config.subscription_id,
            self.config.resource_group,
            self.config.workspace_name,
            external_id,
            suffix,
            API_VERSION
        )
    }

    /// Transforms the generic circuit description into the Q# input payload.
    fn transform_circuit(circuit: &Value) -> Value {
        json!({ "qsharp": circuit })
    }
}

fn parse_json(body: &[u8]) -> Result<Value, ProviderError> {
    serde_json::from_slice(body)
        .map_err(|e| ProviderError::InvalidResponse(format!("invalid JSON from Azure: {}", e)))
}

impl<C: HttpClient> QuantumProvider for AzureProvider<C> {
    fn name(&self) -> &str {
        "azure"
    }

    fn submit<'a>(
        &'a self,
        circuit: &'a Value,
        config: &'a Map<String, Value>,
    ) -> BoxFuture<'a, Result<String, SubmissionError>> {
        Box::pin(async move {
            let external_id = format!("azure-job-{}", Uuid::new_v4().simple());
            let target = config
                .get("target")
                .and_then(Value::as_str)
                .unwrap_or(DEFAULT_TARGET);

            let payload = json!({
                "id": external_id,
                "target": target,
                "inputData": Self::transform_circuit(circuit),
            });

            self.http
                .put_json_with_bearer(
                    &self.job_url(&external_id),
                    &payload.to_string(),
                    &self.config.access_token,
                )
                .await
                .map_err(|e| SubmissionError::new(self.name(), e))?;

            Ok(external_id)
        })
    }

    fn status<'a>(&'a self, external_id: &'a str) -> BoxFuture<'a, Result<Value, ProviderError>> {
        Box::pin(async move {
            let body = self
                .http
                .get_with_bearer(&self.job_url(external_id), &self.config.access_token)
                .await?;
            parse_json(&body)
        })
    }

    fn result<'a>(&'a self, external_id: &'a str) -> BoxFuture<'a, Result<Value, ResultError>> {
        Box::pin(async move {
            let url = self.job_url_with(external_id, "/results");
            match self.http.get_with_bearer(&url, &self.config.access_token).await {
                Ok(body) => Ok(parse_json(&body)?),
                // The results resource does not exist until the job succeeds.
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
            let url = self.job_url_with(external_id, "/cancel");
            match self
                .http
                .post_json_with_bearer(&url, "{}", &self.config.access_token)
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

    fn test_provider(mock: MockHttpClient) -> AzureProvider<MockHttpClient> {
        AzureProvider::new(
            mock,
            AzureConfig::new("demo-sub", "quantum-rg", "quantum-ws", "demo_token"),
        )
    }

    #[test]
    fn test_provider_name() {
        let provider = test_provider(MockHttpClient::json("{}"));
        assert_eq!(provider.name(), "azure");
    }

    #[test]
    fn test_transform_circuit_wraps_qsharp() {
        let circuit = json!({ "operations": ["H(q)"] });
        let payload = AzureProvider::<MockHttpClient>::transform_circuit(&circuit);
        assert_eq!(payload["qsharp"], circuit);
    }

    #[test]
    fn test_job_url_includes_workspace_path() {
        let provider = test_provider(MockHttpClient::json("{}"));
        let url = provider.job_url("azure-job-1");
        assert!(url.contains("/subscriptions/demo-sub/"));
        assert!(url.contains("/resourceGroups/quantum-rg/"));
        assert!(url.contains("/workspaces/quantum-ws/jobs/azure-job-1"));
        assert!(url.ends_with(&format!("api-version={}", API_VERSION)));
    }

    #[tokio::test]
    async fn test_submit_mints_external_id() {
        let provider = test_provider(MockHttpClient::json("{}"));

        let external_id = provider.submit(&json!({}), &Map::new()).await.unwrap();
        assert!(external_id.starts_with("azure-job-"));

        let urls = provider.http.seen_urls();
        assert_eq!(urls.len(), 1);
        assert!(urls[0].contains(&external_id));
    }

    #[tokio::test]
    async fn test_submit_failure_carries_provider() {
        let provider = test_provider(MockHttpClient::new(Err(ProviderError::HttpStatus {
            code: 403,
            url: "https://management.azure.com".to_string(),
        })));

        let err = provider.submit(&json!({}), &Map::new()).await.unwrap_err();
        assert_eq!(err.provider, "azure");
    }

    #[tokio::test]
    async fn test_status_returns_raw_payload() {
        let provider = test_provider(MockHttpClient::json(r#"{"status":"Succeeded"}"#));

        let payload = provider.status("azure-job-1").await.unwrap();
        assert_eq!(payload["status"], "Succeeded");
    }

    #[tokio::test]
    async fn test_result_not_found_maps_to_not_available() {
        let provider = test_provider(MockHttpClient::new(Err(ProviderError::HttpStatus {
            code: 404,
            url: "https://management.azure.com/results".to_string(),
        })));

        let err = provider.result("azure-job-1").await.unwrap_err();
        assert!(matches!(err, ResultError::NotAvailable { .. }));
    }

    #[tokio::test]
    async fn test_cancel_acknowledged() {
        let provider = test_provider(MockHttpClient::json("{}"));
        assert!(provider.cancel("azure-job-1").await.unwrap());
    }
}
