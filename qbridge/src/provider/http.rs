//! HTTP client abstraction for testability.
//!
//! Providers never talk to `reqwest` directly; they go through the
//! [`HttpClient`] trait so tests can inject a mock transport and exercise
//! submission, status, and result paths without a network.

use super::types::ProviderError;
use std::future::Future;
use tracing::{debug, trace, warn};

/// Default User-Agent string for requests to provider APIs.
const DEFAULT_USER_AGENT: &str = concat!("qbridge/", env!("CARGO_PKG_VERSION"));

/// Trait for asynchronous HTTP operations against provider endpoints.
///
/// All provider APIs in the gateway authenticate with bearer tokens, so the
/// surface is deliberately small: authenticated GET, POST and PUT of JSON.
pub trait HttpClient: Send + Sync {
    /// Performs a GET request with Bearer token authentication.
    fn get_with_bearer(
        &self,
        url: &str,
        bearer_token: &str,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;

    /// Performs a POST request with a JSON body and Bearer token.
    fn post_json_with_bearer(
        &self,
        url: &str,
        json_body: &str,
        bearer_token: &str,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;

    /// Performs a PUT request with a JSON body and Bearer token.
    fn put_json_with_bearer(
        &self,
        url: &str,
        json_body: &str,
        bearer_token: &str,
    ) -> impl Future<Output = Result<Vec<u8>, ProviderError>> + Send;
}

/// Real HTTP client implementation using reqwest.
///
/// Uses non-blocking I/O; safe to share across concurrent job operations
/// (cloning is cheap; reqwest clients share their connection pool).
#[derive(Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    /// Creates a new client with default configuration.
    pub fn new() -> Result<Self, ProviderError> {
        Self::with_timeout(30)
    }

    /// Creates a new client with a custom request timeout.
    pub fn with_timeout(timeout_secs: u64) -> Result<Self, ProviderError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(timeout_secs))
            .user_agent(DEFAULT_USER_AGENT)
            .tcp_keepalive(std::time::Duration::from_secs(30))
            .tcp_nodelay(true)
            .build()
            .map_err(|e| ProviderError::HttpError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client })
    }

    async fn execute(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, ProviderError> {
        let response = match request.send().await {
            Ok(resp) => {
                debug!(
                    url = %resp.url(),
                    status = resp.status().as_u16(),
                    "provider response received"
                );
                resp
            }
            Err(e) => {
                warn!(
                    error = %e,
                    is_connect = e.is_connect(),
                    is_timeout = e.is_timeout(),
                    "provider request failed"
                );
                return Err(ProviderError::HttpError(format!("Request failed: {}", e)));
            }
        };

        let status = response.status();
        let url = response.url().to_string();
        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "provider error status");
            return Err(ProviderError::HttpStatus {
                code: status.as_u16(),
                url,
            });
        }

        match response.bytes().await {
            Ok(bytes) => {
                trace!(url = %url, bytes = bytes.len(), "provider response body read");
                Ok(bytes.to_vec())
            }
            Err(e) => Err(ProviderError::HttpError(format!(
                "Failed to read response: {}",
                e
            ))),
        }
    }
}

impl HttpClient for ReqwestClient {
    async fn get_with_bearer(
        &self,
        url: &str,
        bearer_token: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        trace!(url = url, "HTTP GET request starting");
        let request = self.client.get(url).bearer_auth(bearer_token);
        self.execute(request).await
    }

    async fn post_json_with_bearer(
        &self,
        url: &str,
        json_body: &str,
        bearer_token: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        trace!(url = url, "HTTP POST request starting");
        let request = self
            .client
            .post(url)
            .bearer_auth(bearer_token)
            .header("Content-Type", "application/json")
            .body(json_body.to_string());
        self.execute(request).await
    }

    async fn put_json_with_bearer(
        &self,
        url: &str,
        json_body: &str,
        bearer_token: &str,
    ) -> Result<Vec<u8>, ProviderError> {
        trace!(url = url, "HTTP PUT request starting");
        let request = self
            .client
            .put(url)
            .bearer_auth(bearer_token)
            .header("Content-Type", "application/json")
            .body(json_body.to_string());
        self.execute(request).await
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Mock HTTP client for testing.
    ///
    /// Returns the configured response for every call and records the URLs
    /// it was asked for, so tests can assert on request construction.
    pub struct MockHttpClient {
        pub response: Result<Vec<u8>, ProviderError>,
        pub requests: Mutex<Vec<String>>,
    }

    impl MockHttpClient {
        pub fn new(response: Result<Vec<u8>, ProviderError>) -> Self {
            Self {
                response,
                requests: Mutex::new(Vec::new()),
            }
        }

        /// Convenience constructor for a JSON success response.
        pub fn json(body: &str) -> Self {
            Self::new(Ok(body.as_bytes().to_vec()))
        }

        pub fn seen_urls(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }

        fn record(&self, url: &str) -> Result<Vec<u8>, ProviderError> {
            self.requests.lock().unwrap().push(url.to_string());
            self.response.clone()
        }
    }

    impl HttpClient for MockHttpClient {
        async fn get_with_bearer(
            &self,
            url: &str,
            _bearer_token: &str,
        ) -> Result<Vec<u8>, ProviderError> {
            self.record(url)
        }

        async fn post_json_with_bearer(
            &self,
            url: &str,
            _json_body: &str,
            _bearer_token: &str,
        ) -> Result<Vec<u8>, ProviderError> {
            self.record(url)
        }

        async fn put_json_with_bearer(
            &self,
            url: &str,
            _json_body: &str,
            _bearer_token: &str,
        ) -> Result<Vec<u8>, ProviderError> {
            self.record(url)
        }
    }

    #[tokio::test]
    async fn test_mock_client_success() {
        let mock = MockHttpClient::json(r#"{"id":"job-1"}"#);
        let result = mock.get_with_bearer("https://example.com", "token").await;
        assert!(result.is_ok());
        assert_eq!(mock.seen_urls(), vec!["https://example.com".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_client_error() {
        let mock = MockHttpClient::new(Err(ProviderError::HttpStatus {
            code: 500,
            url: "https://example.com".to_string(),
        }));
        let result = mock
            .post_json_with_bearer("https://example.com", "{}", "token")
            .await;
        assert!(matches!(
            result.unwrap_err(),
            ProviderError::HttpStatus { code: 500, .. }
        ));
    }
}
