//! High-level gateway facade.
//!
//! [`QuantumGateway`] wires configuration into providers, applies the
//! selection policy for unpinned submissions, retains per-job request
//! metadata, and feeds the monitoring observer with status-change events.
//! It is the inbound surface an HTTP layer (or the CLI) talks to.

mod config;

pub use config::GatewayConfig;

use crate::job::{JobId, JobRequest};
use crate::monitoring::GatewayMonitoring;
use crate::orchestrator::{JobOrchestrator, OrchestratorError, StatusView};
use crate::provider::{ProviderFactory, ProviderSettings, ReqwestClient};
use crate::selection::select_provider;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::Value;
use tracing::info;

/// Request metadata retained for one submitted job.
#[derive(Clone, Debug)]
pub struct SubmissionRecord {
    /// The original request as handed over by the caller.
    pub request: JobRequest,
    /// Provider chosen by the selection policy (or pinned by the caller).
    pub selected_provider: String,
    /// When the gateway accepted the submission.
    pub submitted_at: DateTime<Utc>,
}

/// Facade over the orchestrator, selection policy, and monitoring.
///
/// # Example
///
/// ```ignore
/// use qbridge::gateway::{GatewayConfig, QuantumGateway};
/// use qbridge::job::JobRequest;
///
/// let gateway = QuantumGateway::new(GatewayConfig::from_env())?;
/// let id = gateway.submit(JobRequest::new("vqe", circuit)).await?;
/// let view = gateway.job_status(&id).await?;
/// ```
pub struct QuantumGateway {
    orchestrator: JobOrchestrator,
    jobs: DashMap<JobId, SubmissionRecord>,
    monitoring: GatewayMonitoring,
}

impl QuantumGateway {
    /// Creates a gateway, building and registering one provider per
    /// configured backend.
    pub fn new(config: GatewayConfig) -> Result<Self, OrchestratorError> {
        let factory = ProviderFactory::new(ReqwestClient::new()?);
        let mut orchestrator = JobOrchestrator::new();

        let mut settings = Vec::new();
        if let Some(ibm) = config.ibm {
            settings.push(ProviderSettings::Ibm(ibm));
        }
        if let Some(google) = config.google {
            settings.push(ProviderSettings::Google(google));
        }
        if let Some(azure) = config.azure {
            settings.push(ProviderSettings::Azure(azure));
        }

        for provider_settings in &settings {
            orchestrator
                .register_provider(provider_settings.name(), factory.create(provider_settings))?;
        }

        info!(
            providers = settings.len(),
            "Quantum gateway initialized"
        );
        Ok(Self::from_orchestrator(orchestrator))
    }

    /// Creates a gateway from environment-derived configuration.
    pub fn from_env() -> Result<Self, OrchestratorError> {
        Self::new(GatewayConfig::from_env())
    }

    /// Wraps an already-wired orchestrator.
    ///
    /// Useful for embedding custom providers; registration must be
    /// complete, since the provider table is read-only from here on.
    pub fn from_orchestrator(orchestrator: JobOrchestrator) -> Self {
        Self {
            orchestrator,
            jobs: DashMap::new(),
            monitoring: GatewayMonitoring::new(),
        }
    }

    /// Submits a job, routing it via the selection policy unless the
    /// request pins a provider.
    ///
    /// The per-job provider config is the request's execution config with
    /// backend requirements merged over it.
    pub async fn submit(&self, request: JobRequest) -> Result<JobId, OrchestratorError> {
        let registered = self.orchestrator.provider_names();
        let provider = select_provider(&request, &registered).to_string();

        let mut job_config = request.execution_config.clone();
        for (key, value) in &request.backend_requirements {
            job_config.insert(key.clone(), value.clone());
        }

        let internal_id = self
            .orchestrator
            .submit_job(&provider, &request.circuit_data, &job_config)
            .await?;

        self.monitoring
            .record_submission(internal_id, &provider, &request.algorithm_type);
        self.jobs.insert(
            internal_id,
            SubmissionRecord {
                request,
                selected_provider: provider,
                submitted_at: Utc::now(),
            },
        );

        Ok(internal_id)
    }

    /// Refreshes and returns the unified status view for a job.
    ///
    /// Successful refreshes feed the monitoring observer; failures are
    /// counted against the job's error tally.
    pub async fn job_status(&self, internal_id: &JobId) -> Result<StatusView, OrchestratorError> {
        match self.orchestrator.get_job_status(internal_id).await {
            Ok(view) => {
                self.monitoring.record_status_change(internal_id, view.status);
                Ok(view)
            }
            Err(e) => {
                self.monitoring.record_error(internal_id);
                Err(e)
            }
        }
    }

    /// Retrieves provider-native result data for a completed job.
    pub async fn job_result(&self, internal_id: &JobId) -> Result<Value, OrchestratorError> {
        self.orchestrator.get_job_result(internal_id).await
    }

    /// Requests best-effort cancellation of a job.
    pub async fn cancel(&self, internal_id: &JobId) -> Result<bool, OrchestratorError> {
        self.orchestrator.cancel_job(internal_id).await
    }

    /// Returns the retained submission metadata for a job.
    pub fn submission_record(&self, internal_id: &JobId) -> Option<SubmissionRecord> {
        self.jobs.get(internal_id).map(|entry| entry.value().clone())
    }

    /// Returns the monitoring observer.
    pub fn monitoring(&self) -> &GatewayMonitoring {
        &self.monitoring
    }

    /// Returns the underlying orchestrator.
    pub fn orchestrator(&self) -> &JobOrchestrator {
        &self.orchestrator
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::{
        BoxFuture, ProviderError, QuantumProvider, ResultError, SubmissionError,
    };
    use crate::status::JobStatus;
    use serde_json::{json, Map};
    use std::sync::Arc;
    use std::sync::Mutex;

    /// Provider that records the config it was asked to submit with.
    struct RecordingProvider {
        name: String,
        status_payload: Value,
        last_config: Mutex<Option<Map<String, Value>>>,
    }

    impl RecordingProvider {
        fn new(name: &str, status_payload: Value) -> Arc<Self> {
            Arc::new(Self {
                name: name.to_string(),
                status_payload,
                last_config: Mutex::new(None),
            })
        }
    }

    impl QuantumProvider for RecordingProvider {
        fn name(&self) -> &str {
            &self.name
        }

        fn submit<'a>(
            &'a self,
            _circuit: &'a Value,
            config: &'a Map<String, Value>,
        ) -> BoxFuture<'a, Result<String, SubmissionError>> {
            Box::pin(async move {
                *self.last_config.lock().unwrap() = Some(config.clone());
                Ok(format!("{}-ext", self.name))
            })
        }

        fn status<'a>(&'a self, _external_id: &'a str) -> BoxFuture<'a, Result<Value, ProviderError>> {
            Box::pin(async move { Ok(self.status_payload.clone()) })
        }

        fn result<'a>(&'a self, _external_id: &'a str) -> BoxFuture<'a, Result<Value, ResultError>> {
            Box::pin(async move { Ok(json!({ "result": "ok" })) })
        }

        fn cancel<'a>(&'a self, _external_id: &'a str) -> BoxFuture<'a, Result<bool, ProviderError>> {
            Box::pin(async move { Ok(true) })
        }
    }

    fn test_gateway() -> (Arc<RecordingProvider>, Arc<RecordingProvider>, QuantumGateway) {
        let ibm = RecordingProvider::new("ibm", json!({ "status": "DONE" }));
        let azure = RecordingProvider::new("azure", json!({ "status": "Waiting" }));

        let mut orchestrator = JobOrchestrator::new();
        orchestrator
            .register_provider("ibm", Arc::clone(&ibm) as Arc<dyn QuantumProvider>)
            .unwrap();
        orchestrator
            .register_provider("azure", Arc::clone(&azure) as Arc<dyn QuantumProvider>)
            .unwrap();

        (ibm, azure, QuantumGateway::from_orchestrator(orchestrator))
    }

    #[tokio::test]
    async fn test_submit_routes_via_policy() {
        let (_, azure, gateway) = test_gateway();

        let request = JobRequest::new("custom", json!({ "gates": [] }))
            .with_preferred_provider("azure");
        let id = gateway.submit(request).await.unwrap();

        let record = gateway.submission_record(&id).unwrap();
        assert_eq!(record.selected_provider, "azure");
        assert!(azure.last_config.lock().unwrap().is_some());
    }

    #[tokio::test]
    async fn test_submit_merges_backend_requirements_over_execution_config() {
        let (ibm, _, gateway) = test_gateway();

        let request = JobRequest::new("vqe", json!({ "gates": [] }))
            .with_execution_param("shots", json!(1024))
            .with_execution_param("backend", json!("ibmq_qasm_simulator"))
            .with_backend_requirement("backend", json!("ibmq_manila"));
        gateway.submit(request).await.unwrap();

        let config = ibm.last_config.lock().unwrap().clone().unwrap();
        assert_eq!(config["shots"], json!(1024));
        // Backend requirements win over execution config on key collision.
        assert_eq!(config["backend"], json!("ibmq_manila"));
    }

    #[tokio::test]
    async fn test_status_feeds_monitoring() {
        let (_, _, gateway) = test_gateway();

        let id = gateway
            .submit(JobRequest::new("vqe", json!({ "gates": [] })))
            .await
            .unwrap();
        let view = gateway.job_status(&id).await.unwrap();
        assert_eq!(view.status, JobStatus::Completed);

        let metrics = gateway.monitoring().job_metrics(&id).unwrap();
        assert_eq!(metrics.status, JobStatus::Completed);
        assert_eq!(metrics.provider, "ibm");
        assert_eq!(metrics.algorithm_type, "vqe");
    }

    #[tokio::test]
    async fn test_status_failure_counts_error() {
        let (_, _, gateway) = test_gateway();

        let id = gateway
            .submit(JobRequest::new("vqe", json!({ "gates": [] })))
            .await
            .unwrap();

        // Unknown id: the error path must not touch the submitted job.
        let missing = JobId::new();
        assert!(gateway.job_status(&missing).await.is_err());
        assert_eq!(gateway.monitoring().job_metrics(&id).unwrap().error_count, 0);
    }

    #[tokio::test]
    async fn test_result_and_cancel_passthrough() {
        let (_, _, gateway) = test_gateway();

        let id = gateway
            .submit(JobRequest::new("vqe", json!({ "gates": [] })))
            .await
            .unwrap();
        gateway.job_status(&id).await.unwrap();

        let result = gateway.job_result(&id).await.unwrap();
        assert_eq!(result["result"], "ok");
        assert!(gateway.cancel(&id).await.unwrap());
    }

    #[tokio::test]
    async fn test_submission_record_retains_request() {
        let (_, _, gateway) = test_gateway();

        let request = JobRequest::new("maxcut", json!({ "gates": [] }));
        let id = gateway.submit(request).await.unwrap();

        let record = gateway.submission_record(&id).unwrap();
        assert_eq!(record.request.algorithm_type, "maxcut");
        assert_eq!(record.selected_provider, "ibm");
    }
}
