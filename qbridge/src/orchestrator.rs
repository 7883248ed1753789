//! Job orchestration across heterogeneous providers.
//!
//! The [`JobOrchestrator`] is the single coordination point above the
//! registry, the status normalizer, and whichever provider is bound to a
//! job. It owns internal job identity, dispatches capability calls to the
//! bound provider, and translates native status payloads into canonical
//! state. It depends only on the [`QuantumProvider`] contract, never on
//! concrete provider types.

use crate::job::JobId;
use crate::provider::{ProviderError, QuantumProvider, ResultError, SubmissionError};
use crate::registry::{JobRegistry, RegistryError, RegistryStats};
use crate::status::{JobStatus, StatusNormalizer};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors from orchestrator operations.
///
/// Nothing here is recovered silently: every failure either completes the
/// operation with one of these kinds or leaves registry state unchanged.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// Submission against an unknown provider name (caller error).
    #[error("provider '{0}' is not registered")]
    ProviderNotRegistered(String),

    /// Startup wiring error: the name is already taken.
    #[error("provider '{0}' is already registered")]
    ProviderAlreadyRegistered(String),

    /// The internal id is unknown to the registry (caller error).
    #[error("job {0} not found")]
    JobNotFound(JobId),

    /// The provider rejected or failed to accept the job.
    #[error(transparent)]
    Submission(#[from] SubmissionError),

    /// The job has not reached a terminal successful state yet; callers
    /// should poll rather than treat this as fatal.
    #[error("result for job '{external_id}' on provider '{provider}' is not available yet")]
    ResultNotAvailable {
        /// Provider bound to the job.
        provider: String,
        /// Provider-assigned job identity.
        external_id: String,
    },

    /// Provider transport failure, propagated uninterpreted.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

impl From<RegistryError> for OrchestratorError {
    fn from(e: RegistryError) -> Self {
        match e {
            RegistryError::JobNotFound(id) => Self::JobNotFound(id),
        }
    }
}

impl From<ResultError> for OrchestratorError {
    fn from(e: ResultError) -> Self {
        match e {
            ResultError::NotAvailable {
                provider,
                external_id,
            } => Self::ResultNotAvailable {
                provider,
                external_id,
            },
            ResultError::Provider(e) => Self::Provider(e),
        }
    }
}

/// Unified view of one job's state, returned by status queries.
#[derive(Clone, Debug, Serialize)]
pub struct StatusView {
    /// Internal job identity.
    pub internal_id: JobId,
    /// Canonical status after normalization.
    pub status: JobStatus,
    /// Name of the bound provider.
    pub provider: String,
    /// Provider-assigned identity.
    pub external_id: String,
    /// When the job was submitted.
    pub submitted_at: DateTime<Utc>,
    /// When this status was read from the provider.
    pub last_checked_at: Option<DateTime<Utc>>,
    /// Raw provider payload backing this view, for diagnostics.
    pub provider_details: Option<Value>,
}

/// Coordinates submission, status refresh, result retrieval, and
/// cancellation across the registry and the registered providers.
///
/// The provider table is populated once at startup via
/// [`register_provider`](Self::register_provider) and is read-only
/// afterward: registration takes `&mut self`, all job operations take
/// `&self`, so the type system enforces the split once the orchestrator is
/// shared.
pub struct JobOrchestrator {
    providers: HashMap<String, Arc<dyn QuantumProvider>>,
    registry: JobRegistry,
}

impl JobOrchestrator {
    /// Creates an orchestrator with no providers registered.
    pub fn new() -> Self {
        Self {
            providers: HashMap::new(),
            registry: JobRegistry::new(),
        }
    }

    /// Registers a provider under `name`.
    ///
    /// Re-registration under an existing name is rejected rather than
    /// silently overwriting the running provider.
    pub fn register_provider(
        &mut self,
        name: impl Into<String>,
        provider: Arc<dyn QuantumProvider>,
    ) -> Result<(), OrchestratorError> {
        let name = name.into();
        if self.providers.contains_key(&name) {
            return Err(OrchestratorError::ProviderAlreadyRegistered(name));
        }
        if !StatusNormalizer::has_table(&name) {
            warn!(
                provider = %name,
                "No status normalization table for provider; its statuses will read as 'unknown'"
            );
        }
        debug!(provider = %name, "Provider registered");
        self.providers.insert(name, provider);
        Ok(())
    }

    /// Returns the names of all registered providers.
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.keys().map(String::as_str).collect()
    }

    fn provider(&self, name: &str) -> Result<&Arc<dyn QuantumProvider>, OrchestratorError> {
        self.providers
            .get(name)
            .ok_or_else(|| OrchestratorError::ProviderNotRegistered(name.to_string()))
    }

    /// Submits a job to the named provider and returns its internal id.
    ///
    /// On provider failure the error is propagated and no binding is
    /// created; there are no partial/ghost jobs.
    pub async fn submit_job(
        &self,
        provider_name: &str,
        circuit: &Value,
        config: &Map<String, Value>,
    ) -> Result<JobId, OrchestratorError> {
        let provider = self.provider(provider_name)?;

        let external_id = provider.submit(circuit, config).await?;
        let internal_id = self.registry.create(provider_name, external_id.as_str());

        info!(
            job_id = %internal_id,
            provider = provider_name,
            external_id = %external_id,
            "Job submitted"
        );
        Ok(internal_id)
    }

    /// Queries the bound provider for fresh status, normalizes it, persists
    /// the update, and returns the unified view.
    ///
    /// Every call performs a fresh remote query; canonical status is never
    /// served from cache, so staleness is bounded only by the caller's
    /// polling frequency. Concurrent calls for the same id are not
    /// serialized: both may read, call the provider, and write back,
    /// last-writer-wins. This is non-linearizable but safe, as each write is
    /// independently derived from a provider read.
    pub async fn get_job_status(&self, internal_id: &JobId) -> Result<StatusView, OrchestratorError> {
        let binding = self.registry.get(internal_id)?;
        let provider = self.provider(&binding.provider_name)?;

        let raw = provider.status(&binding.external_id).await?;
        let status = StatusNormalizer::normalize(&binding.provider_name, &raw);
        let updated = self.registry.update_status(internal_id, status, raw)?;

        debug!(
            job_id = %internal_id,
            provider = %updated.provider_name,
            status = %status,
            "Job status refreshed"
        );

        Ok(StatusView {
            internal_id: *internal_id,
            status,
            provider: updated.provider_name,
            external_id: updated.external_id,
            submitted_at: updated.submitted_at,
            last_checked_at: updated.last_checked_at,
            provider_details: updated.raw_provider_status,
        })
    }

    /// Retrieves provider-native result data for a completed job.
    ///
    /// If the last known canonical status is not [`JobStatus::Completed`],
    /// fails with [`OrchestratorError::ResultNotAvailable`] without a
    /// provider round-trip; callers should poll status first. When the
    /// provider is queried and itself reports not-ready, that surfaces as
    /// the same error kind, never as a generic failure.
    pub async fn get_job_result(&self, internal_id: &JobId) -> Result<Value, OrchestratorError> {
        let binding = self.registry.get(internal_id)?;

        if binding.canonical_status != JobStatus::Completed {
            return Err(OrchestratorError::ResultNotAvailable {
                provider: binding.provider_name,
                external_id: binding.external_id,
            });
        }

        let provider = self.provider(&binding.provider_name)?;
        let result = provider.result(&binding.external_id).await?;
        Ok(result)
    }

    /// Requests best-effort cancellation from the bound provider.
    ///
    /// A `false` return means the provider gave no guarantee; callers
    /// should check status.
    pub async fn cancel_job(&self, internal_id: &JobId) -> Result<bool, OrchestratorError> {
        let binding = self.registry.get(internal_id)?;
        let provider = self.provider(&binding.provider_name)?;

        let acknowledged = provider.cancel(&binding.external_id).await?;
        if acknowledged {
            info!(job_id = %internal_id, provider = %binding.provider_name, "Cancellation acknowledged");
        } else {
            warn!(job_id = %internal_id, provider = %binding.provider_name, "Cancellation not acknowledged");
        }
        Ok(acknowledged)
    }

    /// Returns a snapshot of the underlying registry's statistics.
    pub fn registry_stats(&self) -> RegistryStats {
        self.registry.stats()
    }

    /// Returns the number of jobs not yet in a terminal status.
    pub fn active_jobs(&self) -> usize {
        self.registry.active_count()
    }

    /// Returns the number of jobs tracked by the registry.
    pub fn tracked_jobs(&self) -> usize {
        self.registry.len()
    }
}

impl Default for JobOrchestrator {
    fn default() -> Self {
        Self::new()
    }
}
