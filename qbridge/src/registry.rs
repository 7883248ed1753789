//! Job registry: the binding store between internal and external identity.
//!
//! The registry owns every [`JobBinding`] and the internal-id generation
//! policy. It performs no network I/O; all operations are constant-time
//! lookups over a concurrent keyed store. The store supports concurrent
//! read/write from multiple in-flight job operations: each binding is
//! mutated under the map entry's exclusive guard, so an individual update
//! is never torn.

use crate::job::JobId;
use crate::status::JobStatus;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Errors from registry lookups.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    /// The internal id is unknown to the registry.
    #[error("job {0} not found")]
    JobNotFound(JobId),
}

/// The orchestrator's unit of truth for one job.
///
/// A binding associates one internal id with exactly one provider and
/// external id for the job's lifetime: `provider_name` and `external_id`
/// are set together at creation and never change afterward; a binding is
/// never re-targeted. Status fields are only written through
/// [`JobRegistry::update_status`] with normalizer output.
#[derive(Clone, Debug)]
pub struct JobBinding {
    /// Internal identity, minted at submission.
    pub internal_id: JobId,
    /// Name of the bound provider (immutable).
    pub provider_name: String,
    /// Provider-assigned identity (immutable, opaque).
    pub external_id: String,
    /// When the job was submitted (immutable).
    pub submitted_at: DateTime<Utc>,
    /// When the status was last refreshed from the provider.
    pub last_checked_at: Option<DateTime<Utc>>,
    /// Last canonical status produced by the normalizer.
    pub canonical_status: JobStatus,
    /// Last raw provider payload, retained for diagnostics.
    pub raw_provider_status: Option<Value>,
}

/// In-memory store of internal-job-id → provider binding.
///
/// Bindings are created exactly once at submission and live until process
/// teardown; the registry defines no expiry.
pub struct JobRegistry {
    jobs: DashMap<JobId, JobBinding>,
    /// Total bindings created (lifetime counter).
    total_jobs: AtomicU64,
}

impl JobRegistry {
    /// Creates a new empty registry.
    pub fn new() -> Self {
        Self {
            jobs: DashMap::new(),
            total_jobs: AtomicU64::new(0),
        }
    }

    /// Mints a fresh internal id and stores a new binding for it.
    ///
    /// Ids are random UUIDs: unique for the process lifetime, never
    /// reused, and safe to persist externally.
    pub fn create(&self, provider_name: impl Into<String>, external_id: impl Into<String>) -> JobId {
        let internal_id = JobId::new();
        let binding = JobBinding {
            internal_id,
            provider_name: provider_name.into(),
            external_id: external_id.into(),
            submitted_at: Utc::now(),
            last_checked_at: None,
            canonical_status: JobStatus::Pending,
            raw_provider_status: None,
        };

        tracing::debug!(
            job_id = %internal_id,
            provider = %binding.provider_name,
            external_id = %binding.external_id,
            "Registered job binding"
        );

        self.jobs.insert(internal_id, binding);
        self.total_jobs.fetch_add(1, Ordering::Relaxed);
        internal_id
    }

    /// Returns a snapshot of the binding for `internal_id`.
    pub fn get(&self, internal_id: &JobId) -> Result<JobBinding, RegistryError> {
        self.jobs
            .get(internal_id)
            .map(|entry| entry.value().clone())
            .ok_or(RegistryError::JobNotFound(*internal_id))
    }

    /// Overwrites the status fields of a binding from a fresh provider read.
    ///
    /// Updates `canonical_status`, `raw_provider_status`, and
    /// `last_checked_at` atomically under the entry guard, and returns the
    /// updated snapshot. Concurrent updates for the same id are
    /// last-writer-wins; each writer's values come from its own provider
    /// read, so every stored state is one the provider actually reported.
    pub fn update_status(
        &self,
        internal_id: &JobId,
        canonical_status: JobStatus,
        raw_payload: Value,
    ) -> Result<JobBinding, RegistryError> {
        let mut entry = self
            .jobs
            .get_mut(internal_id)
            .ok_or(RegistryError::JobNotFound(*internal_id))?;

        let binding = entry.value_mut();
        binding.canonical_status = canonical_status;
        binding.raw_provider_status = Some(raw_payload);
        binding.last_checked_at = Some(Utc::now());

        tracing::trace!(
            job_id = %internal_id,
            status = %canonical_status,
            "Job status updated"
        );

        Ok(binding.clone())
    }

    /// Returns the number of bindings not yet in a terminal status.
    pub fn active_count(&self) -> usize {
        self.jobs
            .iter()
            .filter(|entry| !entry.value().canonical_status.is_terminal())
            .count()
    }

    /// Returns the number of bindings held by the registry.
    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    /// Returns true if the registry holds no bindings.
    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    /// Returns a snapshot of registry statistics.
    pub fn stats(&self) -> RegistryStats {
        let mut stats = RegistryStats {
            total_jobs: self.total_jobs.load(Ordering::Relaxed),
            ..RegistryStats::default()
        };

        for entry in self.jobs.iter() {
            match entry.value().canonical_status {
                JobStatus::Pending => stats.jobs_pending += 1,
                JobStatus::Queued => stats.jobs_queued += 1,
                JobStatus::Initializing => stats.jobs_initializing += 1,
                JobStatus::Running => stats.jobs_running += 1,
                JobStatus::Completed => stats.jobs_completed += 1,
                JobStatus::Failed => stats.jobs_failed += 1,
                JobStatus::Cancelled => stats.jobs_cancelled += 1,
                JobStatus::Unknown => stats.jobs_unknown += 1,
            }
        }

        stats
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Snapshot of registry statistics.
#[derive(Debug, Clone, Default)]
pub struct RegistryStats {
    /// Bindings created over the process lifetime.
    pub total_jobs: u64,
    /// Bindings currently in Pending.
    pub jobs_pending: usize,
    /// Bindings currently in Queued.
    pub jobs_queued: usize,
    /// Bindings currently in Initializing.
    pub jobs_initializing: usize,
    /// Bindings currently in Running.
    pub jobs_running: usize,
    /// Bindings currently in Completed.
    pub jobs_completed: usize,
    /// Bindings currently in Failed.
    pub jobs_failed: usize,
    /// Bindings currently in Cancelled.
    pub jobs_cancelled: usize,
    /// Bindings currently in Unknown.
    pub jobs_unknown: usize,
}
