//! Canonical job status and provider status normalization.
//!
//! Every provider reports job state in its own vocabulary ("DONE",
//! "Succeeded", "SUCCESS", ...). The [`StatusNormalizer`] collapses those
//! vocabularies into the single [`JobStatus`] enumeration that the rest of
//! the gateway reasons about. Normalization is a pure lookup: the same
//! (provider, payload) pair always produces the same canonical status, and
//! anything outside a provider's known vocabulary maps to
//! [`JobStatus::Unknown`] rather than an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Canonical job status, independent of any provider's vocabulary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Submitted, no status observed from the provider yet.
    #[default]
    Pending,

    /// Accepted by the provider, waiting for execution.
    Queued,

    /// Provider-side validation or device preparation.
    Initializing,

    /// Currently executing on the backend.
    Running,

    /// Finished successfully; results can be retrieved.
    Completed,

    /// Finished unsuccessfully.
    Failed,

    /// Cancelled before completion.
    Cancelled,

    /// The provider reported something outside its known vocabulary.
    Unknown,
}

impl JobStatus {
    /// Returns true if this is a terminal state (the job is finished).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed | Self::Cancelled)
    }

    /// Returns true if the job is still in flight (not terminal, not unknown).
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            Self::Pending | Self::Queued | Self::Initializing | Self::Running
        )
    }

    /// Returns the status name for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Queued => "queued",
            Self::Initializing => "initializing",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// IBM Quantum native statuses.
const IBM_STATUSES: &[(&str, JobStatus)] = &[
    ("QUEUED", JobStatus::Queued),
    ("VALIDATING", JobStatus::Initializing),
    ("RUNNING", JobStatus::Running),
    ("DONE", JobStatus::Completed),
    ("ERROR", JobStatus::Failed),
    ("CANCELLED", JobStatus::Cancelled),
];

/// Google Quantum AI native statuses.
const GOOGLE_STATUSES: &[(&str, JobStatus)] = &[
    ("READY", JobStatus::Queued),
    ("RUNNING", JobStatus::Running),
    ("SUCCESS", JobStatus::Completed),
    ("FAILURE", JobStatus::Failed),
    ("CANCELLED", JobStatus::Cancelled),
];

/// Azure Quantum native statuses.
const AZURE_STATUSES: &[(&str, JobStatus)] = &[
    ("Waiting", JobStatus::Queued),
    ("Executing", JobStatus::Running),
    ("Succeeded", JobStatus::Completed),
    ("Failed", JobStatus::Failed),
    ("Cancelled", JobStatus::Cancelled),
];

/// Pure mapping from provider-native status payloads to [`JobStatus`].
///
/// Each provider owns a fixed lookup table from its native status strings to
/// canonical values. Where the native string lives inside the payload is
/// provider-specific: IBM and Azure report a top-level `status` field while
/// Google nests the state under `execution_status.state`.
///
/// Extending the gateway to a new provider means adding one table and one
/// extraction arm here; orchestration logic never changes.
pub struct StatusNormalizer;

impl StatusNormalizer {
    /// Normalizes a provider-native status payload into a canonical status.
    ///
    /// Never panics and never guesses: an unregistered provider name, a
    /// payload without the expected status field, or a native string absent
    /// from the provider's table all normalize to [`JobStatus::Unknown`].
    pub fn normalize(provider: &str, payload: &Value) -> JobStatus {
        let raw = match Self::extract_native_status(provider, payload) {
            Some(raw) => raw,
            None => return JobStatus::Unknown,
        };

        Self::table_for(provider)
            .and_then(|table| {
                table
                    .iter()
                    .find(|(native, _)| *native == raw)
                    .map(|(_, canonical)| *canonical)
            })
            .unwrap_or(JobStatus::Unknown)
    }

    /// Extracts the native status string from a provider payload.
    ///
    /// Returns `None` for unregistered providers or payloads that do not
    /// carry the field where this provider is known to put it.
    pub fn extract_native_status<'p>(provider: &str, payload: &'p Value) -> Option<&'p str> {
        match provider {
            "ibm" | "azure" => payload.get("status")?.as_str(),
            "google" => payload.get("execution_status")?.get("state")?.as_str(),
            _ => None,
        }
    }

    /// Returns the provider names this normalizer has tables for.
    pub fn known_providers() -> &'static [&'static str] {
        &["ibm", "google", "azure"]
    }

    /// Returns true if the normalizer carries a table for `provider`.
    pub fn has_table(provider: &str) -> bool {
        Self::table_for(provider).is_some()
    }

    fn table_for(provider: &str) -> Option<&'static [(&'static str, JobStatus)]> {
        match provider {
            "ibm" => Some(IBM_STATUSES),
            "google" => Some(GOOGLE_STATUSES),
            "azure" => Some(AZURE_STATUSES),
            _ => None,
        }
    }
}
