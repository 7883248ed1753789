//! Job identity and submission model.
//!
//! A [`JobId`] is the internal identity minted by the gateway at submission
//! time. It is the only identity callers should persist: the id a provider
//! assigns (the *external* id) is opaque and meaningless outside that
//! provider's context.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// Unique internal identifier for a job.
///
/// Ids are random v4 UUIDs, unique for the process lifetime and never
/// reused. A random id (rather than a counter) also stays collision-free
/// across restarts should a persistence layer be added on top of the
/// in-memory registry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    /// Creates a new unique job id.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[inline]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Circuit interchange format declared by the caller.
///
/// Qiskit is the interchange default; Cirq and Q# are native to specific
/// providers and participate in format-affinity provider selection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CircuitFormat {
    /// Qiskit-style gate list (the interchange default).
    #[default]
    Qiskit,
    /// Cirq moment structure (Google-native).
    Cirq,
    /// Q# program (Azure-native).
    Qsharp,
}

impl CircuitFormat {
    /// Returns the format name for logging.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Qiskit => "qiskit",
            Self::Cirq => "cirq",
            Self::Qsharp => "qsharp",
        }
    }
}

impl std::fmt::Display for CircuitFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

fn default_priority() -> u8 {
    1
}

/// A validated job submission, as handed over by the request layer.
///
/// The gateway performs no schema validation of its own; it consumes this
/// structure as-is. `circuit_data` is opaque to the orchestration core;
/// only the bound provider's circuit transform interprets it.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct JobRequest {
    /// Algorithm category ("maxcut", "vqe", "qaoa", "quantum_ml", "custom", ...).
    pub algorithm_type: String,

    /// Opaque circuit description.
    pub circuit_data: Value,

    /// Interchange format of `circuit_data`.
    #[serde(default)]
    pub circuit_format: CircuitFormat,

    /// Provider pinned by the caller, if any.
    #[serde(default)]
    pub preferred_provider: Option<String>,

    /// Declared fallback providers. Carried for callers that orchestrate
    /// their own retries; the selection policy never consults this list.
    #[serde(default)]
    pub fallback_providers: Vec<String>,

    /// Capability flags and backend hints (e.g. `error_mitigation`,
    /// `backend`). Merged into the per-job provider config at submission.
    #[serde(default)]
    pub backend_requirements: Map<String, Value>,

    /// Execution parameters (e.g. `shots`, `repetitions`).
    #[serde(default)]
    pub execution_config: Map<String, Value>,

    /// Caller-assigned display name.
    #[serde(default)]
    pub job_name: Option<String>,

    /// Caller priority, 1 (lowest) to 10.
    #[serde(default = "default_priority")]
    pub priority: u8,

    /// Caller-declared execution time budget in seconds. Advisory: the
    /// gateway applies no timeout of its own.
    #[serde(default)]
    pub max_execution_time: Option<u64>,

    /// Webhook to notify on completion (consumed by an outer layer).
    #[serde(default)]
    pub webhook_url: Option<String>,

    /// Email to notify on completion (consumed by an outer layer).
    #[serde(default)]
    pub notification_email: Option<String>,
}

impl JobRequest {
    /// Creates a request with the given algorithm type and circuit data;
    /// everything else takes its default.
    pub fn new(algorithm_type: impl Into<String>, circuit_data: Value) -> Self {
        Self {
            algorithm_type: algorithm_type.into(),
            circuit_data,
            circuit_format: CircuitFormat::default(),
            preferred_provider: None,
            fallback_providers: Vec::new(),
            backend_requirements: Map::new(),
            execution_config: Map::new(),
            job_name: None,
            priority: default_priority(),
            max_execution_time: None,
            webhook_url: None,
            notification_email: None,
        }
    }

    /// Pins a provider, bypassing the affinity rules of the selection policy.
    pub fn with_preferred_provider(mut self, provider: impl Into<String>) -> Self {
        self.preferred_provider = Some(provider.into());
        self
    }

    /// Sets the circuit interchange format.
    pub fn with_circuit_format(mut self, format: CircuitFormat) -> Self {
        self.circuit_format = format;
        self
    }

    /// Adds one execution parameter (e.g. `shots`).
    pub fn with_execution_param(mut self, key: impl Into<String>, value: Value) -> Self {
        self.execution_config.insert(key.into(), value);
        self
    }

    /// Adds one backend requirement flag (e.g. `error_mitigation`).
    pub fn with_backend_requirement(mut self, key: impl Into<String>, value: Value) -> Self {
        self.backend_requirements.insert(key.into(), value);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_job_id_uniqueness() {
        let a = JobId::new();
        let b = JobId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_job_id_display_roundtrip() {
        let id = JobId::new();
        assert_eq!(format!("{}", id), id.as_uuid().to_string());
    }

    #[test]
    fn test_circuit_format_default() {
        assert_eq!(CircuitFormat::default(), CircuitFormat::Qiskit);
    }

    #[test]
    fn test_request_defaults() {
        let request = JobRequest::new("maxcut", json!({ "gates": [] }));
        assert_eq!(request.circuit_format, CircuitFormat::Qiskit);
        assert!(request.preferred_provider.is_none());
        assert!(request.fallback_providers.is_empty());
        assert_eq!(request.priority, 1);
    }

    #[test]
    fn test_request_builders() {
        let request = JobRequest::new("custom", json!({}))
            .with_preferred_provider("azure")
            .with_circuit_format(CircuitFormat::Qsharp)
            .with_execution_param("shots", json!(2048))
            .with_backend_requirement("error_mitigation", json!(true));

        assert_eq!(request.preferred_provider.as_deref(), Some("azure"));
        assert_eq!(request.circuit_format, CircuitFormat::Qsharp);
        assert_eq!(request.execution_config["shots"], json!(2048));
        assert_eq!(request.backend_requirements["error_mitigation"], json!(true));
    }

    #[test]
    fn test_request_deserializes_with_defaults() {
        let request: JobRequest = serde_json::from_value(json!({
            "algorithm_type": "vqe",
            "circuit_data": { "gates": [], "num_qubits": 2 }
        }))
        .expect("minimal request should deserialize");

        assert_eq!(request.algorithm_type, "vqe");
        assert_eq!(request.circuit_format, CircuitFormat::Qiskit);
        assert_eq!(request.priority, 1);
        assert!(request.execution_config.is_empty());
    }
}
