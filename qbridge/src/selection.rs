//! Provider selection policy.
//!
//! Chooses a provider for a new job when the caller does not pin one. This
//! is a pure decision function over the job description (no I/O), so the
//! whole rule space is testable by enumerating inputs.
//!
//! Rule order (first match wins):
//! 1. caller preference, if present and registered;
//! 2. algorithm-type affinity;
//! 3. format affinity (a circuit in a provider-native format routes to
//!    that provider; qiskit is the interchange default and does not pin);
//! 4. declared backend requirements;
//! 5. the fixed default provider.
//!
//! A request's `fallback_providers` list is never consulted; failover
//! across fallbacks belongs to the caller.

use crate::job::{CircuitFormat, JobRequest};
use serde_json::Value;

/// Provider used when no other rule matches.
pub const DEFAULT_PROVIDER: &str = "ibm";

/// Algorithm categories with a known best-suited provider.
const ALGORITHM_AFFINITY: &[(&str, &str)] = &[
    ("vqe", "ibm"),
    ("quantum_ml", "google"),
    ("variational_classifier", "google"),
];

/// Selects the provider for `request`.
///
/// `registered` is the set of provider names currently registered with the
/// orchestrator; only the caller-preference rule consults it. Affinity
/// rules may still name an unregistered provider; submission then fails
/// explicitly rather than being silently re-routed.
pub fn select_provider<'r>(request: &'r JobRequest, registered: &[&str]) -> &'r str {
    if let Some(preferred) = request.preferred_provider.as_deref() {
        if registered.contains(&preferred) {
            return preferred;
        }
    }

    if let Some((_, provider)) = ALGORITHM_AFFINITY
        .iter()
        .find(|(algorithm, _)| *algorithm == request.algorithm_type)
    {
        return provider;
    }

    match request.circuit_format {
        CircuitFormat::Qsharp => return "azure",
        CircuitFormat::Cirq => return "google",
        CircuitFormat::Qiskit => {}
    }

    let wants_error_mitigation = request
        .backend_requirements
        .get("error_mitigation")
        .and_then(Value::as_bool)
        .unwrap_or(false);
    if wants_error_mitigation {
        return "ibm";
    }

    DEFAULT_PROVIDER
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const ALL: &[&str] = &["ibm", "google", "azure"];

    fn request(algorithm: &str) -> JobRequest {
        JobRequest::new(algorithm, json!({ "gates": [] }))
    }

    #[test]
    fn test_explicit_preference_wins() {
        let req = request("maxcut").with_preferred_provider("azure");
        assert_eq!(select_provider(&req, ALL), "azure");
    }

    #[test]
    fn test_unregistered_preference_is_skipped() {
        let req = request("vqe").with_preferred_provider("ionq");
        // Preference names an unknown provider; the algorithm rule applies.
        assert_eq!(select_provider(&req, ALL), "ibm");
    }

    #[test]
    fn test_preference_beats_algorithm_affinity() {
        let req = request("vqe").with_preferred_provider("google");
        assert_eq!(select_provider(&req, ALL), "google");
    }

    #[test]
    fn test_algorithm_affinity() {
        assert_eq!(select_provider(&request("vqe"), ALL), "ibm");
        assert_eq!(select_provider(&request("quantum_ml"), ALL), "google");
        assert_eq!(select_provider(&request("variational_classifier"), ALL), "google");
    }

    #[test]
    fn test_format_affinity_qsharp() {
        let req = request("custom").with_circuit_format(CircuitFormat::Qsharp);
        assert_eq!(select_provider(&req, ALL), "azure");
    }

    #[test]
    fn test_format_affinity_cirq() {
        let req = request("custom").with_circuit_format(CircuitFormat::Cirq);
        assert_eq!(select_provider(&req, ALL), "google");
    }

    #[test]
    fn test_qiskit_format_does_not_pin() {
        let req = request("custom").with_circuit_format(CircuitFormat::Qiskit);
        assert_eq!(select_provider(&req, ALL), DEFAULT_PROVIDER);
    }

    #[test]
    fn test_algorithm_beats_format() {
        let req = request("vqe").with_circuit_format(CircuitFormat::Qsharp);
        assert_eq!(select_provider(&req, ALL), "ibm");
    }

    #[test]
    fn test_backend_requirement_error_mitigation() {
        let req = request("custom").with_backend_requirement("error_mitigation", json!(true));
        assert_eq!(select_provider(&req, ALL), "ibm");

        let req = request("custom").with_backend_requirement("error_mitigation", json!(false));
        assert_eq!(select_provider(&req, ALL), DEFAULT_PROVIDER);
    }

    #[test]
    fn test_default_provider() {
        assert_eq!(select_provider(&request("maxcut"), ALL), DEFAULT_PROVIDER);
        assert_eq!(select_provider(&request("qaoa"), ALL), DEFAULT_PROVIDER);
    }

    #[test]
    fn test_fallback_providers_never_consulted() {
        let mut req = request("maxcut");
        req.fallback_providers = vec!["azure".to_string(), "google".to_string()];
        assert_eq!(select_provider(&req, ALL), DEFAULT_PROVIDER);
    }
}
