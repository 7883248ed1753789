//! Provider capability contract and error types.

use serde_json::{Map, Value};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future used by the object-safe [`QuantumProvider`] trait.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Errors that can occur while talking to a provider's remote service.
#[derive(Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// HTTP transport failed (connect, timeout, read)
    HttpError(String),
    /// The remote service answered with a non-success status code
    HttpStatus { code: u16, url: String },
    /// Response data did not have the expected shape
    InvalidResponse(String),
    /// Provider-specific error
    ProviderSpecific(String),
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::HttpError(msg) => write!(f, "HTTP error: {}", msg),
            ProviderError::HttpStatus { code, url } => {
                write!(f, "HTTP {} from {}", code, url)
            }
            ProviderError::InvalidResponse(msg) => write!(f, "Invalid response: {}", msg),
            ProviderError::ProviderSpecific(msg) => write!(f, "Provider error: {}", msg),
        }
    }
}

impl std::error::Error for ProviderError {}

/// A provider rejected or failed to accept a job submission.
///
/// Always carries the provider name and the underlying cause; a provider
/// must fail with this rather than hand back a sentinel id.
#[derive(Debug, Error)]
#[error("provider '{provider}' failed to accept job: {source}")]
pub struct SubmissionError {
    /// Name of the provider that refused the submission.
    pub provider: String,
    /// Underlying transport or service failure.
    #[source]
    pub source: ProviderError,
}

impl SubmissionError {
    /// Wraps a provider failure with the provider's identity.
    pub fn new(provider: impl Into<String>, source: ProviderError) -> Self {
        Self {
            provider: provider.into(),
            source,
        }
    }
}

/// Errors from a provider's result capability.
///
/// `NotAvailable` is deliberately distinct from transport failures so that
/// callers can keep polling instead of treating it as fatal.
#[derive(Debug, Error)]
pub enum ResultError {
    /// The job has not reached a terminal successful state yet.
    #[error("result for job '{external_id}' on provider '{provider}' is not available yet")]
    NotAvailable {
        /// Provider that owns the job.
        provider: String,
        /// Provider-assigned job identity.
        external_id: String,
    },

    /// Transport-level failure while fetching the result.
    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// Uniform capability contract every backend integration exposes.
///
/// The orchestrator depends only on this trait, never on concrete provider
/// types. All operations suspend on network I/O and never block the calling
/// thread. Implementations also own a transform from the generic circuit
/// description into their native submission format; that transform is
/// provider-internal and not part of this contract.
///
/// Methods return [`BoxFuture`] so the trait stays object-safe: the
/// orchestrator holds providers as `Arc<dyn QuantumProvider>`.
pub trait QuantumProvider: Send + Sync {
    /// Returns the provider's registry name (e.g. `"ibm"`).
    ///
    /// This is the key used for provider registration and status
    /// normalization, so it must be stable.
    fn name(&self) -> &str;

    /// Submits a job, returning the provider-assigned external id.
    ///
    /// `circuit` is the generic circuit description; `config` is a flat
    /// per-job configuration bag (shots, backend, ...). Fails with
    /// [`SubmissionError`] on any failure, never a sentinel id.
    fn submit<'a>(
        &'a self,
        circuit: &'a Value,
        config: &'a Map<String, Value>,
    ) -> BoxFuture<'a, Result<String, SubmissionError>>;

    /// Fetches the provider's native status payload, uninterpreted.
    fn status<'a>(&'a self, external_id: &'a str) -> BoxFuture<'a, Result<Value, ProviderError>>;

    /// Fetches provider-native result data.
    ///
    /// Fails with [`ResultError::NotAvailable`] if the job has not reached a
    /// terminal successful state, distinct from transport failures.
    fn result<'a>(&'a self, external_id: &'a str) -> BoxFuture<'a, Result<Value, ResultError>>;

    /// Requests cancellation, best-effort.
    ///
    /// Returns whether the provider acknowledged the cancellation. `false`
    /// means "no guarantee, check status"; callers must tolerate it.
    fn cancel<'a>(&'a self, external_id: &'a str) -> BoxFuture<'a, Result<bool, ProviderError>>;
}
