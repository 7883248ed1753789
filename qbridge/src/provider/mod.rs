//! Quantum backend provider abstraction.
//!
//! This module defines the capability contract every backend integration
//! satisfies ([`QuantumProvider`]) and the concrete integrations for IBM
//! Quantum, Google Quantum AI, and Azure Quantum.
//!
//! # Factory Pattern
//!
//! For centralized provider creation, use the [`ProviderFactory`]:
//!
//! ```ignore
//! use qbridge::provider::{ProviderFactory, ProviderSettings, ReqwestClient, IbmConfig};
//!
//! let http_client = ReqwestClient::new()?;
//! let factory = ProviderFactory::new(http_client);
//! let provider = factory.create(&ProviderSettings::Ibm(IbmConfig::new(token)));
//! ```

mod azure;
mod factory;
mod google;
mod http;
mod ibm;
mod types;

pub use azure::{AzureConfig, AzureProvider};
pub use factory::{ProviderFactory, ProviderSettings};
pub use google::{GoogleConfig, GoogleProvider};
pub use http::{HttpClient, ReqwestClient};
pub use ibm::{IbmConfig, IbmProvider};
pub use types::{BoxFuture, ProviderError, QuantumProvider, ResultError, SubmissionError};

#[cfg(test)]
pub use http::tests::MockHttpClient;
