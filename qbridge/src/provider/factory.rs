//! Provider factory for centralized provider creation.
//!
//! The factory turns declarative [`ProviderSettings`] into
//! `Arc<dyn QuantumProvider>` trait objects, so callers that wire up the
//! gateway never name concrete provider types. New providers are added as
//! new settings variants without touching existing call sites.

use super::azure::{AzureConfig, AzureProvider};
use super::google::{GoogleConfig, GoogleProvider};
use super::http::ReqwestClient;
use super::ibm::{IbmConfig, IbmProvider};
use super::types::QuantumProvider;
use std::sync::Arc;

/// Declarative settings for creating a provider.
#[derive(Clone, Debug)]
pub enum ProviderSettings {
    /// IBM Quantum (qobj submission, hub/group/project routing).
    Ibm(IbmConfig),
    /// Google Quantum AI (cirq programs, client-named).
    Google(GoogleConfig),
    /// Azure Quantum (Q# jobs under a workspace).
    Azure(AzureConfig),
}

impl ProviderSettings {
    /// Returns the registry name this provider is registered under.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Ibm(_) => "ibm",
            Self::Google(_) => "google",
            Self::Azure(_) => "azure",
        }
    }
}

/// Factory for creating provider instances.
///
/// Holds one shared HTTP client; every created provider clones it (reqwest
/// clients share their connection pool, so clones are cheap).
pub struct ProviderFactory {
    http_client: ReqwestClient,
}

impl ProviderFactory {
    /// Creates a new factory with the given HTTP client.
    pub fn new(http_client: ReqwestClient) -> Self {
        Self { http_client }
    }

    /// Creates a provider from the given settings.
    pub fn create(&self, settings: &ProviderSettings) -> Arc<dyn QuantumProvider> {
        match settings {
            ProviderSettings::Ibm(config) => {
                Arc::new(IbmProvider::new(self.http_client.clone(), config.clone()))
            }
            ProviderSettings::Google(config) => {
                Arc::new(GoogleProvider::new(self.http_client.clone(), config.clone()))
            }
            ProviderSettings::Azure(config) => {
                Arc::new(AzureProvider::new(self.http_client.clone(), config.clone()))
            }
        }
    }
}
