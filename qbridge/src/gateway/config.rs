//! Gateway configuration.

use crate::provider::{AzureConfig, GoogleConfig, IbmConfig};

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Configuration for building a [`QuantumGateway`](super::QuantumGateway).
///
/// Each provider is enabled by supplying its settings; `None` leaves that
/// provider unregistered. Credentials are read from configuration and
/// forwarded verbatim; acquiring or refreshing them is out of scope.
#[derive(Clone, Debug, Default)]
pub struct GatewayConfig {
    /// IBM Quantum settings, if the provider should be registered.
    pub ibm: Option<IbmConfig>,
    /// Google Quantum AI settings, if the provider should be registered.
    pub google: Option<GoogleConfig>,
    /// Azure Quantum settings, if the provider should be registered.
    pub azure: Option<AzureConfig>,
}

impl GatewayConfig {
    /// Builds a configuration from environment variables, registering all
    /// three providers with demo defaults for anything unset.
    ///
    /// Variables: `IBM_QUANTUM_TOKEN`, `GOOGLE_CLOUD_PROJECT`,
    /// `GOOGLE_SERVICE_ACCOUNT_KEY`, `AZURE_SUBSCRIPTION_ID`,
    /// `AZURE_RESOURCE_GROUP`, `AZURE_WORKSPACE_NAME`, `AZURE_ACCESS_TOKEN`.
    pub fn from_env() -> Self {
        Self {
            ibm: Some(IbmConfig::new(env_or("IBM_QUANTUM_TOKEN", "demo_token"))),
            google: Some(GoogleConfig::new(
                env_or("GOOGLE_CLOUD_PROJECT", "demo-project"),
                env_or("GOOGLE_SERVICE_ACCOUNT_KEY", "demo_key"),
            )),
            azure: Some(AzureConfig::new(
                env_or("AZURE_SUBSCRIPTION_ID", "demo-sub"),
                env_or("AZURE_RESOURCE_GROUP", "quantum-rg"),
                env_or("AZURE_WORKSPACE_NAME", "quantum-ws"),
                env_or("AZURE_ACCESS_TOKEN", "demo_token"),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registers_nothing() {
        let config = GatewayConfig::default();
        assert!(config.ibm.is_none());
        assert!(config.google.is_none());
        assert!(config.azure.is_none());
    }

    #[test]
    fn test_from_env_registers_all_providers() {
        let config = GatewayConfig::from_env();
        assert!(config.ibm.is_some());
        assert!(config.google.is_some());
        assert!(config.azure.is_some());
    }

    #[test]
    fn test_ibm_defaults() {
        let ibm = GatewayConfig::from_env().ibm.unwrap();
        assert_eq!(ibm.hub, "ibm-q");
        assert_eq!(ibm.group, "open");
        assert_eq!(ibm.project, "main");
    }
}
