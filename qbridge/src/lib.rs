//! QBridge - Quantum job gateway
//!
//! This library routes quantum computational jobs to heterogeneous cloud
//! providers (IBM Quantum, Google Quantum AI, Azure Quantum), tracks each
//! job under a single internal identity, and presents a unified view of
//! job state regardless of which provider runs the work.
//!
//! # High-Level API
//!
//! For most use cases, the [`gateway`] module provides a facade:
//!
//! ```ignore
//! use qbridge::gateway::{GatewayConfig, QuantumGateway};
//! use qbridge::job::JobRequest;
//! use serde_json::json;
//!
//! let gateway = QuantumGateway::new(GatewayConfig::from_env())?;
//!
//! let circuit = json!({ "gates": [{ "type": "h", "qubit": 0 }], "num_qubits": 1 });
//! let id = gateway.submit(JobRequest::new("vqe", circuit)).await?;
//!
//! let view = gateway.job_status(&id).await?;
//! println!("{}: {}", id, view.status);
//! ```
//!
//! Lower layers are usable on their own: [`orchestrator`] for capability
//! dispatch over registered providers, [`provider`] for the backend
//! contract and concrete integrations, [`status`] for normalization, and
//! [`registry`] for the binding store.

pub mod gateway;
pub mod job;
pub mod logging;
pub mod monitoring;
pub mod orchestrator;
pub mod provider;
pub mod registry;
pub mod selection;
pub mod status;

/// Version of the QBridge library and CLI.
///
/// Synchronized across all components in the workspace; defined in
/// `Cargo.toml` and injected at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
