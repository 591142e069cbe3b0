//! Remote execution agents: the transport boundary and the per-tenant
//! registry.
//!
//! - [`AgentTransport`] is the RPC surface an agent exposes;
//!   [`HttpAgentClient`] is the default implementation.
//! - [`AgentRegistry`] owns at most one [`AgentHandle`] per tenant.

pub mod client;
pub mod registry;
pub mod transport;

pub use client::HttpAgentClient;
pub use registry::{
    AgentConnector, AgentEndpoint, AgentHandle, AgentRegistry, HttpConnector, Platform,
    RegistryError,
};
pub use transport::{AgentError, AgentTransport};
