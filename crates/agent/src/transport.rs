//! The remote-agent boundary.
//!
//! [`AgentTransport`] is the opaque RPC surface a tenant's execution agent
//! exposes. The registry stores one transport per tenant; the dispatch
//! orchestrator is its only caller. [`HttpAgentClient`](crate::client::HttpAgentClient)
//! is the default implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use netops_core::credential::RevealedCredential;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors from a call across the agent boundary.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("Agent request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The agent answered with a non-2xx status code.
    #[error("Agent API error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The agent's response could not be interpreted.
    #[error("Unexpected agent response: {0}")]
    Decode(String),

    /// The agent could not be reached at all.
    #[error("Agent unavailable: {0}")]
    Unavailable(String),
}

impl AgentError {
    /// `true` for a 4xx answer: the agent understood and refused the request.
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Api { status, .. } if (400..500).contains(status))
    }

    /// `true` when the underlying HTTP client gave up waiting.
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Request(e) if e.is_timeout())
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// A playbook run handed to the agent.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybookSubmission {
    /// Our execution id, so agent logs can be correlated.
    pub execution_id: String,
    /// Playbook YAML.
    pub content: String,
    /// Inventory hosts or groups to target.
    pub devices: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extra_vars: Option<serde_json::Value>,
    /// Revealed credentials the run needs.
    pub credentials: Vec<RevealedCredential>,
}

/// A device to add to the agent's inventory.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryDevice {
    pub name: String,
    pub ip_address: String,
    pub platform: String,
    #[serde(rename = "type")]
    pub device_type: String,
    pub groups: Vec<String>,
    /// Login the agent should use for this device.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<RevealedCredential>,
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

/// Acknowledgement of a playbook submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybookAccepted {
    /// Identifier the agent assigned to the run.
    pub execution_id: String,
}

/// Result of a playbook syntax check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub valid: bool,
    #[serde(default)]
    pub errors: Vec<String>,
}

/// Run state as reported by the agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentRunState {
    Running,
    Completed,
    Failed,
}

/// Progress of a playbook run on the agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentRunStatus {
    pub status: AgentRunState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgentHealthState {
    Healthy,
    Unhealthy,
}

/// Agent liveness report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentHealth {
    pub status: AgentHealthState,
    pub version: String,
    #[serde(default)]
    pub last_seen: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnsibleCollection {
    pub name: String,
    pub version: String,
}

/// Tooling installed on the agent host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentConfig {
    pub ansible_version: String,
    #[serde(default)]
    pub collections: Vec<AnsibleCollection>,
    #[serde(default)]
    pub supported_platforms: Vec<String>,
}

// ---------------------------------------------------------------------------
// Trait
// ---------------------------------------------------------------------------

/// Operations a tenant's execution agent supports.
#[async_trait]
pub trait AgentTransport: Send + Sync {
    /// Queue a playbook run. Returns once the agent has acknowledged it.
    async fn execute_playbook(
        &self,
        submission: &PlaybookSubmission,
    ) -> Result<PlaybookAccepted, AgentError>;

    /// Syntax-check playbook content without running it.
    async fn validate_playbook(&self, content: &str) -> Result<ValidationReport, AgentError>;

    async fn add_device_to_inventory(&self, device: &InventoryDevice) -> Result<(), AgentError>;

    /// Current status of a run previously acknowledged by
    /// [`execute_playbook`](Self::execute_playbook).
    async fn get_playbook_status(
        &self,
        agent_execution_id: &str,
    ) -> Result<AgentRunStatus, AgentError>;

    async fn get_health(&self) -> Result<AgentHealth, AgentError>;

    async fn get_config(&self) -> Result<AgentConfig, AgentError>;
}
