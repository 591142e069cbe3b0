//! Per-tenant agent registry.
//!
//! [`AgentRegistry`] maps each tenant to at most one [`AgentHandle`]. The
//! outer map is locked only to fetch or create a tenant's slot; every
//! register/resolve/remove for that tenant then runs under the slot's own
//! lock, so tenants never contend with each other. Removal empties the slot
//! instead of deleting it, so a concurrent register cannot land in an
//! orphaned slot.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::Utc;
use netops_core::types::{TenantId, Timestamp};
use netops_events::{AuditEvent, EventBus};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::sync::RwLock;

use crate::client::HttpAgentClient;
use crate::transport::AgentTransport;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// No agent is registered for the tenant.
    #[error("No agent registered for tenant {0}")]
    NotRegistered(TenantId),

    /// The endpoint registration is malformed.
    #[error("Invalid agent endpoint: {0}")]
    InvalidEndpoint(String),
}

// ---------------------------------------------------------------------------
// Endpoint / handle
// ---------------------------------------------------------------------------

/// Host operating system of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Windows,
    Linux,
    Mac,
}

/// Registration details for a tenant's agent.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentEndpoint {
    /// Base URL of the agent's API.
    pub url: String,
    pub platform: Platform,
    #[serde(default)]
    pub version: Option<String>,
    /// Bearer token presented to the agent. Accepted on input, never echoed.
    #[serde(default, skip_serializing)]
    pub token: Option<String>,
}

impl AgentEndpoint {
    pub fn validate(&self) -> Result<(), RegistryError> {
        let url = self.url.trim();
        if url.is_empty() {
            return Err(RegistryError::InvalidEndpoint(
                "Agent url must not be empty".to_string(),
            ));
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(RegistryError::InvalidEndpoint(
                "Agent url must start with http:// or https://".to_string(),
            ));
        }
        if self.token.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(RegistryError::InvalidEndpoint(
                "Agent token must not be blank".to_string(),
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for AgentEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentEndpoint")
            .field("url", &self.url)
            .field("platform", &self.platform)
            .field("version", &self.version)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// A tenant's registered agent: endpoint metadata plus the live transport.
#[derive(Clone)]
pub struct AgentHandle {
    pub tenant_id: TenantId,
    pub endpoint: AgentEndpoint,
    pub registered_at: Timestamp,
    pub transport: Arc<dyn AgentTransport>,
}

impl fmt::Debug for AgentHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentHandle")
            .field("tenant_id", &self.tenant_id)
            .field("endpoint", &self.endpoint)
            .field("registered_at", &self.registered_at)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Connector
// ---------------------------------------------------------------------------

/// Builds the transport for a newly registered endpoint.
pub trait AgentConnector: Send + Sync {
    fn connect(&self, endpoint: &AgentEndpoint) -> Arc<dyn AgentTransport>;
}

/// Connects over HTTP, sharing one connection pool across all agents.
#[derive(Default)]
pub struct HttpConnector {
    client: reqwest::Client,
}

impl HttpConnector {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

impl AgentConnector for HttpConnector {
    fn connect(&self, endpoint: &AgentEndpoint) -> Arc<dyn AgentTransport> {
        Arc::new(HttpAgentClient::with_client(
            self.client.clone(),
            &endpoint.url,
            endpoint.token.clone(),
        ))
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

type Slot = Arc<RwLock<Option<AgentHandle>>>;

/// Tenant -> agent ownership table.
///
/// Created once at startup; shared via `Arc`.
pub struct AgentRegistry {
    slots: RwLock<HashMap<TenantId, Slot>>,
    connector: Arc<dyn AgentConnector>,
    events: Arc<EventBus>,
}

impl AgentRegistry {
    pub fn new(connector: Arc<dyn AgentConnector>, events: Arc<EventBus>) -> Self {
        Self {
            slots: RwLock::new(HashMap::new()),
            connector,
            events,
        }
    }

    /// Register (or replace) the tenant's agent, connecting through the
    /// registry's [`AgentConnector`].
    pub async fn register(
        &self,
        tenant: &TenantId,
        endpoint: AgentEndpoint,
    ) -> Result<AgentHandle, RegistryError> {
        endpoint.validate()?;
        let transport = self.connector.connect(&endpoint);
        self.install(tenant, endpoint, transport).await
    }

    /// Register (or replace) the tenant's agent with an explicit transport.
    pub async fn register_with_transport(
        &self,
        tenant: &TenantId,
        endpoint: AgentEndpoint,
        transport: Arc<dyn AgentTransport>,
    ) -> Result<AgentHandle, RegistryError> {
        endpoint.validate()?;
        self.install(tenant, endpoint, transport).await
    }

    /// The tenant's current handle.
    pub async fn resolve(&self, tenant: &TenantId) -> Result<AgentHandle, RegistryError> {
        let slot = self
            .existing_slot(tenant)
            .await
            .ok_or_else(|| RegistryError::NotRegistered(tenant.clone()))?;
        let guard = slot.read().await;
        guard
            .clone()
            .ok_or_else(|| RegistryError::NotRegistered(tenant.clone()))
    }

    /// Drop the tenant's agent. Returns whether one was registered.
    pub async fn remove(&self, tenant: &TenantId) -> bool {
        let removed = {
            let mut slots = self.slots.write().await;
            let Some(slot) = slots.get(tenant).cloned() else {
                return false;
            };
            let removed = slot.write().await.take();
            // Only the map and `slot` hold it, so no register is about to
            // write into it and the entry can go.
            if Arc::strong_count(&slot) == 2 {
                slots.remove(tenant);
            }
            removed
        };
        let Some(handle) = removed else {
            return false;
        };

        tracing::info!(tenant_id = %tenant, url = %handle.endpoint.url, "Agent removed");
        self.events.publish(
            AuditEvent::new("agent.removed", tenant.clone())
                .with_entity("agent", tenant)
                .with_metadata(json!({ "url": handle.endpoint.url })),
        );
        true
    }

    pub async fn has(&self, tenant: &TenantId) -> bool {
        match self.existing_slot(tenant).await {
            Some(slot) => slot.read().await.is_some(),
            None => false,
        }
    }

    /// Tenants with a registered agent, sorted.
    pub async fn tenants(&self) -> Vec<TenantId> {
        let slots: Vec<(TenantId, Slot)> = self
            .slots
            .read()
            .await
            .iter()
            .map(|(tenant, slot)| (tenant.clone(), Arc::clone(slot)))
            .collect();

        let mut out = Vec::with_capacity(slots.len());
        for (tenant, slot) in slots {
            if slot.read().await.is_some() {
                out.push(tenant);
            }
        }
        out.sort();
        out
    }

    // ---- private helpers ----

    async fn existing_slot(&self, tenant: &TenantId) -> Option<Slot> {
        self.slots.read().await.get(tenant).cloned()
    }

    async fn slot(&self, tenant: &TenantId) -> Slot {
        if let Some(slot) = self.existing_slot(tenant).await {
            return slot;
        }
        Arc::clone(self.slots.write().await.entry(tenant.clone()).or_default())
    }

    async fn install(
        &self,
        tenant: &TenantId,
        endpoint: AgentEndpoint,
        transport: Arc<dyn AgentTransport>,
    ) -> Result<AgentHandle, RegistryError> {
        let handle = AgentHandle {
            tenant_id: tenant.clone(),
            endpoint,
            registered_at: Utc::now(),
            transport,
        };

        let slot = self.slot(tenant).await;
        let replaced = slot.write().await.replace(handle.clone()).is_some();

        tracing::info!(
            tenant_id = %tenant,
            url = %handle.endpoint.url,
            platform = ?handle.endpoint.platform,
            replaced,
            "Agent registered",
        );
        self.events.publish(
            AuditEvent::new("agent.registered", tenant.clone())
                .with_entity("agent", tenant)
                .with_metadata(json!({
                    "url": handle.endpoint.url,
                    "platform": handle.endpoint.platform,
                    "version": handle.endpoint.version,
                    "replaced": replaced,
                })),
        );

        Ok(handle)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
