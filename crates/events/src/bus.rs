//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the central publish/subscribe hub for [`AuditEvent`]s.
//! It is designed to be shared via `Arc<EventBus>` across the application.

use chrono::{DateTime, Utc};
use netops_core::types::TenantId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// AuditEvent
// ---------------------------------------------------------------------------

/// An auditable change in the vault or registry.
///
/// Constructed via [`AuditEvent::new`] and enriched with
/// [`with_entity`](AuditEvent::with_entity) and
/// [`with_metadata`](AuditEvent::with_metadata). Metadata must never carry
/// secret plaintext or ciphertext.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditEvent {
    /// Dot-separated event name, e.g. `"credential.created"`.
    pub event_type: String,

    /// Tenant the change belongs to.
    pub tenant_id: TenantId,

    /// Optional entity kind (e.g. `"credential"`, `"agent"`).
    pub entity_type: Option<String>,

    /// Optional entity id.
    pub entity_id: Option<String>,

    /// Free-form JSON metadata carrying event-specific data.
    pub metadata: serde_json::Value,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl AuditEvent {
    /// Create a new event with only the required fields.
    pub fn new(event_type: impl Into<String>, tenant_id: TenantId) -> Self {
        Self {
            event_type: event_type.into(),
            tenant_id,
            entity_type: None,
            entity_id: None,
            metadata: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    /// Attach the affected entity to the event.
    pub fn with_entity(mut self, entity_type: impl Into<String>, entity_id: impl ToString) -> Self {
        self.entity_type = Some(entity_type.into());
        self.entity_id = Some(entity_id.to_string());
        self
    }

    /// Set the JSON metadata for the event.
    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus.
///
/// Wraps a [`broadcast::Sender`] so that any number of subscribers can
/// independently receive every published [`AuditEvent`].
pub struct EventBus {
    sender: broadcast::Sender<AuditEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full, the oldest un-consumed messages are dropped
    /// and slow receivers will observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// If there are no active subscribers the event is silently dropped.
    pub fn publish(&self, event: AuditEvent) {
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published on this bus.
    pub fn subscribe(&self) -> broadcast::Receiver<AuditEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
