//! Bounded audit journal.
//!
//! [`AuditJournal`] subscribes to the [`EventBus`](crate::bus::EventBus)
//! broadcast channel, logs every received [`AuditEvent`] under the `audit`
//! tracing target, and keeps the most recent events in memory so the API can
//! serve a per-tenant activity feed. It runs as a long-lived background task
//! and shuts down when the bus sender is dropped.

use std::collections::VecDeque;

use netops_core::types::TenantId;
use tokio::sync::{broadcast, RwLock};

use crate::bus::AuditEvent;

/// Default number of events retained across all tenants.
pub const DEFAULT_JOURNAL_CAPACITY: usize = 1000;

/// In-memory tail of the audit stream.
pub struct AuditJournal {
    entries: RwLock<VecDeque<AuditEvent>>,
    capacity: usize,
}

impl AuditJournal {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: RwLock::new(VecDeque::with_capacity(capacity)),
            capacity,
        }
    }

    /// Run the journal loop.
    ///
    /// Consumes the provided `receiver` until the channel is closed (i.e. the
    /// [`EventBus`](crate::bus::EventBus) is dropped).
    pub async fn run(&self, mut receiver: broadcast::Receiver<AuditEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => self.record(event).await,
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(
                        skipped = n,
                        "Audit journal lagged, some events were not recorded"
                    );
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, audit journal shutting down");
                    break;
                }
            }
        }
    }

    /// Log and retain a single event, evicting the oldest when full.
    pub async fn record(&self, event: AuditEvent) {
        tracing::info!(
            target: "audit",
            event_type = %event.event_type,
            tenant_id = %event.tenant_id,
            entity_type = event.entity_type.as_deref().unwrap_or(""),
            entity_id = event.entity_id.as_deref().unwrap_or(""),
            metadata = %event.metadata,
            "Audit event",
        );

        let mut entries = self.entries.write().await;
        if entries.len() == self.capacity {
            entries.pop_front();
        }
        entries.push_back(event);
    }

    /// Most recent events for `tenant`, newest first, at most `limit`.
    pub async fn recent(&self, tenant: &TenantId, limit: usize) -> Vec<AuditEvent> {
        self.entries
            .read()
            .await
            .iter()
            .rev()
            .filter(|e| &e.tenant_id == tenant)
            .take(limit)
            .cloned()
            .collect()
    }
}

impl Default for AuditJournal {
    fn default() -> Self {
        Self::new(DEFAULT_JOURNAL_CAPACITY)
    }
}
