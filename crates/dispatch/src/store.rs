//! In-memory execution records, scoped by tenant.

use std::collections::HashMap;

use netops_core::execution::{ExecutionRecord, TransitionError};
use netops_core::types::{ExecutionId, TenantId};
use tokio::sync::RwLock;

use crate::error::DispatchError;

#[derive(Default)]
struct Inner {
    records: HashMap<ExecutionId, ExecutionRecord>,
    /// Execution ids per tenant, in submission order.
    by_tenant: HashMap<TenantId, Vec<ExecutionId>>,
}

/// Owner of every [`ExecutionRecord`]. The lock is never held across an
/// agent call.
#[derive(Default)]
pub struct ExecutionStore {
    inner: RwLock<Inner>,
}

impl ExecutionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, record: ExecutionRecord) {
        let mut inner = self.inner.write().await;
        inner
            .by_tenant
            .entry(record.tenant_id.clone())
            .or_default()
            .push(record.id);
        inner.records.insert(record.id, record);
    }

    /// The tenant's record, or `None` when absent or owned by another tenant.
    pub async fn get(&self, tenant: &TenantId, id: ExecutionId) -> Option<ExecutionRecord> {
        self.inner
            .read()
            .await
            .records
            .get(&id)
            .filter(|r| &r.tenant_id == tenant)
            .cloned()
    }

    /// All records of `tenant`, oldest first.
    pub async fn list(&self, tenant: &TenantId) -> Vec<ExecutionRecord> {
        let inner = self.inner.read().await;
        inner
            .by_tenant
            .get(tenant)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| inner.records.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Apply a state transition. The stored record is replaced only when
    /// the transition succeeds.
    pub async fn transition<F>(
        &self,
        id: ExecutionId,
        apply: F,
    ) -> Result<ExecutionRecord, DispatchError>
    where
        F: FnOnce(&mut ExecutionRecord) -> Result<(), TransitionError>,
    {
        let mut inner = self.inner.write().await;
        let stored = inner
            .records
            .get_mut(&id)
            .ok_or(DispatchError::ExecutionNotFound(id))?;
        let mut next = stored.clone();
        apply(&mut next)?;
        *stored = next.clone();
        Ok(next)
    }
}
