//! In-memory credential store with per-record linearization.
//!
//! The outer maps are locked only long enough to find or insert a record
//! slot; reads and writes of the record itself happen under that slot's own
//! mutex, so concurrent operations on different credentials never wait on
//! each other. A deleted record leaves its slot empty (`None`) for anyone
//! still holding it, which they observe as not-found.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use netops_core::credential::{
    validate_description, validate_name, validate_shape, CredentialPayload, CredentialUpdate,
    RevealedCredential, SecretFields,
};
use netops_core::crypto::{Cipher, CryptoError};
use netops_core::types::{CredentialId, TenantId};
use netops_events::{AuditEvent, EventBus};
use serde_json::json;
use tokio::sync::{Mutex, RwLock};

use crate::error::VaultError;
use crate::models::{CredentialSummary, StoredCredential};

type Slot = Arc<Mutex<Option<StoredCredential>>>;

/// Tenant-scoped credential vault.
///
/// Created once at startup; the returned value is shared via `Arc`.
pub struct CredentialVault {
    cipher: Arc<Cipher>,
    events: Arc<EventBus>,
    records: RwLock<HashMap<CredentialId, Slot>>,
    /// Credential ids per tenant, in insertion order.
    by_tenant: RwLock<HashMap<TenantId, Vec<CredentialId>>>,
}

impl CredentialVault {
    pub fn new(cipher: Arc<Cipher>, events: Arc<EventBus>) -> Self {
        Self {
            cipher,
            events,
            records: RwLock::new(HashMap::new()),
            by_tenant: RwLock::new(HashMap::new()),
        }
    }

    /// Validate, seal, and store a new credential.
    ///
    /// Returns the redacted record with `encryptedData` / `iv` populated.
    pub async fn create(
        &self,
        tenant: &TenantId,
        payload: CredentialPayload,
    ) -> Result<CredentialSummary, VaultError> {
        payload.validate()?;

        let id = uuid::Uuid::now_v7();
        let (encrypted_data, iv) = self.seal(&payload.secrets)?;
        let now = Utc::now();

        let record = StoredCredential {
            id,
            tenant_id: tenant.clone(),
            name: payload.name.trim().to_string(),
            kind: payload.kind,
            username: payload.username,
            description: payload.description.unwrap_or_default(),
            url: payload.url,
            encrypted_data,
            iv,
            last_used: None,
            created_at: now,
            updated_at: now,
        };

        let mut summary = record.summary();
        summary.encrypted_data = Some(record.encrypted_data.clone());
        summary.iv = Some(record.iv.clone());

        self.records
            .write()
            .await
            .insert(id, Arc::new(Mutex::new(Some(record))));
        self.by_tenant
            .write()
            .await
            .entry(tenant.clone())
            .or_default()
            .push(id);

        tracing::info!(
            tenant_id = %tenant,
            credential_id = %id,
            kind = %summary.kind,
            "Credential created",
        );
        self.events.publish(
            AuditEvent::new("credential.created", tenant.clone())
                .with_entity("credential", id)
                .with_metadata(json!({ "name": summary.name, "type": summary.kind })),
        );

        Ok(summary)
    }

    /// Redacted view of one credential.
    pub async fn get(
        &self,
        tenant: &TenantId,
        id: CredentialId,
    ) -> Result<CredentialSummary, VaultError> {
        let slot = self.slot(id).await.ok_or(VaultError::NotFound(id))?;
        let guard = slot.lock().await;
        let record = owned_by(guard.as_ref(), tenant, id)?;
        Ok(record.summary())
    }

    /// Decrypt a credential for use by a dispatch.
    ///
    /// Never routed to the HTTP boundary. Refreshes `lastUsed`.
    pub async fn reveal(
        &self,
        tenant: &TenantId,
        id: CredentialId,
    ) -> Result<RevealedCredential, VaultError> {
        let slot = self.slot(id).await.ok_or(VaultError::NotFound(id))?;
        let mut guard = slot.lock().await;
        let record = owned_by_mut(guard.as_mut(), tenant, id)?;

        let secrets = self.open(record)?;
        record.last_used = Some(Utc::now());

        tracing::debug!(tenant_id = %tenant, credential_id = %id, "Credential revealed");

        Ok(RevealedCredential {
            id: record.id,
            name: record.name.clone(),
            kind: record.kind,
            username: record.username.clone(),
            url: record.url.clone(),
            secrets,
        })
    }

    /// Merge a partial update into a credential.
    ///
    /// Non-secret fields are replaced directly. When the partial carries any
    /// secret field, the stored blob is decrypted, merged, re-validated, and
    /// re-sealed under a new iv. Nothing is written unless every check passes.
    pub async fn update(
        &self,
        tenant: &TenantId,
        id: CredentialId,
        changes: CredentialUpdate,
    ) -> Result<CredentialSummary, VaultError> {
        let slot = self.slot(id).await.ok_or(VaultError::NotFound(id))?;
        let mut guard = slot.lock().await;
        let record = owned_by_mut(guard.as_mut(), tenant, id)?;

        if let Some(name) = &changes.name {
            validate_name(name)?;
        }
        if let Some(description) = &changes.description {
            validate_description(description)?;
        }

        let kind = changes.kind.unwrap_or(record.kind);
        let url = changes.url.clone().or_else(|| record.url.clone());
        let secrets_changed = !changes.secrets.is_empty();
        let shape_changed = kind != record.kind || url != record.url;

        let resealed = if secrets_changed || shape_changed {
            let mut secrets = self.open(record)?;
            secrets.merge(changes.secrets);
            validate_shape(kind, url.as_deref(), &secrets)?;
            if secrets_changed {
                Some(self.seal(&secrets)?)
            } else {
                None
            }
        } else {
            None
        };

        let mut changed_fields = Vec::new();
        if let Some(name) = changes.name {
            record.name = name.trim().to_string();
            changed_fields.push("name");
        }
        if let Some(username) = changes.username {
            record.username = username;
            changed_fields.push("username");
        }
        if let Some(description) = changes.description {
            record.description = description;
            changed_fields.push("description");
        }
        if kind != record.kind {
            record.kind = kind;
            changed_fields.push("type");
        }
        if url != record.url {
            record.url = url;
            changed_fields.push("url");
        }
        if let Some((encrypted_data, iv)) = resealed {
            record.encrypted_data = encrypted_data;
            record.iv = iv;
            changed_fields.push("secrets");
        }
        record.updated_at = Utc::now();

        tracing::info!(
            tenant_id = %tenant,
            credential_id = %id,
            fields = ?changed_fields,
            "Credential updated",
        );
        self.events.publish(
            AuditEvent::new("credential.updated", tenant.clone())
                .with_entity("credential", id)
                .with_metadata(json!({ "fields": changed_fields })),
        );

        Ok(record.summary())
    }

    /// Remove a credential. Deleting an absent (or foreign) id is `NotFound`.
    pub async fn delete(&self, tenant: &TenantId, id: CredentialId) -> Result<(), VaultError> {
        let slot = self.slot(id).await.ok_or(VaultError::NotFound(id))?;
        let mut guard = slot.lock().await;
        owned_by(guard.as_ref(), tenant, id)?;

        let removed = guard.take();

        self.records.write().await.remove(&id);
        if let Some(ids) = self.by_tenant.write().await.get_mut(tenant) {
            ids.retain(|existing| *existing != id);
        }

        let name = removed.map(|r| r.name).unwrap_or_default();
        tracing::info!(tenant_id = %tenant, credential_id = %id, "Credential deleted");
        self.events.publish(
            AuditEvent::new("credential.deleted", tenant.clone())
                .with_entity("credential", id)
                .with_metadata(json!({ "name": name })),
        );

        Ok(())
    }

    /// All credentials of `tenant`, redacted, in insertion order.
    pub async fn list(&self, tenant: &TenantId) -> Vec<CredentialSummary> {
        let ids = self
            .by_tenant
            .read()
            .await
            .get(tenant)
            .cloned()
            .unwrap_or_default();

        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            let Some(slot) = self.slot(id).await else {
                continue;
            };
            let guard = slot.lock().await;
            if let Ok(record) = owned_by(guard.as_ref(), tenant, id) {
                out.push(record.summary());
            }
        }
        out
    }

    // ---- private helpers ----

    async fn slot(&self, id: CredentialId) -> Option<Slot> {
        self.records.read().await.get(&id).cloned()
    }

    fn seal(&self, secrets: &SecretFields) -> Result<(String, String), VaultError> {
        let blob = serde_json::to_vec(secrets)
            .map_err(|e| VaultError::Internal(format!("failed to serialize secrets: {e}")))?;
        let sealed = self.cipher.encrypt(&blob);
        Ok((sealed.ciphertext_hex(), sealed.iv_hex()))
    }

    fn open(&self, record: &StoredCredential) -> Result<SecretFields, VaultError> {
        let crypto = |source| VaultError::Crypto {
            id: record.id,
            source,
        };
        let blob = self
            .cipher
            .decrypt_hex(&record.encrypted_data, &record.iv)
            .map_err(crypto)?;
        serde_json::from_slice(&blob)
            .map_err(|e| crypto(CryptoError::MalformedPayload(e.to_string())))
    }
}

/// The record, if it exists and belongs to `tenant`; `NotFound` otherwise.
fn owned_by<'a>(
    record: Option<&'a StoredCredential>,
    tenant: &TenantId,
    id: CredentialId,
) -> Result<&'a StoredCredential, VaultError> {
    record
        .filter(|r| &r.tenant_id == tenant)
        .ok_or(VaultError::NotFound(id))
}

fn owned_by_mut<'a>(
    record: Option<&'a mut StoredCredential>,
    tenant: &TenantId,
    id: CredentialId,
) -> Result<&'a mut StoredCredential, VaultError> {
    record
        .filter(|r| &r.tenant_id == tenant)
        .ok_or(VaultError::NotFound(id))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
