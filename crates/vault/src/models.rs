//! Credential record and its outward views.

use netops_core::credential::CredentialKind;
use netops_core::types::{CredentialId, TenantId, Timestamp};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Stored record
// ---------------------------------------------------------------------------

/// A credential as held at rest: secrets exist only as ciphertext + iv.
#[derive(Debug, Clone)]
pub(crate) struct StoredCredential {
    pub id: CredentialId,
    pub tenant_id: TenantId,
    pub name: String,
    pub kind: CredentialKind,
    pub username: String,
    pub description: String,
    pub url: Option<String>,
    /// Hex-encoded AES-256-CBC ciphertext of the serialized secret fields.
    pub encrypted_data: String,
    /// Hex-encoded iv paired with `encrypted_data`.
    pub iv: String,
    pub last_used: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl StoredCredential {
    pub fn summary(&self) -> CredentialSummary {
        CredentialSummary {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind,
            username: self.username.clone(),
            description: self.description.clone(),
            url: self.url.clone(),
            last_used: self.last_used,
            created_at: self.created_at,
            updated_at: self.updated_at,
            encrypted_data: None,
            iv: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Redacted view
// ---------------------------------------------------------------------------

/// Redacted credential returned to the HTTP boundary.
///
/// **Note:** `encrypted_data` / `iv` are populated only on the create
/// response; secret plaintext is never part of this type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialSummary {
    pub id: CredentialId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CredentialKind,
    pub username: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub last_used: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encrypted_data: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iv: Option<String>,
}
