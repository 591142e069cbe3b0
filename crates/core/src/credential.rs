//! Credential payload model and shape validation.
//!
//! Secret values travel only inside [`SecretFields`], whose `Debug` output
//! names the populated fields but never their contents. The vault serializes
//! the whole struct to one JSON blob before sealing it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::CredentialId;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Maximum length of a credential name.
pub const MAX_NAME_LEN: usize = 128;

/// Maximum length of a credential description.
pub const MAX_DESCRIPTION_LEN: usize = 1024;

/// Maximum length of a single secret value (private keys included).
pub const MAX_SECRET_LEN: usize = 64 * 1024;

// ---------------------------------------------------------------------------
// Kind
// ---------------------------------------------------------------------------

/// What a credential authenticates against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialKind {
    /// SSH login; requires a private key.
    Ssh,
    /// Network device login; requires a password.
    Network,
    /// Cloud provider API; requires an access/secret key pair.
    Cloud,
    /// Secrets-manager token; requires a token and the manager's url.
    #[serde(alias = "vault-token")]
    Vault,
}

impl CredentialKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ssh => "ssh",
            Self::Network => "network",
            Self::Cloud => "cloud",
            Self::Vault => "vault",
        }
    }
}

impl fmt::Display for CredentialKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Secret fields
// ---------------------------------------------------------------------------

/// The secret half of a credential. Never persisted in plaintext.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub private_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub passphrase: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl SecretFields {
    /// `true` when no secret field is set.
    pub fn is_empty(&self) -> bool {
        self.present_fields().is_empty()
    }

    /// Names of the populated fields, in declaration order.
    pub fn present_fields(&self) -> Vec<&'static str> {
        [
            ("password", &self.password),
            ("privateKey", &self.private_key),
            ("passphrase", &self.passphrase),
            ("accessKey", &self.access_key),
            ("secretKey", &self.secret_key),
            ("token", &self.token),
        ]
        .into_iter()
        .filter(|(_, v)| v.is_some())
        .map(|(name, _)| name)
        .collect()
    }

    /// Overwrite every field that is set in `changes`; leave the rest.
    pub fn merge(&mut self, changes: SecretFields) {
        if changes.password.is_some() {
            self.password = changes.password;
        }
        if changes.private_key.is_some() {
            self.private_key = changes.private_key;
        }
        if changes.passphrase.is_some() {
            self.passphrase = changes.passphrase;
        }
        if changes.access_key.is_some() {
            self.access_key = changes.access_key;
        }
        if changes.secret_key.is_some() {
            self.secret_key = changes.secret_key;
        }
        if changes.token.is_some() {
            self.token = changes.token;
        }
    }

    /// `(field name, value)` for every populated field.
    pub fn values(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("password", self.password.as_deref()),
            ("privateKey", self.private_key.as_deref()),
            ("passphrase", self.passphrase.as_deref()),
            ("accessKey", self.access_key.as_deref()),
            ("secretKey", self.secret_key.as_deref()),
            ("token", self.token.as_deref()),
        ]
        .into_iter()
        .filter_map(|(name, v)| v.map(|v| (name, v)))
    }
}

impl fmt::Debug for SecretFields {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretFields")
            .field("present", &self.present_fields())
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

/// Input for creating a credential.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialPayload {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CredentialKind,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Address of the secrets manager (required for `vault` credentials).
    #[serde(default)]
    pub url: Option<String>,
    #[serde(flatten)]
    pub secrets: SecretFields,
}

impl CredentialPayload {
    /// Validate the payload shape against its declared kind.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_name(&self.name)?;
        if let Some(description) = &self.description {
            validate_description(description)?;
        }
        validate_shape(self.kind, self.url.as_deref(), &self.secrets)
    }
}

/// Partial update of a credential. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<CredentialKind>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(flatten)]
    pub secrets: SecretFields,
}

/// Decrypted credential, handed to an agent inside a dispatch payload.
///
/// Serializes with its secrets; `Debug` stays redacted through
/// [`SecretFields`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevealedCredential {
    pub id: CredentialId,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: CredentialKind,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(flatten)]
    pub secrets: SecretFields,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a credential name.
///
/// Rules:
/// - Must not be blank.
/// - Must not exceed [`MAX_NAME_LEN`] characters.
pub fn validate_name(name: &str) -> Result<(), CoreError> {
    if name.trim().is_empty() {
        return Err(CoreError::Validation(
            "Credential name must not be empty".to_string(),
        ));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(CoreError::Validation(format!(
            "Credential name must not exceed {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a credential description length.
pub fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Credential description must not exceed {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate that `secrets` (and `url`) carry what `kind` requires.
///
/// - `ssh` requires `privateKey`.
/// - `network` requires `password`.
/// - `cloud` requires `accessKey` and `secretKey`.
/// - `vault` requires `token` and an http(s) `url`.
///
/// Every populated secret must be non-blank and within [`MAX_SECRET_LEN`].
pub fn validate_shape(
    kind: CredentialKind,
    url: Option<&str>,
    secrets: &SecretFields,
) -> Result<(), CoreError> {
    for (field, value) in secrets.values() {
        if value.trim().is_empty() {
            return Err(CoreError::Validation(format!("{field} must not be blank")));
        }
        if value.len() > MAX_SECRET_LEN {
            return Err(CoreError::Validation(format!(
                "{field} must not exceed {MAX_SECRET_LEN} bytes"
            )));
        }
    }

    let missing = |field: &str| {
        CoreError::Validation(format!("{kind} credentials require {field}"))
    };

    match kind {
        CredentialKind::Ssh => {
            secrets.private_key.as_ref().ok_or_else(|| missing("privateKey"))?;
        }
        CredentialKind::Network => {
            secrets.password.as_ref().ok_or_else(|| missing("password"))?;
        }
        CredentialKind::Cloud => {
            secrets.access_key.as_ref().ok_or_else(|| missing("accessKey"))?;
            secrets.secret_key.as_ref().ok_or_else(|| missing("secretKey"))?;
        }
        CredentialKind::Vault => {
            secrets.token.as_ref().ok_or_else(|| missing("token"))?;
            let url = url.filter(|u| !u.trim().is_empty()).ok_or_else(|| missing("url"))?;
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(CoreError::Validation(
                    "vault url must start with http:// or https://".to_string(),
                ));
            }
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
