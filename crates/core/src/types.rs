use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Credential identifiers are UUID v7 (time-ordered).
pub type CredentialId = uuid::Uuid;

/// Execution identifiers are UUID v7, allocated at dispatch time.
pub type ExecutionId = uuid::Uuid;

/// Maximum length of a tenant id.
pub const MAX_TENANT_ID_LEN: usize = 64;

/// Identifier of a tenant (customer organisation).
///
/// Every registry slot, credential, and execution is scoped by one. Only
/// constructed through [`TenantId::parse`], so a value in hand is always
/// well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TenantId(String);

impl TenantId {
    /// Validate and wrap a raw tenant id.
    ///
    /// Rules:
    /// - Must not be empty.
    /// - Must not exceed [`MAX_TENANT_ID_LEN`] characters.
    /// - Must contain only ASCII alphanumeric, hyphen, underscore, or dot characters.
    pub fn parse(raw: &str) -> Result<Self, CoreError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(CoreError::Validation(
                "Tenant id must not be empty".to_string(),
            ));
        }
        if raw.len() > MAX_TENANT_ID_LEN {
            return Err(CoreError::Validation(format!(
                "Tenant id must not exceed {MAX_TENANT_ID_LEN} characters"
            )));
        }
        if !raw
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
        {
            return Err(CoreError::Validation(
                "Tenant id may only contain alphanumeric, hyphen, underscore, or dot characters"
                    .to_string(),
            ));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TenantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for TenantId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TenantId> for String {
    fn from(value: TenantId) -> Self {
        value.0
    }
}
