//! Dispatch request payloads and their validation.

use std::time::Duration;

use netops_core::types::CredentialId;
use serde::Deserialize;

use crate::error::DispatchError;

/// Largest playbook accepted for submission or validation.
pub const MAX_PLAYBOOK_LEN: usize = 1024 * 1024;

/// Upper bound on a caller-supplied dispatch timeout.
pub const MAX_TIMEOUT_SECS: u64 = 600;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunPlaybookRequest {
    /// Playbook YAML.
    pub content: String,
    /// Inventory hosts or groups to target.
    #[serde(default)]
    pub devices: Vec<String>,
    /// Credentials to reveal and hand to the agent.
    #[serde(default)]
    pub credential_ids: Vec<CredentialId>,
    #[serde(default)]
    pub extra_vars: Option<serde_json::Value>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl RunPlaybookRequest {
    pub fn validate(&self) -> Result<(), DispatchError> {
        validate_content(&self.content)?;
        if self.devices.iter().any(|d| d.trim().is_empty()) {
            return Err(DispatchError::Validation(
                "Device names must not be blank".to_string(),
            ));
        }
        validate_timeout(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidatePlaybookRequest {
    pub content: String,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl ValidatePlaybookRequest {
    pub fn validate(&self) -> Result<(), DispatchError> {
        validate_content(&self.content)?;
        validate_timeout(self.timeout_secs)
    }
}

/// A device to add to the tenant agent's inventory.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddDeviceRequest {
    pub name: String,
    /// IP address or resolvable hostname.
    pub ip_address: String,
    pub platform: String,
    #[serde(rename = "type")]
    pub device_type: String,
    #[serde(default)]
    pub groups: Vec<String>,
    /// Login the agent should use for the device.
    #[serde(default)]
    pub credential_id: Option<CredentialId>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl AddDeviceRequest {
    pub fn validate(&self) -> Result<(), DispatchError> {
        for (field, value) in [
            ("name", &self.name),
            ("ipAddress", &self.ip_address),
            ("platform", &self.platform),
            ("type", &self.device_type),
        ] {
            if value.trim().is_empty() {
                return Err(DispatchError::Validation(format!(
                    "Device {field} must not be empty"
                )));
            }
        }
        if self.ip_address.chars().any(char::is_whitespace) {
            return Err(DispatchError::Validation(
                "Device ipAddress must not contain whitespace".to_string(),
            ));
        }
        validate_timeout(self.timeout_secs)
    }
}

fn validate_content(content: &str) -> Result<(), DispatchError> {
    if content.trim().is_empty() {
        return Err(DispatchError::Validation(
            "Playbook content must not be empty".to_string(),
        ));
    }
    if content.len() > MAX_PLAYBOOK_LEN {
        return Err(DispatchError::Validation(format!(
            "Playbook content must not exceed {MAX_PLAYBOOK_LEN} bytes"
        )));
    }
    Ok(())
}

/// Accepts `None` or `1..=MAX_TIMEOUT_SECS`.
pub fn validate_timeout(timeout_secs: Option<u64>) -> Result<(), DispatchError> {
    match timeout_secs {
        Some(secs) if secs == 0 || secs > MAX_TIMEOUT_SECS => Err(DispatchError::Validation(
            format!("timeoutSecs must be between 1 and {MAX_TIMEOUT_SECS}"),
        )),
        _ => Ok(()),
    }
}

pub(crate) fn timeout_or(timeout_secs: Option<u64>, default: Duration) -> Duration {
    timeout_secs.map(Duration::from_secs).unwrap_or(default)
}
