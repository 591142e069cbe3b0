use netops_core::crypto::CryptoError;
use netops_core::error::CoreError;
use netops_core::types::CredentialId;

/// Errors from vault operations.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// The payload failed shape validation. Caller must fix and retry.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// No record with this id exists for the calling tenant. Records owned by
    /// another tenant report this too.
    #[error("Credential not found: {0}")]
    NotFound(CredentialId),

    /// The stored ciphertext could not be decrypted. Not retryable.
    #[error("Credential {id} is unreadable: {source}")]
    Crypto {
        id: CredentialId,
        #[source]
        source: CryptoError,
    },

    /// Serializing the secret blob failed.
    #[error("Internal vault error: {0}")]
    Internal(String),
}

impl From<CoreError> for VaultError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => Self::Validation(msg),
            other => Self::Internal(other.to_string()),
        }
    }
}
