use netops_agent::RegistryError;
use netops_core::execution::TransitionError;
use netops_core::types::{CredentialId, ExecutionId};

/// Errors from orchestrator operations.
///
/// Every variant except `Internal` is a precondition failure raised before an
/// execution id is allocated. Failures past that point are recorded on the
/// execution itself.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The request is malformed.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Resolving the tenant's agent failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),

    /// A referenced credential does not exist for this tenant.
    #[error("Credential not found: {0}")]
    CredentialNotFound(CredentialId),

    /// A referenced credential exists but could not be decrypted.
    #[error("Credential {0} could not be unsealed")]
    CredentialUnreadable(CredentialId),

    #[error("Execution not found: {0}")]
    ExecutionNotFound(ExecutionId),

    #[error("Internal dispatch error: {0}")]
    Internal(String),
}

impl From<TransitionError> for DispatchError {
    fn from(err: TransitionError) -> Self {
        Self::Internal(err.to_string())
    }
}
