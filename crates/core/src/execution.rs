//! Execution records and their state machine.
//!
//! ```text
//! Submitted ──> Running ──> Completed
//!     │            └──────> Failed
//!     ├──────────────────> Completed   (synchronous operations only)
//!     └──────────────────> Failed
//! ```
//!
//! Terminal records are immutable: every transition method refuses to touch a
//! record in `Completed` or `Failed`.

use serde::{Deserialize, Serialize};

use crate::types::{CredentialId, ExecutionId, TenantId, Timestamp};

/// Maximum length of an error summary message.
pub const MAX_ERROR_MESSAGE_LEN: usize = 512;

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Lifecycle state of an execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExecutionState {
    Submitted,
    Running,
    Completed,
    Failed,
}

impl ExecutionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

/// Which agent operation an execution performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    RunPlaybook,
    ValidatePlaybook,
    AddToInventory,
    GetHealth,
    GetConfig,
}

impl OperationKind {
    /// Agent-native operations acknowledge first and finish later; all
    /// others collapse straight from `Submitted` to a terminal state.
    pub fn is_agent_native(self) -> bool {
        matches!(self, Self::RunPlaybook)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::RunPlaybook => "run_playbook",
            Self::ValidatePlaybook => "validate_playbook",
            Self::AddToInventory => "add_to_inventory",
            Self::GetHealth => "get_health",
            Self::GetConfig => "get_config",
        }
    }
}

/// Category of an execution failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// The call to the agent boundary itself failed (network, decode, 5xx).
    Transport,
    /// No response within the caller-supplied timeout.
    Timeout,
    /// The agent ran the operation and reported failure.
    Agent,
    /// The agent refused the request (4xx).
    Rejected,
}

/// Failure description attached to a `Failed` record. Carries no secrets.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorSummary {
    pub kind: FailureKind,
    pub message: String,
}

impl ErrorSummary {
    /// Build a summary, truncating the message to [`MAX_ERROR_MESSAGE_LEN`]
    /// characters.
    pub fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        let message: String = message.into();
        let message = if message.chars().count() > MAX_ERROR_MESSAGE_LEN {
            let mut cut: String = message.chars().take(MAX_ERROR_MESSAGE_LEN).collect();
            cut.push('…');
            cut
        } else {
            message
        };
        Self { kind, message }
    }
}

/// Attempted a transition the state machine does not allow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("illegal execution transition {from:?} -> {to:?}")]
pub struct TransitionError {
    pub from: ExecutionState,
    pub to: ExecutionState,
}

// ---------------------------------------------------------------------------
// Record
// ---------------------------------------------------------------------------

/// One dispatch call against a tenant's agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutionRecord {
    pub id: ExecutionId,
    pub tenant_id: TenantId,
    pub operation: OperationKind,
    pub state: ExecutionState,
    /// Identifier the agent assigned to the run, once acknowledged.
    pub agent_execution_id: Option<String>,
    /// Credentials revealed for this dispatch, by reference only.
    pub credential_ids: Vec<CredentialId>,
    pub result: Option<serde_json::Value>,
    pub error: Option<ErrorSummary>,
    pub submitted_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl ExecutionRecord {
    /// A fresh record in `Submitted` with a newly allocated id.
    pub fn submitted(
        tenant_id: TenantId,
        operation: OperationKind,
        credential_ids: Vec<CredentialId>,
    ) -> Self {
        Self {
            id: uuid::Uuid::now_v7(),
            tenant_id,
            operation,
            state: ExecutionState::Submitted,
            agent_execution_id: None,
            credential_ids,
            result: None,
            error: None,
            submitted_at: chrono::Utc::now(),
            completed_at: None,
        }
    }

    /// `Submitted -> Running` once the agent acknowledged the request.
    pub fn mark_running(&mut self, agent_execution_id: String) -> Result<(), TransitionError> {
        self.check(ExecutionState::Running)?;
        self.state = ExecutionState::Running;
        self.agent_execution_id = Some(agent_execution_id);
        Ok(())
    }

    /// Move to `Completed` with an optional result payload.
    pub fn complete(&mut self, result: Option<serde_json::Value>) -> Result<(), TransitionError> {
        self.check(ExecutionState::Completed)?;
        self.state = ExecutionState::Completed;
        self.result = result;
        self.completed_at = Some(chrono::Utc::now());
        Ok(())
    }

    /// Move to `Failed` with an error summary.
    pub fn fail(&mut self, error: ErrorSummary) -> Result<(), TransitionError> {
        self.check(ExecutionState::Failed)?;
        self.state = ExecutionState::Failed;
        self.error = Some(error);
        self.completed_at = Some(chrono::Utc::now());
        Ok(())
    }

    fn check(&self, to: ExecutionState) -> Result<(), TransitionError> {
        let allowed = match (self.state, to) {
            (ExecutionState::Submitted, ExecutionState::Running) => {
                self.operation.is_agent_native()
            }
            (ExecutionState::Submitted, ExecutionState::Failed) => true,
            (ExecutionState::Submitted, ExecutionState::Completed) => {
                !self.operation.is_agent_native()
            }
            (ExecutionState::Running, ExecutionState::Completed | ExecutionState::Failed) => true,
            _ => false,
        };
        if allowed {
            Ok(())
        } else {
            Err(TransitionError {
                from: self.state,
                to,
            })
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
