//! Dispatch orchestration.
//!
//! [`Orchestrator`] turns a tenant's request into an agent call: resolve the
//! agent, reveal referenced credentials, record the execution, call under a
//! deadline, and (for playbook runs) keep polling until the agent reports a
//! result.

pub mod error;
pub mod orchestrator;
mod redact;
pub mod requests;
pub mod store;
mod watcher;

pub use error::DispatchError;
pub use orchestrator::{DispatchConfig, ExecutionStatus, Orchestrator};
pub use requests::{AddDeviceRequest, RunPlaybookRequest, ValidatePlaybookRequest};
