//! netops audit event bus.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`.
//! - [`AuditEvent`]: the audit envelope emitted by the vault and registry.
//! - [`AuditJournal`]: background subscriber that logs every event under the
//!   `audit` tracing target and keeps a bounded in-memory tail for queries.

pub mod bus;
pub mod journal;

pub use bus::{AuditEvent, EventBus};
pub use journal::AuditJournal;
