//! Domain building blocks shared by every netops crate.
//!
//! Holds no I/O: tenant and id types, the credential payload model and its
//! validation rules, the AES-256-CBC sealing primitive, and the execution
//! state machine. Lives in `core` so the vault, agent, and dispatch crates
//! can depend on it without depending on each other.

pub mod credential;
pub mod crypto;
pub mod error;
pub mod execution;
pub mod types;
