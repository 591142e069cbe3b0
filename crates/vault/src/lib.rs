//! Credential vault: tenant-scoped CRUD over encrypted credential records.
//!
//! Secret fields are sealed with the process-wide [`Cipher`] the moment a
//! record is created or its secrets change; only ciphertext and iv are held
//! at rest. Plaintext leaves the vault solely through
//! [`CredentialVault::reveal`], which the dispatch orchestrator calls right
//! before contacting an agent.
//!
//! [`Cipher`]: netops_core::crypto::Cipher

pub mod error;
pub mod models;
pub mod vault;

pub use error::VaultError;
pub use models::CredentialSummary;
pub use netops_core::credential::RevealedCredential;
pub use vault::CredentialVault;
