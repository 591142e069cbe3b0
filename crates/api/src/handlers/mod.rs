//! Request handlers for the `/api/v1` tree.
//!
//! Each submodule provides async handler functions for one resource. Every
//! handler takes the calling [`Tenant`](crate::middleware::tenant::Tenant)
//! and maps domain errors via [`AppError`](crate::error::AppError).

pub mod agents;
pub mod audit;
pub mod credentials;
pub mod dispatch;
