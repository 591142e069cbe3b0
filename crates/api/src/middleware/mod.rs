//! Request extractors shared by every `/api/v1` handler.
//!
//! - [`tenant::Tenant`] -- The calling tenant, from the `X-Tenant-Id` header.

pub mod tenant;
