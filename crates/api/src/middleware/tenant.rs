//! Tenant extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use netops_core::error::CoreError;
use netops_core::types::TenantId;

use crate::error::AppError;

/// Header carrying the calling tenant's id.
pub const TENANT_HEADER: &str = "x-tenant-id";

/// The tenant a request acts for, taken from the `X-Tenant-Id` header.
///
/// ```ignore
/// async fn my_handler(Tenant(tenant): Tenant) -> AppResult<Json<()>> {
///     tracing::info!(tenant_id = %tenant, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Tenant(pub TenantId);

impl<S: Send + Sync> FromRequestParts<S> for Tenant {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(TENANT_HEADER)
            .ok_or_else(|| {
                AppError::Core(CoreError::Validation(
                    "Missing X-Tenant-Id header".into(),
                ))
            })?
            .to_str()
            .map_err(|_| {
                AppError::Core(CoreError::Validation(
                    "X-Tenant-Id header must be visible ASCII".into(),
                ))
            })?;

        Ok(Tenant(TenantId::parse(raw)?))
    }
}
