//! Handler for the tenant's recent audit events.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;

use crate::error::AppResult;
use crate::extract::AppQuery;
use crate::middleware::tenant::Tenant;
use crate::response::DataResponse;
use crate::state::AppState;

const DEFAULT_LIMIT: usize = 50;
const MAX_LIMIT: usize = 500;

#[derive(Debug, Deserialize)]
pub struct AuditQuery {
    pub limit: Option<usize>,
}

/// GET /api/v1/audit?limit=N
///
/// Newest first. `limit` defaults to 50 and is capped at 500.
pub async fn list_audit_events(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<AuditQuery>,
) -> AppResult<impl IntoResponse> {
    let limit = query.limit.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT);
    let events = state.journal.recent(&tenant, limit).await;
    Ok(Json(DataResponse { data: events }))
}
