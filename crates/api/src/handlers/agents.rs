//! Handlers for the calling tenant's agent registration and agent queries.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use netops_agent::{AgentEndpoint, AgentHandle, Platform};
use netops_core::types::{TenantId, Timestamp};
use serde::{Deserialize, Serialize};

use crate::error::AppResult;
use crate::extract::{AppJson, AppQuery};
use crate::middleware::tenant::Tenant;
use crate::response::DataResponse;
use crate::state::AppState;

/// Public view of a registration. Never includes the agent token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentView {
    pub tenant_id: TenantId,
    pub url: String,
    pub platform: Platform,
    pub version: Option<String>,
    pub registered_at: Timestamp,
}

impl From<AgentHandle> for AgentView {
    fn from(handle: AgentHandle) -> Self {
        Self {
            tenant_id: handle.tenant_id,
            url: handle.endpoint.url,
            platform: handle.endpoint.platform,
            version: handle.endpoint.version,
            registered_at: handle.registered_at,
        }
    }
}

/// Optional per-call deadline for agent queries.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeoutQuery {
    pub timeout_secs: Option<u64>,
}

/// GET /api/v1/agent
pub async fn get_agent(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let handle = state.registry.resolve(&tenant).await?;
    Ok(Json(DataResponse {
        data: AgentView::from(handle),
    }))
}

/// PUT /api/v1/agent
///
/// Registers the tenant's agent, replacing any previous registration.
pub async fn register_agent(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
    AppJson(endpoint): AppJson<AgentEndpoint>,
) -> AppResult<impl IntoResponse> {
    let handle = state.registry.register(&tenant, endpoint).await?;
    Ok(Json(DataResponse {
        data: AgentView::from(handle),
    }))
}

/// DELETE /api/v1/agent
///
/// Idempotent: answers 204 whether or not an agent was registered.
pub async fn remove_agent(Tenant(tenant): Tenant, State(state): State<AppState>) -> StatusCode {
    state.registry.remove(&tenant).await;
    StatusCode::NO_CONTENT
}

/// GET /api/v1/agent/health
pub async fn agent_health(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TimeoutQuery>,
) -> AppResult<impl IntoResponse> {
    let execution = state
        .orchestrator
        .get_health(&tenant, query.timeout_secs)
        .await?;
    Ok(Json(DataResponse { data: execution }))
}

/// GET /api/v1/agent/config
pub async fn agent_config(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
    AppQuery(query): AppQuery<TimeoutQuery>,
) -> AppResult<impl IntoResponse> {
    let execution = state
        .orchestrator
        .get_config(&tenant, query.timeout_secs)
        .await?;
    Ok(Json(DataResponse { data: execution }))
}
