//! Handlers for playbook runs, inventory updates, and execution records.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use netops_core::types::ExecutionId;
use netops_dispatch::{AddDeviceRequest, RunPlaybookRequest, ValidatePlaybookRequest};

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::tenant::Tenant;
use crate::response::DataResponse;
use crate::state::AppState;

/// POST /api/v1/playbooks/run
///
/// Answers 202 with the execution record; the run continues on the agent.
pub async fn run_playbook(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
    AppJson(request): AppJson<RunPlaybookRequest>,
) -> AppResult<impl IntoResponse> {
    let execution = state.orchestrator.run_playbook(&tenant, request).await?;
    Ok((StatusCode::ACCEPTED, Json(DataResponse { data: execution })))
}

/// POST /api/v1/playbooks/validate
pub async fn validate_playbook(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
    AppJson(request): AppJson<ValidatePlaybookRequest>,
) -> AppResult<impl IntoResponse> {
    let execution = state
        .orchestrator
        .validate_playbook(&tenant, request)
        .await?;
    Ok(Json(DataResponse { data: execution }))
}

/// POST /api/v1/inventory/devices
pub async fn add_device(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
    AppJson(request): AppJson<AddDeviceRequest>,
) -> AppResult<impl IntoResponse> {
    let execution = state
        .orchestrator
        .add_to_inventory(&tenant, request)
        .await?;
    Ok(Json(DataResponse { data: execution }))
}

/// GET /api/v1/executions
pub async fn list_executions(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let executions = state.orchestrator.list_executions(&tenant).await;
    Ok(Json(DataResponse { data: executions }))
}

/// GET /api/v1/executions/{id}
pub async fn get_execution(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
    AppPath(id): AppPath<ExecutionId>,
) -> AppResult<impl IntoResponse> {
    let execution = state.orchestrator.get_execution(&tenant, id).await?;
    Ok(Json(DataResponse { data: execution }))
}

/// GET /api/v1/executions/{id}/status
///
/// Asks the agent for the latest state without changing the stored record.
pub async fn get_execution_status(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
    AppPath(id): AppPath<ExecutionId>,
) -> AppResult<impl IntoResponse> {
    let status = state.orchestrator.get_status(&tenant, id).await?;
    Ok(Json(DataResponse { data: status }))
}
