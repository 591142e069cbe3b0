//! Handlers for tenant credentials.
//!
//! Secret values are accepted on create and update but never returned. The
//! sealed `encryptedData` / `iv` pair appears only in the create response.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use netops_core::credential::{CredentialPayload, CredentialUpdate};
use netops_core::types::CredentialId;

use crate::error::AppResult;
use crate::extract::{AppJson, AppPath};
use crate::middleware::tenant::Tenant;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/credentials
pub async fn list_credentials(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
) -> AppResult<impl IntoResponse> {
    let credentials = state.vault.list(&tenant).await;
    Ok(Json(DataResponse { data: credentials }))
}

/// POST /api/v1/credentials
pub async fn create_credential(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
    AppJson(payload): AppJson<CredentialPayload>,
) -> AppResult<impl IntoResponse> {
    let created = state.vault.create(&tenant, payload).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: created })))
}

/// GET /api/v1/credentials/{id}
pub async fn get_credential(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
    AppPath(id): AppPath<CredentialId>,
) -> AppResult<impl IntoResponse> {
    let credential = state.vault.get(&tenant, id).await?;
    Ok(Json(DataResponse { data: credential }))
}

/// PUT /api/v1/credentials/{id}
pub async fn update_credential(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
    AppPath(id): AppPath<CredentialId>,
    AppJson(changes): AppJson<CredentialUpdate>,
) -> AppResult<impl IntoResponse> {
    let updated = state.vault.update(&tenant, id, changes).await?;
    Ok(Json(DataResponse { data: updated }))
}

/// DELETE /api/v1/credentials/{id}
pub async fn delete_credential(
    Tenant(tenant): Tenant,
    State(state): State<AppState>,
    AppPath(id): AppPath<CredentialId>,
) -> AppResult<StatusCode> {
    state.vault.delete(&tenant, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
