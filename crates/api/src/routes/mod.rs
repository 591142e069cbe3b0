pub mod agents;
pub mod audit;
pub mod credentials;
pub mod dispatch;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Every route requires the `X-Tenant-Id` header.
///
/// ```text
/// /credentials                      list, create
/// /credentials/{id}                 get, update, delete
///
/// /agent                            get, register/replace (PUT), remove
/// /agent/health                     agent health check
/// /agent/config                     agent tooling report
///
/// /playbooks/run                    submit a playbook (POST, 202)
/// /playbooks/validate               syntax-check a playbook (POST)
/// /inventory/devices                add a device to the agent inventory (POST)
///
/// /executions                       list
/// /executions/{id}                  stored record
/// /executions/{id}/status           live status from the agent
///
/// /audit                            recent audit events (?limit=N)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/credentials", credentials::router())
        .nest("/agent", agents::router())
        .merge(dispatch::router())
        .nest("/audit", audit::router())
}
