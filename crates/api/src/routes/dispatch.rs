//! Route definitions for agent dispatches and their execution records.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::dispatch;
use crate::state::AppState;

/// Routes merged at the `/api/v1` root.
///
/// ```text
/// POST /playbooks/run            -> run_playbook
/// POST /playbooks/validate       -> validate_playbook
/// POST /inventory/devices        -> add_device
/// GET  /executions               -> list_executions
/// GET  /executions/{id}          -> get_execution
/// GET  /executions/{id}/status   -> get_execution_status
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/playbooks/run", post(dispatch::run_playbook))
        .route("/playbooks/validate", post(dispatch::validate_playbook))
        .route("/inventory/devices", post(dispatch::add_device))
        .route("/executions", get(dispatch::list_executions))
        .route("/executions/{id}", get(dispatch::get_execution))
        .route("/executions/{id}/status", get(dispatch::get_execution_status))
}
