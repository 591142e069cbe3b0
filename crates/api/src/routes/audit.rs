use axum::routing::get;
use axum::Router;

use crate::handlers::audit;
use crate::state::AppState;

/// Routes mounted at `/audit`.
///
/// ```text
/// GET / -> list_audit_events
/// ```
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(audit::list_audit_events))
}
