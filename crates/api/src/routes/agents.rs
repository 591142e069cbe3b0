//! Route definitions for the calling tenant's agent.

use axum::routing::get;
use axum::Router;

use crate::handlers::agents;
use crate::state::AppState;

/// Routes mounted at `/agent`.
///
/// ```text
/// GET    /         -> get_agent
/// PUT    /         -> register_agent
/// DELETE /         -> remove_agent
/// GET    /health   -> agent_health
/// GET    /config   -> agent_config
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(agents::get_agent)
                .put(agents::register_agent)
                .delete(agents::remove_agent),
        )
        .route("/health", get(agents::agent_health))
        .route("/config", get(agents::agent_config))
}
