//! Route definitions for tenant credentials.

use axum::routing::get;
use axum::Router;

use crate::handlers::credentials;
use crate::state::AppState;

/// Routes mounted at `/credentials`.
///
/// ```text
/// GET    /       -> list_credentials
/// POST   /       -> create_credential
/// GET    /{id}   -> get_credential
/// PUT    /{id}   -> update_credential
/// DELETE /{id}   -> delete_credential
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(credentials::list_credentials).post(credentials::create_credential),
        )
        .route(
            "/{id}",
            get(credentials::get_credential)
                .put(credentials::update_credential)
                .delete(credentials::delete_credential),
        )
}
