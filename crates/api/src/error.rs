use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use netops_agent::RegistryError;
use netops_core::error::CoreError;
use netops_dispatch::DispatchError;
use netops_vault::VaultError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps each crate's domain error and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Vault(#[from] VaultError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Core(CoreError::Validation(rejection.body_text()))
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::Core(CoreError::Validation(rejection.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Core(CoreError::Validation(rejection.body_text()))
    }
}

type Mapped = (StatusCode, &'static str, String);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => classify_core(core),
            AppError::Vault(err) => classify_vault(err),
            AppError::Registry(err) => classify_registry(err),
            AppError::Dispatch(err) => classify_dispatch(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => internal(msg),
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}

fn classify_core(err: &CoreError) -> Mapped {
    match err {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} with id {id} not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Internal(msg) => internal(msg),
    }
}

/// Crypto failures are logged with the record id and surface as a generic 500.
fn classify_vault(err: &VaultError) -> Mapped {
    match err {
        VaultError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        VaultError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Credential with id {id} not found"),
        ),
        VaultError::Crypto { .. } | VaultError::Internal(_) => internal(&err.to_string()),
    }
}

fn classify_registry(err: &RegistryError) -> Mapped {
    match err {
        RegistryError::NotRegistered(_) => (
            StatusCode::NOT_FOUND,
            "AGENT_NOT_REGISTERED",
            err.to_string(),
        ),
        RegistryError::InvalidEndpoint(msg) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
    }
}

fn classify_dispatch(err: &DispatchError) -> Mapped {
    match err {
        DispatchError::Validation(msg) => {
            (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
        }
        DispatchError::Registry(inner) => classify_registry(inner),
        DispatchError::CredentialNotFound(id) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Credential with id {id} not found"),
        ),
        DispatchError::ExecutionNotFound(id) => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("Execution with id {id} not found"),
        ),
        DispatchError::CredentialUnreadable(_) | DispatchError::Internal(_) => {
            internal(&err.to_string())
        }
    }
}

fn internal(detail: &str) -> Mapped {
    tracing::error!(error = %detail, "Internal error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An internal error occurred".to_string(),
    )
}
