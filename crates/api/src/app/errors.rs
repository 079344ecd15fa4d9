use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use huddle_infra::RepositoryError;

pub fn repository_error_to_response(err: RepositoryError) -> axum::response::Response {
    match err {
        RepositoryError::NotFound { .. } => {
            json_error(StatusCode::NOT_FOUND, "not_found", err.to_string())
        }
        RepositoryError::Conflict { .. } => {
            json_error(StatusCode::CONFLICT, "conflict", err.to_string())
        }
        RepositoryError::UnknownGroup(_) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "unknown_group", err.to_string())
        }
        RepositoryError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        RepositoryError::Poisoned => {
            tracing::error!("directory repository lock poisoned");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", err.to_string())
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
