use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use huddle_core::GroupId;
use huddle_directory::dto::{DeleteRequest, DeleteResponse, UpdateGroupRequest};
use huddle_directory::NewGroup;

use crate::app::{dto, errors, services::AppServices};

pub async fn list_groups(Extension(services): Extension<Arc<AppServices>>) -> axum::response::Response {
    match services.directory.list_groups() {
        Ok(groups) => (StatusCode::OK, Json(groups)).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn create_group(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    let new: NewGroup = match dto::parse_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.directory.create_group(new) {
        Ok(group) => {
            tracing::info!(group_id = %group.id, "attendee group created");
            (StatusCode::CREATED, Json(group)).into_response()
        }
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn update_group(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    let req: UpdateGroupRequest = match dto::parse_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.directory.update_group(&req.id, req.patch) {
        Ok(group) => (StatusCode::OK, Json(group)).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn delete_group(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    let req: DeleteRequest<GroupId> = match dto::parse_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.directory.delete_group(&req.id) {
        Ok(()) => {
            tracing::info!(group_id = %req.id, "attendee group deleted");
            (StatusCode::OK, Json(DeleteResponse { success: true })).into_response()
        }
        Err(e) => errors::repository_error_to_response(e),
    }
}
