use std::sync::Arc;

use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};

use huddle_core::CategoryId;
use huddle_directory::dto::{DeleteRequest, DeleteResponse, UpdateCategoryRequest};
use huddle_directory::NewCategory;

use crate::app::{dto, errors, services::AppServices};

pub async fn list_categories(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.directory.list_categories() {
        Ok(categories) => (StatusCode::OK, Json(categories)).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn create_category(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    let new: NewCategory = match dto::parse_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.directory.create_category(new) {
        Ok(category) => {
            tracing::info!(category_id = %category.id, "product category created");
            (StatusCode::CREATED, Json(category)).into_response()
        }
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn update_category(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    let req: UpdateCategoryRequest = match dto::parse_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.directory.update_category(&req.id, req.patch) {
        Ok(category) => (StatusCode::OK, Json(category)).into_response(),
        Err(e) => errors::repository_error_to_response(e),
    }
}

pub async fn delete_category(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<serde_json::Value>,
) -> axum::response::Response {
    let req: DeleteRequest<CategoryId> = match dto::parse_body(body) {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services.directory.delete_category(&req.id) {
        Ok(()) => {
            tracing::info!(category_id = %req.id, "product category deleted");
            (StatusCode::OK, Json(DeleteResponse { success: true })).into_response()
        }
        Err(e) => errors::repository_error_to_response(e),
    }
}
