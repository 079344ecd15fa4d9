use axum::{routing::get, Router};

pub mod categories;
pub mod groups;
pub mod system;

/// Router for the admin collections.
pub fn router() -> Router {
    Router::new()
        .route(
            "/api/admin/groups",
            get(groups::list_groups)
                .post(groups::create_group)
                .put(groups::update_group)
                .delete(groups::delete_group),
        )
        .route(
            "/api/admin/categories",
            get(categories::list_categories)
                .post(categories::create_category)
                .put(categories::update_category)
                .delete(categories::delete_category),
        )
}
