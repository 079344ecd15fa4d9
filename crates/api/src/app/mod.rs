//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: the repository handle shared by every handler
//! - `routes/`: HTTP routes + handlers (one file per collection)
//! - `dto.rs`: request body parsing
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{routing::get, Extension, Router};
use tower::ServiceBuilder;

use huddle_infra::DirectoryRepository;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs` and the black-box tests).
pub fn build_app(directory: Arc<dyn DirectoryRepository>) -> Router {
    let services = Arc::new(services::AppServices::new(directory));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router())
        .layer(ServiceBuilder::new().layer(Extension(services)))
}
