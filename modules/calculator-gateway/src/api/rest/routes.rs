use std::sync::Arc;

use axum::routing::{get, post};
use axum::{Extension, Router};

use super::handlers;
use crate::domain::service::Service;

#[must_use]
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    router
        .route("/v1/calc", post(handlers::calc))
        .route("/health", get(handlers::health))
        .route("/healthz", get(handlers::healthz))
        .layer(Extension(service))
}
