//! Documentation server: the OpenAPI document and an interactive viewer.

use std::sync::Arc;

use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::{Extension, Json, Router};
use utoipa::OpenApi;
use utoipa::openapi::OpenApi as OpenApiDoc;

use crate::api::rest::openapi::ApiDoc;
use crate::middleware::apply_trace_layer;

const DOCS_HTML: &str = r#"<!doctype html>
<html lang="en">
  <head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1, shrink-to-fit=no">
    <title>Calculator API</title>
    <script src="https://unpkg.com/@stoplight/elements@9.0.15/web-components.min.js"></script>
    <link rel="stylesheet" href="https://unpkg.com/@stoplight/elements@9.0.15/styles.min.css">
  </head>
  <body>
    <elements-api apiDescriptionUrl="/openapi.json" router="hash" layout="sidebar"></elements-api>
  </body>
</html>
"#;

async fn openapi_json(Extension(doc): Extension<Arc<OpenApiDoc>>) -> impl IntoResponse {
    (
        [(header::CACHE_CONTROL, "no-store")],
        Json(doc.as_ref().clone()),
    )
}

async fn docs_page() -> Html<&'static str> {
    Html(DOCS_HTML)
}

/// Router serving `/openapi.json` and `/docs`.
#[must_use]
pub fn build_docs_router() -> Router {
    let doc = Arc::new(ApiDoc::openapi());
    let router = Router::new()
        .route("/openapi.json", get(openapi_json))
        .route("/docs", get(docs_page))
        .layer(Extension(doc));
    apply_trace_layer(router, "docs")
}
