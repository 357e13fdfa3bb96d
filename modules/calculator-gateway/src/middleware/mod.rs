pub mod request_id;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::field::Empty;

use crate::config::GatewayConfig;
use crate::cors::build_cors_layer;

/// Per-request span carrying the request id, filled with status and latency
/// once the response is ready.
#[must_use]
pub fn apply_trace_layer(router: Router, server: &'static str) -> Router {
    router.layer(
        TraceLayer::new_for_http()
            .make_span_with(move |req: &axum::http::Request<axum::body::Body>| {
                let rid = req
                    .headers()
                    .get(request_id::REQUEST_ID_HEADER)
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("n/a");

                tracing::info_span!(
                    "http_request",
                    server,
                    method = %req.method(),
                    uri = %req.uri().path(),
                    version = ?req.version(),
                    request_id = %rid,
                    status = Empty,
                    latency_ms = Empty,
                )
            })
            .on_response(
                |res: &axum::http::Response<axum::body::Body>,
                 latency: std::time::Duration,
                 span: &tracing::Span| {
                    span.record("status", res.status().as_u16());
                    span.record("latency_ms", latency.as_millis());
                    tracing::debug!(parent: span, "request finished");
                },
            ),
    )
}

/// Apply the gateway middleware stack.
///
/// Layers are registered innermost first. At runtime a request flows
/// `SetRequestId` → `PropagateRequestId` → Trace → Timeout → `BodyLimit` →
/// CORS → Router.
///
/// # Errors
/// Returns an error if the CORS section is invalid.
pub fn apply_middleware_stack(mut router: Router, cfg: &GatewayConfig) -> anyhow::Result<Router> {
    if cfg.cors_enabled {
        router = router.layer(build_cors_layer(&cfg.cors)?);
    }

    router = router.layer(RequestBodyLimitLayer::new(cfg.body_limit_bytes));
    router = router.layer(DefaultBodyLimit::max(cfg.body_limit_bytes));

    router = router.layer(TimeoutLayer::with_status_code(
        StatusCode::GATEWAY_TIMEOUT,
        cfg.request_timeout,
    ));

    router = apply_trace_layer(router, "gateway");

    let x_request_id = request_id::header();
    router = router.layer(PropagateRequestIdLayer::new(x_request_id.clone()));
    router = router.layer(SetRequestIdLayer::new(x_request_id, MakeRequestUuid));

    Ok(router)
}
