//! Calculator Gateway
//!
//! REST/JSON front end for the calculator:
//! - `POST /v1/calc`, `GET /health`, `GET /healthz`
//! - RFC 9457 Problem Details for every failure
//! - request id, tracing, timeout, body limit and CORS middleware
//! - a separate docs server with `/openapi.json` and `/docs`
//!
//! The gateway talks to the calculator through `CalculatorClient`, either a
//! remote gRPC endpoint or an in-process client supplied by the caller.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod cors;
pub mod docs;
pub mod domain;
pub mod middleware;
pub mod problem;
pub mod server;

use std::sync::Arc;

use axum::Router;
use calculator_sdk::{CalculatorClient, CalculatorError, CalculatorGrpcClient, GrpcClientConfig};

pub use config::{CorsConfig, DocsConfig, GatewayConfig};
pub use docs::build_docs_router;
pub use domain::Service;
pub use problem::Problem;
pub use server::{serve, serve_listener};

/// Module name used for the `modules.<name>` configuration section.
pub const MODULE_NAME: &str = "calculator_gateway";

/// Build the gateway router with the full middleware stack.
///
/// # Errors
/// Returns an error if the CORS section is invalid.
pub fn build_router(service: Arc<Service>, cfg: &GatewayConfig) -> anyhow::Result<Router> {
    let router = api::rest::routes::register_routes(Router::new(), service);
    middleware::apply_middleware_stack(router, cfg)
}

/// gRPC client for `upstream`; connects on first request.
///
/// # Errors
/// Returns [`CalculatorError::Transport`] if the URI is invalid.
pub fn upstream_client(
    upstream: &str,
    cfg: &GatewayConfig,
) -> Result<Arc<dyn CalculatorClient>, CalculatorError> {
    let grpc_cfg = GrpcClientConfig::default()
        .with_connect_timeout(cfg.connect_timeout)
        .with_rpc_timeout(cfg.request_timeout);
    let client = CalculatorGrpcClient::connect_lazy(upstream, &grpc_cfg)?;
    Ok(Arc::new(client))
}
