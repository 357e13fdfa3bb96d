use std::sync::Arc;

use axum::Json;
use axum::extract::Extension;
use axum::extract::rejection::JsonRejection;
use axum::http::{HeaderMap, Uri};

use super::dto::{CalcRequestDto, CalcResponseDto, HealthDto};
use super::error::{calculator_error_to_problem, json_rejection_to_problem};
use crate::domain::service::Service;
use crate::middleware::request_id::request_id;
use crate::problem::Problem;

/// Evaluate a batch of `calc` / `print` commands.
#[utoipa::path(
    post,
    path = "/v1/calc",
    tag = "calculator",
    operation_id = "calculator.calc",
    request_body = CalcRequestDto,
    params(
        ("x-request-id" = Option<String>, Header, description = "Client supplied request id; generated when absent")
    ),
    responses(
        (status = 200, description = "Printed variables in command order", body = CalcResponseDto),
        (status = 400, description = "Malformed command, unknown kind or invalid JSON", body = Problem, content_type = "application/problem+json"),
        (status = 413, description = "Too many commands or body too large", body = Problem, content_type = "application/problem+json"),
        (status = 422, description = "Undefined variable or division by zero", body = Problem, content_type = "application/problem+json"),
        (status = 500, description = "Internal error", body = Problem, content_type = "application/problem+json"),
        (status = 502, description = "Calculator upstream unavailable", body = Problem, content_type = "application/problem+json"),
        (status = 504, description = "Request timed out")
    )
)]
pub async fn calc(
    Extension(svc): Extension<Arc<Service>>,
    uri: Uri,
    headers: HeaderMap,
    payload: Result<Json<CalcRequestDto>, JsonRejection>,
) -> Result<Json<CalcResponseDto>, Problem> {
    let trace_id = request_id(&headers);
    let Json(req) =
        payload.map_err(|rej| json_rejection_to_problem(&rej, uri.path(), trace_id.clone()))?;

    let commands = req.commands.into_iter().map(Into::into).collect();
    let outcome = svc
        .calc(commands)
        .await
        .map_err(|e| calculator_error_to_problem(&e, uri.path(), trace_id))?;

    Ok(Json(outcome.into()))
}

/// Liveness probe with a JSON body.
#[utoipa::path(
    get,
    path = "/health",
    tag = "system",
    operation_id = "system.health",
    responses((status = 200, description = "Gateway is up", body = HealthDto))
)]
pub async fn health() -> Json<HealthDto> {
    Json(HealthDto {
        status: "healthy".to_owned(),
    })
}

/// Plain-text liveness probe.
#[utoipa::path(
    get,
    path = "/healthz",
    tag = "system",
    operation_id = "system.healthz",
    responses((status = 200, description = "Gateway is up", body = String, content_type = "text/plain"))
)]
pub async fn healthz() -> &'static str {
    "ok"
}
