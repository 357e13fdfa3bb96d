use utoipa::OpenApi;

use super::dto::{CalcRequestDto, CalcResponseDto, CommandDto, HealthDto, ItemDto, OperandDto};
use super::handlers;
use crate::problem::Problem;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Calculator API",
        description = "Evaluates ordered batches of calc and print commands."
    ),
    paths(handlers::calc, handlers::health, handlers::healthz),
    components(schemas(
        CalcRequestDto,
        CommandDto,
        OperandDto,
        CalcResponseDto,
        ItemDto,
        HealthDto,
        Problem
    )),
    tags(
        (name = "calculator", description = "Batch evaluation"),
        (name = "system", description = "Health probes")
    )
)]
pub struct ApiDoc;
