//! gRPC Server implementation for calculator
//!
//! The server implementation handles gRPC requests and delegates
//! to the domain Service for business logic.

use std::sync::Arc;

use tonic::metadata::MetadataValue;
use tonic::{Code, Request, Response, Status};
use tracing::{debug, error};

use calculator_sdk::{
    CalcRequest, CalcResponse, CalculatorService, ERROR_CODE_METADATA_KEY, WireCommand,
};

use crate::domain::{CalcError, Service};

/// gRPC service implementation that wraps the domain Service.
#[derive(Clone)]
pub struct CalculatorServiceImpl {
    service: Arc<Service>,
}

impl CalculatorServiceImpl {
    /// Create a new `CalculatorService` implementation with the given Service.
    #[must_use]
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[tonic::async_trait]
impl CalculatorService for CalculatorServiceImpl {
    async fn calc(&self, request: Request<CalcRequest>) -> Result<Response<CalcResponse>, Status> {
        let commands: Vec<WireCommand> = request
            .into_inner()
            .commands
            .into_iter()
            .map(Into::into)
            .collect();
        let count = commands.len();

        match self.service.calc(commands) {
            Ok(outcome) => {
                debug!(
                    commands = count,
                    printed = outcome.items.len(),
                    duration_us = u64::try_from(outcome.duration.as_micros()).unwrap_or(u64::MAX),
                    "calc succeeded"
                );
                Ok(Response::new(outcome.into()))
            }
            Err(err @ CalcError::AlreadyExecuted) => {
                error!(error = %err, "calc failed with internal fault");
                Err(to_status(&err))
            }
            Err(err) => {
                debug!(commands = count, code = %err.code(), error = %err, "calc rejected");
                Err(to_status(&err))
            }
        }
    }
}

/// Map a domain error to a gRPC status carrying the machine-readable code
/// in the `x-calc-error-code` metadata entry.
#[must_use]
pub fn to_status(err: &CalcError) -> Status {
    let code = match err {
        CalcError::MalformedPayload { .. } | CalcError::UnknownCommandKind { .. } => {
            Code::InvalidArgument
        }
        CalcError::UndefinedVariable(_) | CalcError::DivisionByZero => Code::FailedPrecondition,
        CalcError::RequestTooLarge { .. } => Code::ResourceExhausted,
        CalcError::AlreadyExecuted => Code::Internal,
    };

    let mut status = Status::new(code, err.to_string());
    status.metadata_mut().insert(
        ERROR_CODE_METADATA_KEY,
        MetadataValue::from_static(err.code().as_str()),
    );
    status
}
