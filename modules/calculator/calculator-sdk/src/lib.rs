//! Calculator SDK
//!
//! This crate provides everything needed to consume the calculator service:
//! - API trait (`CalculatorClient`)
//! - Transport-agnostic models (`WireCommand`, `Operand`, `VariableValue`, `CalcOutcome`)
//! - Error types (`CalculatorError`, `CalcErrorCode`)
//! - gRPC client (`CalculatorGrpcClient`)
//! - Proto stubs for server implementation
//!
//! ## Usage
//!
//! ```ignore
//! use calculator_sdk::{CalculatorClient, CalculatorGrpcClient, GrpcClientConfig, WireCommand};
//!
//! let client = CalculatorGrpcClient::connect("http://127.0.0.1:50051", &GrpcClientConfig::default()).await?;
//! let outcome = client
//!     .calc(vec![
//!         WireCommand::calc_expr("x", "2 + 3"),
//!         WireCommand::print("x"),
//!     ])
//!     .await?;
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

// === API TRAIT AND TYPES ===
mod api;
mod models;
pub use api::{CalcErrorCode, CalculatorClient, CalculatorError, ERROR_CODE_METADATA_KEY};
pub use models::{CalcOutcome, Operand, VariableValue, WireCommand};

// === GRPC CLIENT ===
mod client;
mod convert;
pub use client::{CalculatorGrpcClient, GrpcClientConfig};

// === GRPC PROTO STUBS (for server implementation) ===
/// Generated protobuf types for `CalculatorService`
pub mod proto {
    #![allow(clippy::pedantic)]
    tonic::include_proto!("calculator.v1");
}

// Re-export proto types needed by server
pub use proto::calculator_service_server::{CalculatorService, CalculatorServiceServer};
pub use proto::{CalcRequest, CalcResponse};

/// Service name constant for `CalculatorService` (used in logs and client config)
pub const SERVICE_NAME: &str = "calculator.v1.CalculatorService";
