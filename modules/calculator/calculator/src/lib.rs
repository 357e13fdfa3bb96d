//! Calculator Module
//!
//! Evaluates ordered batches of `calc` / `print` commands and serves them
//! over gRPC.
//!
//! ## Architecture
//!
//! - `domain/` - Command model, parser, execution plan, evaluator, and the domain `Service`
//! - `api/grpc/server.rs` - gRPC server implementation
//! - `local_client.rs` - in-process `CalculatorClient`
//! - `serve.rs` - tonic server hosting over TCP or Unix domain sockets
//!
//! External consumers should use the `calculator-sdk` crate which provides
//! the gRPC client.
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod api;
pub mod config;
pub mod domain;
mod local_client;
mod serve;

pub use config::CalculatorConfig;
pub use domain::{CalcError, Service};
pub use local_client::LocalCalculatorClient;
pub use serve::{ListenConfig, serve_grpc, serve_tcp};

/// Module name used for the `modules.<name>` configuration section.
pub const MODULE_NAME: &str = "calculator";
