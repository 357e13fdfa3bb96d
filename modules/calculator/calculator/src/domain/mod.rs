pub mod assembler;
pub mod decode;
pub mod error;
pub mod evaluator;
pub mod model;
pub mod parser;
pub mod plan;
pub mod service;
pub mod variables;

pub use error::CalcError;
pub use plan::{ExecutionPlan, Strategy};
pub use service::Service;
