mod server;

pub use server::{CalculatorServiceImpl, to_status};
