use serde::{Deserialize, Serialize};

/// Configuration for the calculator module (`modules.calculator.config`).
///
/// `listen_addr` accepts:
/// - TCP: `"127.0.0.1:50051"` or `"0.0.0.0:0"` for an ephemeral port
/// - Unix Domain Socket (Unix only): `"uds:///path/to/socket.sock"`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct CalculatorConfig {
    pub listen_addr: String,
    /// Largest accepted batch.
    pub max_commands: usize,
    /// Deepest accepted textual expression.
    pub max_expression_depth: usize,
}

impl Default for CalculatorConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:50051".to_owned(),
            max_commands: 10_000,
            max_expression_depth: 64,
        }
    }
}
