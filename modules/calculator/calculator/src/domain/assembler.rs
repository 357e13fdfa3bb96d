use calculator_sdk::VariableValue;

use crate::domain::evaluator::ExecutionResult;

/// Convert evaluator rows into the transport-facing list, keeping order.
#[must_use]
pub fn assemble(result: ExecutionResult) -> Vec<VariableValue> {
    result
        .into_rows()
        .into_iter()
        .map(|row| VariableValue::new(row.name, row.value))
        .collect()
}
