//! Runs a command list against a fresh variable table.

use crate::domain::error::CalcError;
use crate::domain::model::{BinaryOp, Command, Expression, Variable};
use crate::domain::variables::VariableTable;

/// Rows emitted by `print` commands, in emission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionResult {
    rows: Vec<Variable>,
}

impl ExecutionResult {
    #[must_use]
    pub fn rows(&self) -> &[Variable] {
        &self.rows
    }

    #[must_use]
    pub fn into_rows(self) -> Vec<Variable> {
        self.rows
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Evaluate `commands` in order. The first failure aborts the run and
/// discards any rows collected so far.
///
/// # Errors
/// [`CalcError::UndefinedVariable`] or [`CalcError::DivisionByZero`].
pub fn run(commands: &[Command]) -> Result<ExecutionResult, CalcError> {
    let mut table = VariableTable::new();
    let mut rows = Vec::new();

    for command in commands {
        match command {
            Command::Calc(calc) => {
                let value = evaluate(&calc.expression, &table)?;
                table.set(&calc.target, value);
            }
            Command::Print(print) => {
                let value = table.get(&print.source)?;
                rows.push(Variable {
                    name: print.source.clone(),
                    value,
                });
            }
        }
    }

    Ok(ExecutionResult { rows })
}

/// Evaluate one expression. The left operand is evaluated first, so its
/// error wins when both sides would fail.
///
/// # Errors
/// [`CalcError::UndefinedVariable`] or [`CalcError::DivisionByZero`].
pub fn evaluate(expr: &Expression, table: &VariableTable) -> Result<f64, CalcError> {
    match expr {
        Expression::Number(n) => Ok(*n),
        Expression::Variable(name) => table.get(name),
        Expression::Neg(inner) => evaluate(inner, table).map(|v| -v),
        Expression::Binary { op, left, right } => {
            let l = evaluate(left, table)?;
            let r = evaluate(right, table)?;
            apply(*op, l, r)
        }
    }
}

fn apply(op: BinaryOp, l: f64, r: f64) -> Result<f64, CalcError> {
    match op {
        BinaryOp::Add => Ok(l + r),
        BinaryOp::Sub => Ok(l - r),
        BinaryOp::Mul => Ok(l * r),
        // -0.0 == 0.0, so both signed zeros are rejected.
        BinaryOp::Div if r == 0.0 => Err(CalcError::DivisionByZero),
        BinaryOp::Div => Ok(l / r),
    }
}
