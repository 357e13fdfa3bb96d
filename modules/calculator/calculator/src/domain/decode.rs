//! Wire command decoding into the closed command model.

use calculator_sdk::{Operand, WireCommand};

use crate::domain::error::CalcError;
use crate::domain::model::{BinaryOp, CalcCommand, Command, Expression, PrintCommand};
use crate::domain::parser::{is_identifier, parse_expression};

pub const KIND_CALC: &str = "calc";
pub const KIND_PRINT: &str = "print";

/// Decodes wire commands, rejecting anything the evaluator could not run.
#[derive(Debug, Clone, Copy)]
pub struct CommandDecoder {
    max_expression_depth: usize,
}

impl CommandDecoder {
    #[must_use]
    pub const fn new(max_expression_depth: usize) -> Self {
        Self {
            max_expression_depth,
        }
    }

    /// Decode the command at position `index` of its batch.
    ///
    /// # Errors
    /// [`CalcError::UnknownCommandKind`] for a discriminator other than
    /// `calc` or `print`, [`CalcError::MalformedPayload`] for a payload
    /// that does not fit its kind.
    pub fn decode(&self, index: usize, wire: WireCommand) -> Result<Command, CalcError> {
        match wire.kind.as_str() {
            KIND_CALC => self.decode_calc(index, wire).map(Command::Calc),
            KIND_PRINT => decode_print(index, wire).map(Command::Print),
            _ => Err(CalcError::unknown_kind(index, wire.kind)),
        }
    }

    fn decode_calc(&self, index: usize, wire: WireCommand) -> Result<CalcCommand, CalcError> {
        let target = required_name(index, "var", wire.var)?;

        let has_structured = wire.op.is_some() || wire.left.is_some() || wire.right.is_some();
        let expression = match wire.expr {
            Some(_) if has_structured => {
                return Err(CalcError::malformed(
                    index,
                    "'expr' cannot be combined with 'op', 'left' or 'right'",
                ));
            }
            Some(src) => parse_expression(&src, self.max_expression_depth)
                .map_err(|e| CalcError::malformed(index, format!("invalid 'expr': {e}")))?,
            None if has_structured => {
                let op = wire
                    .op
                    .ok_or_else(|| CalcError::malformed(index, "missing field 'op'"))?;
                let op = BinaryOp::from_symbol(&op).ok_or_else(|| {
                    CalcError::malformed(index, format!("unsupported operator '{op}'"))
                })?;
                let left = operand(index, "left", wire.left)?;
                let right = operand(index, "right", wire.right)?;
                Expression::binary(op, left, right)
            }
            None => {
                return Err(CalcError::malformed(
                    index,
                    "missing expression: provide 'expr' or 'op', 'left' and 'right'",
                ));
            }
        };

        Ok(CalcCommand { target, expression })
    }
}

fn decode_print(index: usize, wire: WireCommand) -> Result<PrintCommand, CalcError> {
    if wire.op.is_some() || wire.left.is_some() || wire.right.is_some() || wire.expr.is_some() {
        return Err(CalcError::malformed(index, "print accepts only 'var'"));
    }
    let source = required_name(index, "var", wire.var)?;
    Ok(PrintCommand { source })
}

fn required_name(index: usize, field: &str, value: Option<String>) -> Result<String, CalcError> {
    let Some(name) = value else {
        return Err(CalcError::malformed(index, format!("missing field '{field}'")));
    };
    if !is_identifier(&name) {
        return Err(CalcError::malformed(
            index,
            format!("'{field}' is not a valid variable name: '{name}'"),
        ));
    }
    Ok(name)
}

fn operand(index: usize, field: &str, value: Option<Operand>) -> Result<Expression, CalcError> {
    match value {
        None => Err(CalcError::malformed(index, format!("missing field '{field}'"))),
        Some(Operand::Number(n)) if !n.is_finite() => Err(CalcError::malformed(
            index,
            format!("'{field}' must be a finite number"),
        )),
        Some(Operand::Number(n)) => Ok(Expression::Number(n)),
        Some(Operand::Variable(name)) => {
            required_name(index, field, Some(name)).map(Expression::Variable)
        }
    }
}
