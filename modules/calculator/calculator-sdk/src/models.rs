//! Transport-agnostic contract models.
//!
//! These are the shapes every transport decodes into before handing a batch
//! to the calculator, and the shapes it receives back.

use std::time::Duration;

/// A literal number or a reference to a variable.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Number(f64),
    Variable(String),
}

impl From<f64> for Operand {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Operand {
    fn from(name: &str) -> Self {
        Self::Variable(name.to_owned())
    }
}

/// A command as decoded by a transport, before validation.
///
/// `kind` is the raw discriminator (`"calc"` or `"print"`). The remaining
/// fields form the kind-specific payload; which of them must be present is
/// decided by the calculator, not by the transport.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WireCommand {
    pub kind: String,
    pub var: Option<String>,
    pub op: Option<String>,
    pub left: Option<Operand>,
    pub right: Option<Operand>,
    pub expr: Option<String>,
}

impl WireCommand {
    /// `print` command for `var`.
    #[must_use]
    pub fn print(var: impl Into<String>) -> Self {
        Self {
            kind: "print".to_owned(),
            var: Some(var.into()),
            ..Self::default()
        }
    }

    /// Structured `calc` command: `var = left <op> right`.
    #[must_use]
    pub fn calc_binary(
        var: impl Into<String>,
        op: impl Into<String>,
        left: impl Into<Operand>,
        right: impl Into<Operand>,
    ) -> Self {
        Self {
            kind: "calc".to_owned(),
            var: Some(var.into()),
            op: Some(op.into()),
            left: Some(left.into()),
            right: Some(right.into()),
            expr: None,
        }
    }

    /// Textual `calc` command: `var = <expr>`.
    #[must_use]
    pub fn calc_expr(var: impl Into<String>, expr: impl Into<String>) -> Self {
        Self {
            kind: "calc".to_owned(),
            var: Some(var.into()),
            expr: Some(expr.into()),
            ..Self::default()
        }
    }
}

/// One printed variable.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableValue {
    pub name: String,
    pub value: f64,
}

impl VariableValue {
    #[must_use]
    pub fn new(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
        }
    }
}

/// Successful evaluation of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct CalcOutcome {
    /// Printed variables in command order.
    pub items: Vec<VariableValue>,
    /// Time the service spent evaluating the batch.
    pub duration: Duration,
}
