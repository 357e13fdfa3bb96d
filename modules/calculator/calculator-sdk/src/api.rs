//! Calculator API trait and types
//!
//! Contract trait and error types for the calculator service.

use std::fmt;

use async_trait::async_trait;

use crate::models::{CalcOutcome, WireCommand};

/// gRPC response metadata key carrying the machine-readable [`CalcErrorCode`].
pub const ERROR_CODE_METADATA_KEY: &str = "x-calc-error-code";

/// Calculator API trait
///
/// Evaluates an ordered batch of commands and returns the printed variables.
/// A batch either succeeds as a whole or fails with a single error.
#[async_trait]
pub trait CalculatorClient: Send + Sync {
    /// Evaluate `commands` in order.
    async fn calc(&self, commands: Vec<WireCommand>) -> Result<CalcOutcome, CalculatorError>;
}

/// Machine-readable reason a batch was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CalcErrorCode {
    MalformedPayload,
    UnknownCommandKind,
    UndefinedVariable,
    DivisionByZero,
    RequestTooLarge,
    AlreadyExecuted,
}

impl CalcErrorCode {
    pub const ALL: [Self; 6] = [
        Self::MalformedPayload,
        Self::UnknownCommandKind,
        Self::UndefinedVariable,
        Self::DivisionByZero,
        Self::RequestTooLarge,
        Self::AlreadyExecuted,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MalformedPayload => "MALFORMED_PAYLOAD",
            Self::UnknownCommandKind => "UNKNOWN_COMMAND_KIND",
            Self::UndefinedVariable => "UNDEFINED_VARIABLE",
            Self::DivisionByZero => "DIVISION_BY_ZERO",
            Self::RequestTooLarge => "REQUEST_TOO_LARGE",
            Self::AlreadyExecuted => "ALREADY_EXECUTED",
        }
    }

    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|code| code.as_str() == raw)
    }
}

impl fmt::Display for CalcErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type for Calculator operations
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CalculatorError {
    /// The service refused the batch (bad input or evaluation fault).
    #[error("{code}: {message}")]
    Rejected { code: CalcErrorCode, message: String },

    #[error("gRPC transport error: {0}")]
    Transport(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CalculatorError {
    #[must_use]
    pub fn rejected(code: CalcErrorCode, message: impl Into<String>) -> Self {
        Self::Rejected {
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn error_codes_parse_back() {
        for code in CalcErrorCode::ALL {
            assert_eq!(CalcErrorCode::parse(code.as_str()), Some(code));
        }
        assert_eq!(CalcErrorCode::parse("division_by_zero"), None);
    }

    #[test]
    fn rejected_display_includes_code() {
        let err = CalculatorError::rejected(CalcErrorCode::UndefinedVariable, "y");
        assert_eq!(err.to_string(), "UNDEFINED_VARIABLE: y");
    }
}
