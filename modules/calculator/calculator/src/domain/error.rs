use calculator_sdk::{CalcErrorCode, CalculatorError};
use thiserror::Error;

/// Errors produced while decoding or executing a batch of commands.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CalcError {
    #[error("command {index}: malformed payload: {reason}")]
    MalformedPayload { index: usize, reason: String },

    #[error("command {index}: unknown command kind '{kind}'")]
    UnknownCommandKind { index: usize, kind: String },

    #[error("undefined variable: {0}")]
    UndefinedVariable(String),

    #[error("division by zero")]
    DivisionByZero,

    #[error("execution plan has already been executed")]
    AlreadyExecuted,

    #[error("too many commands: {count} (max: {max})")]
    RequestTooLarge { count: usize, max: usize },
}

impl CalcError {
    #[must_use]
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedPayload {
            index,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn unknown_kind(index: usize, kind: impl Into<String>) -> Self {
        Self::UnknownCommandKind {
            index,
            kind: kind.into(),
        }
    }

    #[must_use]
    pub fn undefined(name: impl Into<String>) -> Self {
        Self::UndefinedVariable(name.into())
    }

    #[must_use]
    pub const fn code(&self) -> CalcErrorCode {
        match self {
            Self::MalformedPayload { .. } => CalcErrorCode::MalformedPayload,
            Self::UnknownCommandKind { .. } => CalcErrorCode::UnknownCommandKind,
            Self::UndefinedVariable(_) => CalcErrorCode::UndefinedVariable,
            Self::DivisionByZero => CalcErrorCode::DivisionByZero,
            Self::AlreadyExecuted => CalcErrorCode::AlreadyExecuted,
            Self::RequestTooLarge { .. } => CalcErrorCode::RequestTooLarge,
        }
    }
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<CalcError> for CalculatorError {
    fn from(err: CalcError) -> Self {
        CalculatorError::rejected(err.code(), err.to_string())
    }
}
