use axum::extract::rejection::JsonRejection;
use calculator_sdk::{CalcErrorCode, CalculatorError};

use crate::problem::{ErrDef, Problem, catalog};

fn err_def(code: CalcErrorCode) -> &'static ErrDef {
    match code {
        CalcErrorCode::MalformedPayload => &catalog::MALFORMED_PAYLOAD,
        CalcErrorCode::UnknownCommandKind => &catalog::UNKNOWN_COMMAND_KIND,
        CalcErrorCode::UndefinedVariable => &catalog::UNDEFINED_VARIABLE,
        CalcErrorCode::DivisionByZero => &catalog::DIVISION_BY_ZERO,
        CalcErrorCode::RequestTooLarge => &catalog::REQUEST_TOO_LARGE,
        CalcErrorCode::AlreadyExecuted => &catalog::ALREADY_EXECUTED,
    }
}

/// Map a calculator error to a Problem.
pub fn calculator_error_to_problem(
    e: &CalculatorError,
    instance: &str,
    trace_id: Option<String>,
) -> Problem {
    let problem = match e {
        CalculatorError::Rejected { code, message } => err_def(*code).as_problem(message.clone()),
        CalculatorError::Transport(msg) => {
            tracing::warn!(error = %msg, "calculator upstream unreachable");
            catalog::UPSTREAM_UNAVAILABLE.as_problem("The calculator service is unavailable")
        }
        CalculatorError::Internal(msg) => {
            tracing::error!(error = %msg, "calculator internal failure");
            catalog::INTERNAL.as_problem("An internal error occurred")
        }
    };
    problem.with_context(instance, trace_id)
}

/// Map a body extraction failure to a Problem, keeping axum's status
/// (400 for bad JSON, 413 for oversized bodies, 415 for a wrong content type).
pub fn json_rejection_to_problem(
    rejection: &JsonRejection,
    instance: &str,
    trace_id: Option<String>,
) -> Problem {
    let mut problem = catalog::INVALID_BODY.as_problem(rejection.body_text());
    problem.status = rejection.status();
    problem.with_context(instance, trace_id)
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[test]
    fn every_code_has_a_status() {
        let expected = [
            (CalcErrorCode::MalformedPayload, StatusCode::BAD_REQUEST),
            (CalcErrorCode::UnknownCommandKind, StatusCode::BAD_REQUEST),
            (CalcErrorCode::UndefinedVariable, StatusCode::UNPROCESSABLE_ENTITY),
            (CalcErrorCode::DivisionByZero, StatusCode::UNPROCESSABLE_ENTITY),
            (CalcErrorCode::RequestTooLarge, StatusCode::PAYLOAD_TOO_LARGE),
            (CalcErrorCode::AlreadyExecuted, StatusCode::INTERNAL_SERVER_ERROR),
        ];
        assert_eq!(expected.len(), CalcErrorCode::ALL.len());

        for (code, status) in expected {
            let p = calculator_error_to_problem(
                &CalculatorError::rejected(code, "detail"),
                "/v1/calc",
                None,
            );
            assert_eq!(p.status, status, "{code}");
            assert_eq!(p.code, code.as_str());
            assert_eq!(p.detail, "detail");
        }
    }

    #[test]
    fn transport_is_bad_gateway_and_hides_detail() {
        let p = calculator_error_to_problem(
            &CalculatorError::Transport("tcp connect error 10.0.0.7".to_owned()),
            "/v1/calc",
            Some("req-9".to_owned()),
        );
        assert_eq!(p.status, StatusCode::BAD_GATEWAY);
        assert!(!p.detail.contains("10.0.0.7"));
        assert_eq!(p.trace_id.as_deref(), Some("req-9"));
    }

    #[test]
    fn internal_is_500() {
        let p = calculator_error_to_problem(
            &CalculatorError::Internal("bad frame".to_owned()),
            "/v1/calc",
            None,
        );
        assert_eq!(p.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(p.code, "INTERNAL");
    }
}
