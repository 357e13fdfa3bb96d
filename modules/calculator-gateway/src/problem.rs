//! RFC 9457 Problem Details and the gateway's error catalog.

use axum::response::{IntoResponse, Response};
use http::{StatusCode, header};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use utoipa::ToSchema;

/// Content type for Problem Details as per RFC 9457.
pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

#[allow(clippy::trivially_copy_pass_by_ref)] // serde requires &T signature
fn serialize_status_code<S>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_u16(status.as_u16())
}

fn deserialize_status_code<'de, D>(deserializer: D) -> Result<StatusCode, D::Error>
where
    D: Deserializer<'de>,
{
    let code = u16::deserialize(deserializer)?;
    StatusCode::from_u16(code).map_err(serde::de::Error::custom)
}

/// RFC 9457 Problem Details for HTTP APIs.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "Problem", description = "RFC 9457 Problem Details for HTTP APIs")]
#[must_use]
pub struct Problem {
    /// A URI reference that identifies the problem type.
    #[serde(rename = "type")]
    pub type_url: String,
    /// A short, human-readable summary of the problem type.
    pub title: String,
    /// The HTTP status code for this occurrence of the problem.
    #[serde(
        serialize_with = "serialize_status_code",
        deserialize_with = "deserialize_status_code"
    )]
    #[schema(value_type = u16)]
    pub status: StatusCode,
    /// A human-readable explanation specific to this occurrence of the problem.
    pub detail: String,
    /// The request path that produced the problem.
    pub instance: String,
    /// Machine-readable error code, e.g. `DIVISION_BY_ZERO`.
    pub code: String,
    /// Request id of the failing request, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_owned(),
            title: title.into(),
            status,
            detail: detail.into(),
            instance: String::new(),
            code: String::new(),
            trace_id: None,
        }
    }

    pub fn with_type(mut self, type_url: impl Into<String>) -> Self {
        self.type_url = type_url.into();
        self
    }

    pub fn with_instance(mut self, uri: impl Into<String>) -> Self {
        self.instance = uri.into();
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = code.into();
        self
    }

    pub fn with_trace_id(mut self, id: impl Into<String>) -> Self {
        self.trace_id = Some(id.into());
        self
    }

    /// Attach the request path and, when present, the request id.
    pub fn with_context(self, instance: &str, trace_id: Option<String>) -> Self {
        let problem = self.with_instance(instance);
        match trace_id {
            Some(id) => problem.with_trace_id(id),
            None => problem,
        }
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = self.status;
        let mut resp = axum::Json(self).into_response();
        *resp.status_mut() = status;
        resp.headers_mut().insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp
    }
}

/// Static error definition: one entry per machine code.
#[derive(Debug, Clone, Copy)]
pub struct ErrDef {
    pub status: u16,
    pub title: &'static str,
    pub code: &'static str,
    pub type_url: &'static str,
}

impl ErrDef {
    pub fn as_problem(&self, detail: impl Into<String>) -> Problem {
        let status =
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        Problem::new(status, self.title, detail)
            .with_code(self.code)
            .with_type(self.type_url)
    }
}

pub mod catalog {
    use super::ErrDef;

    pub const MALFORMED_PAYLOAD: ErrDef = ErrDef {
        status: 400,
        title: "Malformed payload",
        code: "MALFORMED_PAYLOAD",
        type_url: "urn:calculator:error:malformed-payload",
    };

    pub const UNKNOWN_COMMAND_KIND: ErrDef = ErrDef {
        status: 400,
        title: "Unknown command kind",
        code: "UNKNOWN_COMMAND_KIND",
        type_url: "urn:calculator:error:unknown-command-kind",
    };

    pub const UNDEFINED_VARIABLE: ErrDef = ErrDef {
        status: 422,
        title: "Undefined variable",
        code: "UNDEFINED_VARIABLE",
        type_url: "urn:calculator:error:undefined-variable",
    };

    pub const DIVISION_BY_ZERO: ErrDef = ErrDef {
        status: 422,
        title: "Division by zero",
        code: "DIVISION_BY_ZERO",
        type_url: "urn:calculator:error:division-by-zero",
    };

    pub const REQUEST_TOO_LARGE: ErrDef = ErrDef {
        status: 413,
        title: "Request too large",
        code: "REQUEST_TOO_LARGE",
        type_url: "urn:calculator:error:request-too-large",
    };

    pub const ALREADY_EXECUTED: ErrDef = ErrDef {
        status: 500,
        title: "Plan already executed",
        code: "ALREADY_EXECUTED",
        type_url: "urn:calculator:error:already-executed",
    };

    pub const INVALID_BODY: ErrDef = ErrDef {
        status: 400,
        title: "Invalid request body",
        code: "INVALID_BODY",
        type_url: "urn:calculator:error:invalid-body",
    };

    pub const UPSTREAM_UNAVAILABLE: ErrDef = ErrDef {
        status: 502,
        title: "Upstream unavailable",
        code: "UPSTREAM_UNAVAILABLE",
        type_url: "urn:calculator:error:upstream-unavailable",
    };

    pub const INTERNAL: ErrDef = ErrDef {
        status: 500,
        title: "Internal server error",
        code: "INTERNAL",
        type_url: "urn:calculator:error:internal",
    };
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn serializes_status_as_number_and_skips_missing_trace() {
        let p = catalog::DIVISION_BY_ZERO
            .as_problem("division by zero")
            .with_context("/v1/calc", None);
        let v = serde_json::to_value(&p).unwrap();

        assert_eq!(v["status"], 422);
        assert_eq!(v["type"], "urn:calculator:error:division-by-zero");
        assert_eq!(v["code"], "DIVISION_BY_ZERO");
        assert_eq!(v["instance"], "/v1/calc");
        assert!(v.get("trace_id").is_none());
    }

    #[test]
    fn response_uses_problem_content_type() {
        let resp = catalog::INTERNAL
            .as_problem("boom")
            .with_trace_id("req-1")
            .into_response();

        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            APPLICATION_PROBLEM_JSON
        );
    }

    #[test]
    fn round_trips_through_json() {
        let p = catalog::UPSTREAM_UNAVAILABLE
            .as_problem("connection refused")
            .with_context("/v1/calc", Some("abc".to_owned()));
        let back: Problem = serde_json::from_str(&serde_json::to_string(&p).unwrap()).unwrap();
        assert_eq!(back.status, StatusCode::BAD_GATEWAY);
        assert_eq!(back.trace_id.as_deref(), Some("abc"));
    }
}
