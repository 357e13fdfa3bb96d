use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Configuration for the REST gateway and the docs server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GatewayConfig {
    pub enabled: bool,
    pub bind_addr: String,
    /// Remote gRPC endpoint. Evaluates in-process when absent.
    pub upstream: Option<String>,
    #[serde(with = "humantime_serde")]
    pub request_timeout: Duration,
    #[serde(with = "humantime_serde")]
    pub connect_timeout: Duration,
    pub body_limit_bytes: usize,
    pub cors_enabled: bool,
    pub cors: CorsConfig,
    pub docs: DocsConfig,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_addr: "0.0.0.0:8080".to_owned(),
            upstream: None,
            request_timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
            body_limit_bytes: 1024 * 1024,
            cors_enabled: false,
            cors: CorsConfig::default(),
            docs: DocsConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CorsConfig {
    /// Allowed origins: `["*"]` means any.
    pub allowed_origins: Vec<String>,
    /// Allowed HTTP methods, e.g. `["GET","POST"]` or `["*"]`.
    pub allowed_methods: Vec<String>,
    /// Allowed request headers; `["*"]` means any.
    pub allowed_headers: Vec<String>,
    /// Whether to allow credentials.
    pub allow_credentials: bool,
    /// Max age for preflight caching in seconds. Zero omits the header.
    pub max_age_seconds: u64,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            allowed_origins: vec!["*".to_owned()],
            allowed_methods: vec!["GET".to_owned(), "POST".to_owned(), "OPTIONS".to_owned()],
            allowed_headers: vec!["*".to_owned()],
            allow_credentials: false,
            max_age_seconds: 600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DocsConfig {
    pub enabled: bool,
    pub bind_addr: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bind_addr: "0.0.0.0:8081".to_owned(),
        }
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn partial_section_fills_defaults() {
        let cfg: GatewayConfig = serde_json::from_value(serde_json::json!({
            "bind_addr": "127.0.0.1:9000",
            "request_timeout": "250ms",
            "docs": { "enabled": false }
        }))
        .unwrap();

        assert_eq!(cfg.bind_addr, "127.0.0.1:9000");
        assert_eq!(cfg.request_timeout, Duration::from_millis(250));
        assert_eq!(cfg.connect_timeout, Duration::from_secs(5));
        assert!(cfg.upstream.is_none());
        assert!(!cfg.docs.enabled);
        assert_eq!(cfg.docs.bind_addr, "0.0.0.0:8081");
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let res = serde_json::from_value::<GatewayConfig>(serde_json::json!({ "bind": "x" }));
        assert!(res.is_err());
    }
}
