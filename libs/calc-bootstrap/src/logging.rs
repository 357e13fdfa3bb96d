//! `tracing` subscriber setup.

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use crate::config::{LogFormat, LoggingConfig};

/// Pick the filter directive: a non-empty `RUST_LOG` wins over the config.
fn filter_directive(cfg: &LoggingConfig, rust_log: Option<String>) -> String {
    rust_log
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| cfg.level.clone())
}

fn build_filter(cfg: &LoggingConfig) -> anyhow::Result<EnvFilter> {
    let directive = filter_directive(cfg, std::env::var(EnvFilter::DEFAULT_ENV).ok());
    EnvFilter::try_new(&directive).with_context(|| format!("invalid log filter '{directive}'"))
}

/// Install the global subscriber. Call once, early in `main`.
///
/// # Errors
/// Returns an error if the filter directive is invalid or a global
/// subscriber is already installed.
pub fn init_logging(cfg: &LoggingConfig) -> anyhow::Result<()> {
    let filter = build_filter(cfg)?;

    let installed = match cfg.format {
        LogFormat::Text => tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .try_init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .with_current_span(true)
            .with_span_list(false)
            .try_init(),
    };

    installed.map_err(|e| anyhow::anyhow!("failed to install tracing subscriber: {e}"))
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    fn cfg(level: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_owned(),
            format: LogFormat::Text,
        }
    }

    #[test]
    fn rust_log_wins_when_set() {
        assert_eq!(
            filter_directive(&cfg("info"), Some("debug,hyper=warn".to_owned())),
            "debug,hyper=warn"
        );
    }

    #[test]
    fn blank_rust_log_falls_back_to_config() {
        assert_eq!(filter_directive(&cfg("warn"), Some("  ".to_owned())), "warn");
        assert_eq!(filter_directive(&cfg("warn"), None), "warn");
    }

    #[test]
    fn config_levels_are_valid_directives() {
        for level in ["info", "debug,calculator=trace", "calculator_gateway=debug"] {
            assert!(EnvFilter::try_new(level).is_ok(), "{level}");
        }
    }
}
