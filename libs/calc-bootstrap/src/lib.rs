//! Bootstrap helpers shared by calculator service binaries.
//!
//! - [`config`]: layered `AppConfig` and the lenient per-module loader
//! - [`logging`]: `tracing` subscriber setup
//! - [`signals`]: shutdown signal handling
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod config;
pub mod logging;
pub mod signals;

pub use config::{
    AppConfig, CliArgs, ConfigError, ConfigProvider, ENV_PREFIX, LogFormat, LoggingConfig,
    ServerConfig, module_config_or_default,
};
pub use logging::init_logging;
pub use signals::{ShutdownSignal, wait_for_shutdown};
