#![allow(clippy::unwrap_used, clippy::expect_used)]

//! CLI smoke tests for the calc-server binary.

use std::io::Write;
use std::process::{Command, Stdio};

fn run_calc_server(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_calc-server"))
        .args(args)
        .env_remove("RUST_LOG")
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute calc-server")
}

fn config_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[test]
fn help_lists_subcommands_and_options() {
    let output = run_calc_server(&["--help"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Usage:"));
    assert!(stdout.contains("run"));
    assert!(stdout.contains("check"));
    assert!(stdout.contains("--config"));
    assert!(stdout.contains("--print-config"));
}

#[test]
fn missing_config_file_fails() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.yaml");
    let output = run_calc_server(&["--config", missing.to_str().unwrap(), "check"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("config file does not exist"), "{stderr}");
}

#[test]
fn print_config_renders_merged_yaml() {
    let file = config_file(
        r"
logging:
  level: warn
modules:
  calculator:
    config:
      max_commands: 50
",
    );
    let output = run_calc_server(&["--config", file.path().to_str().unwrap(), "--print-config"]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Effective configuration"));
    assert!(stdout.contains("level: warn"));
    assert!(stdout.contains("max_commands: 50"));
}

#[test]
fn verbose_flag_raises_log_level() {
    let output = run_calc_server(&["-vv", "--print-config"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("level: debug"));
}

#[test]
fn check_accepts_defaults() {
    let output = run_calc_server(&["check"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Configuration is valid"));
}

#[test]
fn check_rejects_invalid_module_config() {
    let file = config_file(
        r"
modules:
  calculator_gateway:
    config:
      cors_enabled: true
      cors:
        allowed_origins: ['*']
        allow_credentials: true
",
    );
    let output = run_calc_server(&["--config", file.path().to_str().unwrap(), "check"]);
    assert!(!output.status.success());
}

#[test]
fn check_rejects_unknown_module_fields() {
    let file = config_file(
        r"
modules:
  calculator:
    config:
      max_comands: 5
",
    );
    let output = run_calc_server(&["--config", file.path().to_str().unwrap(), "check"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("calculator"));
}

#[test]
fn sample_config_passes_check() {
    let sample = concat!(env!("CARGO_MANIFEST_DIR"), "/../../config/calc.yaml");
    let output = run_calc_server(&["--config", sample, "check"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
}
