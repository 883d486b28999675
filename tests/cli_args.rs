//! Integration tests for CLI argument handling
//!
//! Runs the binary for paths that never touch the network: help output,
//! missing API key, and leaving the prompt straight away.

use std::io::Write;
use std::process::{Command, Output, Stdio};

use tempfile::TempDir;

/// Helper to run the CLI with given args and stdin, capturing output
fn run_cli(args: &[&str], stdin: &str) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_nps-explorer"))
        .args(args)
        .env_remove("MAPQUEST_API_KEY")
        .env_remove("RUST_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to execute nps-explorer");

    // The process may exit before reading its input
    if let Some(mut pipe) = child.stdin.take() {
        let _ = pipe.write_all(stdin.as_bytes());
    }

    child.wait_with_output().expect("Failed to wait for nps-explorer")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"], "");
    assert!(output.status.success(), "Expected --help to exit successfully");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("nps-explorer"), "Help should mention nps-explorer");
    assert!(stdout.contains("--cache-file"), "Help should mention --cache-file");
    assert!(stdout.contains("--api-key"), "Help should mention --api-key");
}

#[test]
fn test_missing_api_key_prints_error_and_exits() {
    let output = run_cli(&[], "exit\n");
    assert!(!output.status.success(), "Expected missing key to fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("API key"),
        "Should print error message about the API key: {}",
        stderr
    );
}

#[test]
fn test_exit_at_state_prompt_fetches_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let cache_file = temp_dir.path().join("site.json");
    let cache_arg = cache_file.to_string_lossy().to_string();

    let output = run_cli(
        &[
            "--api-key",
            "test",
            "--cache-file",
            &cache_arg,
            // Nothing listens here, so any fetch would fail the run
            "--base-url",
            "http://127.0.0.1:9",
        ],
        "EXIT\n",
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Enter a state name"));
    assert!(!stdout.contains("List of national sites"));
    assert!(!cache_file.exists(), "Nothing should be cached on exit");
}

#[test]
fn test_end_of_input_exits_cleanly() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let cache_arg = temp_dir.path().join("site.json").to_string_lossy().to_string();

    let output = run_cli(
        &["--api-key", "test", "--cache-file", &cache_arg, "--base-url", "http://127.0.0.1:9"],
        "",
    );

    assert!(output.status.success());
}

#[test]
fn test_unreachable_site_is_fatal() {
    let temp_dir = TempDir::new().expect("Failed to create temp directory");
    let cache_arg = temp_dir.path().join("site.json").to_string_lossy().to_string();

    let output = run_cli(
        &["--api-key", "test", "--cache-file", &cache_arg, "--base-url", "http://127.0.0.1:9"],
        "michigan\n",
    );

    assert!(!output.status.success(), "A failed fetch should end the run");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("HTTP request failed"), "stderr: {}", stderr);
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use nps_explorer::cli::{Cli, StartupConfig};
    use std::path::PathBuf;

    #[test]
    fn test_cli_verbose_short_flag() {
        let cli = Cli::parse_from(["nps-explorer", "-v"]);
        assert!(cli.verbose);
    }

    #[test]
    fn test_startup_config_from_flags() {
        let cli = Cli::parse_from([
            "nps-explorer",
            "--api-key",
            "abc",
            "--cache-file",
            "here.json",
        ]);
        let config = StartupConfig::from_cli(&cli).unwrap();

        assert_eq!(config.api_key, "abc");
        assert_eq!(config.cache_file, PathBuf::from("here.json"));
        assert_eq!(config.base_url, "https://www.nps.gov");
    }
}
