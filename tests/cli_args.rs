//! Integration tests for CLI argument handling
//!
//! Runs the refcache binary to verify argument parsing without touching the
//! network.

use std::process::Command;

/// Helper to run the CLI with given args and capture output
fn run_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_refcache"))
        .args(args)
        .output()
        .expect("Failed to execute refcache")
}

#[test]
fn test_help_flag_exits_successfully() {
    let output = run_cli(&["--help"]);
    assert!(
        output.status.success(),
        "Expected --help to exit successfully"
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("refcache"), "Help should mention refcache");
    assert!(stdout.contains("ttl"), "Help should mention the --ttl flag");
    assert!(
        stdout.contains("cache-file"),
        "Help should mention the --cache-file flag"
    );
}

#[test]
fn test_missing_url_prints_error_and_exits() {
    let output = run_cli(&[]);
    assert!(!output.status.success(), "Expected missing URL to fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("URL") || stderr.contains("url") || stderr.contains("required"),
        "Should print an error about the missing URL argument: {}",
        stderr
    );
}

#[test]
fn test_negative_ttl_is_rejected() {
    let output = run_cli(&["https://example.com/a.json", "--ttl", "-5"]);
    assert!(!output.status.success(), "Expected negative ttl to fail");
}

#[cfg(test)]
mod unit_tests {
    //! Unit tests for CLI parsing that don't require running the binary

    use clap::Parser;
    use refcache::cli::Cli;

    #[test]
    fn test_cli_url_is_positional() {
        let cli = Cli::parse_from(["refcache", "https://e/a"]);
        assert_eq!(cli.url, "https://e/a");
    }

    #[test]
    fn test_cli_ttl_and_cache_file_combine() {
        let cli = Cli::parse_from([
            "refcache",
            "https://e/a",
            "--ttl",
            "1000",
            "--cache-file",
            "/tmp/r.json",
        ]);
        assert_eq!(cli.ttl, 1000);
        assert_eq!(cli.cache_file.as_deref(), Some(std::path::Path::new("/tmp/r.json")));
    }
}
