//! Integration tests for the `vocl` binary.
//!
//! These only exercise paths that fail or finish before any audio device is
//! opened, so they run on machines without sound hardware.

use std::io::Write;
use std::process::Command;

/// Helper to get the path to the `vocl` binary built by cargo.
fn vocl_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_vocl"))
}

// ---------------------------------------------------------------------------
// Help and version
// ---------------------------------------------------------------------------

#[test]
fn cli_help_lists_subcommands() {
    let output = vocl_bin()
        .arg("--help")
        .output()
        .expect("failed to run vocl --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("info"), "help should list 'info'");
    assert!(stdout.contains("run"), "help should list 'run'");
}

#[test]
fn cli_version() {
    let output = vocl_bin()
        .arg("--version")
        .output()
        .expect("failed to run vocl --version");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("vocl "));
}

#[test]
fn cli_run_help_lists_echo_flags() {
    let output = vocl_bin()
        .args(["run", "--help"])
        .output()
        .expect("failed to run vocl run --help");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for flag in [
        "--input",
        "--output",
        "--delay",
        "--feedback",
        "--mix",
        "--channels",
        "--sample-rate",
        "--buffer-size",
        "--config",
        "--interactive",
    ] {
        assert!(stdout.contains(flag), "run help should mention {flag}");
    }
}

#[test]
fn cli_without_subcommand_fails() {
    let output = vocl_bin().output().expect("failed to run vocl");
    assert!(!output.status.success());
}

#[test]
fn cli_info_rejects_unknown_direction() {
    let output = vocl_bin()
        .args(["info", "--only", "sideways"])
        .output()
        .expect("failed to run vocl info");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("input"));
    assert!(stderr.contains("output"));
}

// ---------------------------------------------------------------------------
// Argument validation (before any device is touched)
// ---------------------------------------------------------------------------

#[test]
fn cli_run_rejects_zero_delay() {
    let output = vocl_bin()
        .args(["run", "--delay", "0"])
        .output()
        .expect("failed to run vocl run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("delay must be a positive number"));
}

#[test]
fn cli_run_rejects_non_numeric_feedback() {
    let output = vocl_bin()
        .args(["run", "--feedback", "lots"])
        .output()
        .expect("failed to run vocl run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--feedback"));
}

#[test]
fn cli_run_rejects_zero_buffer_size() {
    let output = vocl_bin()
        .args(["run", "--buffer-size", "0"])
        .output()
        .expect("failed to run vocl run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("buffer size"));
}

// ---------------------------------------------------------------------------
// Settings file
// ---------------------------------------------------------------------------

#[test]
fn cli_run_missing_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.toml");

    let output = vocl_bin()
        .args(["run", "--config"])
        .arg(&path)
        .output()
        .expect("failed to run vocl run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("nope.toml"));
}

#[test]
fn cli_run_invalid_settings_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[echo]\nspeed = 3").unwrap();

    let output = vocl_bin()
        .args(["run", "--config"])
        .arg(file.path())
        .output()
        .expect("failed to run vocl run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid settings file"));
}

#[test]
fn cli_run_settings_values_are_validated() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[echo]\ndelay_ms = -10.0").unwrap();

    let output = vocl_bin()
        .args(["run", "--config"])
        .arg(file.path())
        .output()
        .expect("failed to run vocl run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("delay must be a positive number"));
}

#[test]
fn cli_flag_overrides_bad_settings_value() {
    // The file's delay is invalid, but the flag wins; the run then gets past
    // validation and fails only at the buffer-size check.
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "[echo]\ndelay_ms = -10.0").unwrap();

    let output = vocl_bin()
        .args(["run", "--delay", "50", "--buffer-size", "0", "--config"])
        .arg(file.path())
        .output()
        .expect("failed to run vocl run");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(!stderr.contains("delay must be"));
    assert!(stderr.contains("buffer size"));
}
