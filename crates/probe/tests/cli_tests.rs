//! CLI integration tests for the MRTG probe

use std::process::Command;

fn run_probe(args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "-p", "ubnt-probe", "--"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

/// Test that the probe shows help
#[test]
fn test_cli_help() {
    let output = run_probe(&["--help"]);

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Probe help should succeed");
    assert!(stdout.contains("--source"), "Should show source option");
    assert!(stdout.contains("--keys"), "Should show keys option");
    assert!(stdout.contains("--formulas"), "Should show formulas option");
}

/// Test that the probe shows its version and exits 0
#[test]
fn test_cli_version() {
    let output = run_probe(&["--version"]);

    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Version should exit 0");
    assert!(stdout.contains("mrtg_ubnt_probe"), "Should show binary name");
}

/// Test that failures follow the MRTG contract: ERROR on stdout, exit 0
#[test]
fn test_unreachable_device_prints_error_and_exits_zero() {
    let output = run_probe(&[
        "-H",
        "http://127.0.0.1:1",
        "-P",
        "x",
        "-s",
        "status",
        "-k",
        "wireless.txrate",
        "wireless.rxrate",
    ]);

    assert_eq!(output.status.code(), Some(0), "Probe should still exit 0");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.starts_with("ERROR: "),
        "Should print the error marker, got: {stdout}"
    );
}

/// Test that a bad formula is reported without contacting the device
#[test]
fn test_invalid_formula_is_reported() {
    let output = run_probe(&[
        "-H",
        "http://127.0.0.1:1",
        "-P",
        "x",
        "-s",
        "status",
        "-k",
        "wireless.txrate",
        "wireless.rxrate",
        "-f",
        "VAL**2",
        "",
    ]);

    assert_eq!(output.status.code(), Some(0), "Probe should still exit 0");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.contains("'VAL**2' is not a valid formula"),
        "Should name the bad formula, got: {stdout}"
    );
}

/// Test that -k requires exactly two keys
#[test]
fn test_keys_option_requires_two_values() {
    let output = run_probe(&[
        "-H",
        "http://127.0.0.1:1",
        "-P",
        "x",
        "-s",
        "status",
        "-k",
        "wireless.txrate",
    ]);

    assert!(!output.status.success(), "One key should be a usage error");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("values"),
        "Should show error message"
    );
}

/// Test missing required source option
#[test]
fn test_missing_source() {
    let output = run_probe(&["-H", "http://example.com", "-P", "x", "-k", "a", "b"]);

    assert!(!output.status.success(), "Missing source should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("required") || stderr.contains("error"),
        "Should show error about missing argument"
    );
}
