//! End-to-end tests against a mocked device web UI
//!
//! Each test stands up a mock AirOS login/status/logout sequence and
//! runs the plugin binary against it, asserting on the output line and
//! exit code.

use std::process::Command;

fn mock_device(server: &mut mockito::ServerGuard, body: &str) {
    server.mock("GET", "/login.cgi").with_status(200).create();
    server
        .mock("POST", "/login.cgi")
        .with_status(302)
        .with_header("location", "/status.cgi")
        .create();
    server
        .mock("GET", "/status.cgi")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create();
    server.mock("GET", "/logout.cgi").with_status(200).create();
}

fn run_plugin(server: &mockito::ServerGuard, args: &[&str]) -> std::process::Output {
    Command::new("cargo")
        .args(["run", "-p", "ubnt-check", "--"])
        .args(["-H", &server.url(), "-P", "secret"])
        .args(args)
        .output()
        .expect("Failed to execute command")
}

const AIRMAX_STATUS: &str = r#"{
    "wireless": {
        "signal": -60,
        "chainrssi": [34, 31],
        "noisef": -96,
        "ccq": 947,
        "polling": {"quality": 92, "capacity": 88},
        "txrate": 270,
        "rxrate": 240
    }
}"#;

const AIRFIBER_STATUS: &str = r#"{
    "host": {"fwversion": "v2.2.1"},
    "airfiber": {
        "rxpower0": -42,
        "rxpower1": -44,
        "rxcapacity": 700000000,
        "txcapacity": 690000000,
        "txmodrate": "6x",
        "rxpower0valid": 1,
        "rxpower1valid": 1,
        "rxoverload0": 0,
        "rxoverload1": 0,
        "data_speed": "1000Mbps-Full",
        "linkstate": "operational"
    },
    "wireless": {"distance": 1000},
    "gps": {"dop": 1.2, "sats": 8, "status": 1, "fix": 1}
}"#;

/// Airmax with no thresholds reports every metric and exits OK
#[test]
fn test_airmax_ok_output_line() {
    let mut server = mockito::Server::new();
    mock_device(&mut server, AIRMAX_STATUS);

    let output = run_plugin(&server, &["airmax"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(
        stdout.trim_end(),
        "OK - signal=-60 signalchain0=-62 signalchain1=-65 noise=-96 ccq=94% \
         airmaxquality=92% airmaxcapacity=88% txrate=270 rxrate=240 \
         |'signal'=-60;;;-100;0'signalchain0'=-62;;;-100;0'signalchain1'=-65;;;-100;0\
         'noise'=-96;;;-100;0'ccq'=94%;;;;'airmaxquality'=92%;;;;'airmaxcapacity'=88%;;;;\
         'txrate'=270;;;0;270'rxrate'=240;;;0;270"
    );
}

/// A warning threshold at position 0 names the metric and exits 1
#[test]
fn test_airmax_warning_on_signal() {
    let mut server = mockito::Server::new();
    mock_device(&mut server, AIRMAX_STATUS);

    let output = run_plugin(&server, &["-w", "-50:", "airmax"]);

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.starts_with("WARNING: signal - "),
        "got: {stdout}"
    );
    // The configured threshold decorates the perf data row
    assert!(stdout.contains("'signal'=-60;-50:;;-100;0"), "got: {stdout}");
}

/// A critical threshold beats a warning one at the same position
#[test]
fn test_airmax_critical_wins() {
    let mut server = mockito::Server::new();
    mock_device(&mut server, AIRMAX_STATUS);

    let output = run_plugin(&server, &["-w", "-50:", "-c", "-55:", "airmax"]);

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.starts_with("CRITICAL: signal - "),
        "got: {stdout}"
    );
}

/// Airfiber on v2 firmware skips the DAC temperatures and exits OK
#[test]
fn test_airfiber_ok() {
    let mut server = mockito::Server::new();
    mock_device(&mut server, AIRFIBER_STATUS);

    let output = run_plugin(&server, &["airfiber"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("OK - "), "got: {stdout}");
    assert!(stdout.contains("airfiber.txmodrate=6 "), "got: {stdout}");
    assert!(!stdout.contains("dactemp"), "got: {stdout}");
    assert!(
        stdout.contains("'gps.dop_quality'=90%;;;0;100"),
        "got: {stdout}"
    );
    assert!(
        stdout.contains("'airfiber.linkstate'=operational;;;;"),
        "got: {stdout}"
    );
}

/// A failed boolean check is CRITICAL and names the key
#[test]
fn test_airfiber_boolean_mismatch_is_critical() {
    let status = AIRFIBER_STATUS.replace(r#""fix": 1"#, r#""fix": 0"#);
    let mut server = mockito::Server::new();
    mock_device(&mut server, &status);

    let output = run_plugin(&server, &["airfiber"]);

    assert_eq!(output.status.code(), Some(2));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("CRITICAL: gps.fix - "), "got: {stdout}");
    assert!(stdout.contains("'gps.fix'=0;;;;"), "got: {stdout}");
}

/// A boolean key missing from the response is UNKNOWN
#[test]
fn test_airfiber_missing_boolean_key_is_unknown() {
    let status = AIRFIBER_STATUS.replace(r#""status": 1, "#, "");
    let mut server = mockito::Server::new();
    mock_device(&mut server, &status);

    let output = run_plugin(&server, &["airfiber"]);

    assert_eq!(output.status.code(), Some(3));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(
        stdout.starts_with("UNKNOWN: gps.status"),
        "got: {stdout}"
    );
}
