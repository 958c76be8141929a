#![cfg(all(unix, feature = "cli"))]

use std::process::{Command, Output};

fn cusi(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_cusi"))
        .args(args)
        .env_remove("CUSI_BAUD")
        .env_remove("CUSI_TIMEOUT")
        .output()
        .expect("cusi should run")
}

#[test]
fn version_flag_prints_name_and_version() {
    let output = cusi(&["-v"]);

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert_eq!(stdout.trim(), format!("cusi {}", env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_port_prints_help_and_exits_2() {
    let output = cusi(&[]);

    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Usage"), "stderr: {stderr}");
}

#[test]
fn unopenable_port_exits_3() {
    let output = cusi(&["/dev/cusi-test-no-such-port"]);

    assert_eq!(output.status.code(), Some(3));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Connecting to /dev/cusi-test-no-such-port ... "));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: open failed"), "stderr: {stderr}");
}

#[test]
fn invalid_timeout_is_a_usage_error() {
    let output = cusi(&["--timeout", "soon", "/dev/cusi-test-no-such-port"]);

    assert_eq!(output.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid duration value: soon"), "stderr: {stderr}");
}

#[test]
fn timeout_from_environment_is_validated() {
    let output = Command::new(env!("CARGO_BIN_EXE_cusi"))
        .arg("/dev/cusi-test-no-such-port")
        .env("CUSI_TIMEOUT", "0ms")
        .output()
        .expect("cusi should run");

    assert_eq!(output.status.code(), Some(2));
}
