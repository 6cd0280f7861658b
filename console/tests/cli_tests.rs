//! End-to-end runs of the `nodeshell` binary.

use std::io::Write;
use std::net::TcpListener;
use std::process::{Command, Output, Stdio};

const BIN: &str = env!("CARGO_BIN_EXE_nodeshell");

fn nodeshell(args: &[&str]) -> Command {
    let mut command = Command::new(BIN);
    command
        .args(args)
        .env_remove("NODESHELL_SERVER")
        .env_remove("NODESHELL_TIMEOUT")
        .env_remove("NODESHELL_LOG_LEVEL")
        .env_remove("RUST_LOG");
    command
}

fn with_stdin(mut command: Command, input: &str) -> Output {
    let mut child = command
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(input.as_bytes())
        .unwrap();
    child.wait_with_output().unwrap()
}

/// An address nothing is listening on.
fn dead_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    addr.to_string()
}

#[test]
fn help_exits_cleanly() {
    let output = nodeshell(&["-help"]).output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("-server"));
    assert!(stdout.contains("-file"));
}

#[test]
fn short_help_flag_exits_cleanly() {
    let output = nodeshell(&["-h"]).output().unwrap();
    assert_eq!(output.status.code(), Some(0));
    assert!(String::from_utf8_lossy(&output.stdout).contains("-server"));
}

#[test]
fn unknown_flag_is_a_config_error() {
    let output = nodeshell(&["-bogus"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("-bogus"));
}

#[test]
fn missing_flag_value_is_a_config_error() {
    let output = nodeshell(&["-server"]).output().unwrap();
    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn missing_script_fails_without_contacting_node() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("absent.txt");
    let server = dead_address();

    let output = nodeshell(&["-server", &server, "-file", script.to_str().unwrap()])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR DURING EXECUTION OF SCRIPT"));
    assert!(stderr.contains("cannot read script"));
}

#[test]
fn script_against_unreachable_node_reports_error() {
    let dir = tempfile::tempdir().unwrap();
    let script = dir.path().join("script.txt");
    std::fs::write(
        &script,
        "balance 0x00000000000000000000000000000000000000a1\n",
    )
    .unwrap();
    let server = dead_address();

    let output = nodeshell(&["-server", &server, "-file", script.to_str().unwrap()])
        .output()
        .unwrap();

    assert_ne!(output.status.code(), Some(0));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR DURING EXECUTION OF SCRIPT"));
    assert!(stderr.contains("line 1"));
}

#[test]
fn interactive_quit_exits_cleanly() {
    let server = dead_address();
    let output = with_stdin(nodeshell(&["-server", &server]), "quit\n");
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "> ");
}

#[test]
fn interactive_errors_do_not_end_the_session() {
    let server = dead_address();
    let output = with_stdin(nodeshell(&["-server", &server]), "block-number\nhelp\nquit\n");

    assert_eq!(output.status.code(), Some(0));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("ERROR DURING EXECUTION OF SCRIPT"));
    assert!(stdout.contains("node unreachable"));
    assert!(stdout.contains("commands:"));
}
