use std::fs;
use std::time::Duration;

use nodeshell_config::{configure_with_env, ConfigError, EndpointConfig, Launch, ENV_SERVER};

fn configure(args: Vec<String>) -> Result<Launch, ConfigError> {
    configure_with_env(args, |_| None)
}

fn run(args: Vec<String>) -> EndpointConfig {
    match configure(args) {
        Ok(Launch::Run(config)) => config,
        other => panic!("expected a run configuration, got {other:?}"),
    }
}

#[test]
fn file_supplies_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nodeshell.toml");
    fs::write(
        &path,
        "server = \"node.internal:8545\"\ntimeout_secs = 3\nlog_level = \"debug\"\n",
    )
    .unwrap();

    let config = run(vec!["-config".into(), path.display().to_string()]);
    assert_eq!(config.remote_address, "node.internal:8545");
    assert_eq!(config.request_timeout, Duration::from_secs(3));
    assert_eq!(config.log_level, "debug");
}

#[test]
fn flags_override_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nodeshell.toml");
    fs::write(&path, "server = \"node.internal:8545\"\ntimeout_secs = 3\n").unwrap();

    let config = run(vec![
        "-config".into(),
        path.display().to_string(),
        "-server".into(),
        "127.0.0.1:4444".into(),
    ]);
    assert_eq!(config.remote_address, "127.0.0.1:4444");
    assert_eq!(config.request_timeout, Duration::from_secs(3));
}

#[test]
fn zero_timeout_in_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nodeshell.toml");
    fs::write(&path, "timeout_secs = 0\n").unwrap();

    let result = configure(vec!["-config".to_string(), path.display().to_string()]);
    assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
}

#[test]
fn unreadable_config_file_fails_configuration() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.toml");

    let result = configure(vec!["-config".to_string(), path.display().to_string()]);
    assert!(matches!(result, Err(ConfigError::ConfigFile { .. })));
}

#[test]
fn environment_overrides_file_but_not_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nodeshell.toml");
    fs::write(&path, "server = \"file.node:8545\"\n").unwrap();
    let env = |name: &str| (name == ENV_SERVER).then(|| "env.node:8545".to_string());

    let from_env = configure_with_env(vec!["-config".to_string(), path.display().to_string()], env);
    assert!(matches!(from_env, Ok(Launch::Run(ref c)) if c.remote_address == "env.node:8545"));

    let from_flag = configure_with_env(
        vec![
            "-config".to_string(),
            path.display().to_string(),
            "-server".to_string(),
            "flag.node:8545".to_string(),
        ],
        env,
    );
    assert!(matches!(from_flag, Ok(Launch::Run(ref c)) if c.remote_address == "flag.node:8545"));
}
