//! Command-line parsing.
//!
//! The console accepts single-dash long flags (`-server host:port`). Tokens
//! are scanned pairwise, rewritten to clap's `--name=value` form and then
//! handed to clap for typed parsing and help text. `NODESHELL_*` variables
//! fill in whatever the flags leave unset.

use std::path::PathBuf;
use std::time::Duration;

use clap::error::ErrorKind;
use clap::Parser;

use crate::endpoint::{EndpointConfig, DEFAULT_LOG_LEVEL, DEFAULT_REMOTE_ADDRESS, DEFAULT_TIMEOUT_SECS};
use crate::error::ConfigError;
use crate::file::ConfigFile;

pub const ENV_SERVER: &str = "NODESHELL_SERVER";
pub const ENV_TIMEOUT: &str = "NODESHELL_TIMEOUT";
pub const ENV_LOG_LEVEL: &str = "NODESHELL_LOG_LEVEL";

/// Recognized flags and whether each one consumes a value.
const FLAGS: &[(&str, bool)] = &[
    ("file", true),
    ("server", true),
    ("timeout", true),
    ("log-level", true),
    ("config", true),
    ("help", false),
    ("h", false),
];

#[derive(Parser, Debug)]
#[command(
    name = "nodeshell",
    about = "Interactive and batch shell for a node's JSON-RPC endpoint",
    no_binary_name = true,
    args_override_self = true,
    override_usage = "nodeshell [-file <path>] [-server <host:port>] [-timeout <secs>] [-log-level <level>] [-config <path>] [-help]",
    after_help = "Flags may be written with one dash (-server) or two (--server).\n\
                  Unset flags fall back to NODESHELL_SERVER, NODESHELL_TIMEOUT and\n\
                  NODESHELL_LOG_LEVEL, then to the -config file."
)]
struct Cli {
    /// Run the statements in this file once, then exit.
    #[arg(long, value_name = "PATH")]
    file: Option<PathBuf>,

    /// JSON-RPC endpoint address [default: localhost:4444].
    #[arg(long, value_name = "HOST:PORT")]
    server: Option<String>,

    /// Per-statement timeout in seconds [default: 30].
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,

    /// Log filter used when RUST_LOG is unset [default: warn].
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// TOML file with server, timeout_secs and log_level defaults.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

/// What the process should do after parsing its arguments.
#[derive(Debug)]
pub enum Launch {
    /// Start a shell with this configuration.
    Run(EndpointConfig),
    /// `-help` was given: print the text and exit cleanly.
    Help(String),
}

/// Parse the process arguments (without the program name) against the
/// process environment.
///
/// Any unrecognized flag fails the whole parse; nothing is kept from the
/// tokens scanned before it.
pub fn configure<I, T>(args: I) -> Result<Launch, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    configure_with_env(args, |name| std::env::var(name).ok())
}

/// [`configure`] with an explicit environment lookup.
pub fn configure_with_env<I, T, E>(args: I, env: E) -> Result<Launch, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
    E: Fn(&str) -> Option<String>,
{
    let normalized = normalize(args)?;

    let cli = match Cli::try_parse_from(normalized) {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::DisplayHelp => {
            return Ok(Launch::Help(e.render().to_string()));
        }
        Err(e) => return Err(ConfigError::InvalidValue(first_line(&e.render().to_string()))),
    };

    let file = match &cli.config {
        Some(path) => ConfigFile::load(path)?,
        None => ConfigFile::default(),
    };

    let remote_address = cli
        .server
        .or_else(|| env(ENV_SERVER))
        .or(file.server)
        .unwrap_or_else(|| DEFAULT_REMOTE_ADDRESS.to_string());
    if remote_address.trim().is_empty() {
        return Err(ConfigError::InvalidValue("server address is empty".into()));
    }

    let env_timeout = match env(ENV_TIMEOUT) {
        Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
            ConfigError::InvalidValue(format!("{ENV_TIMEOUT}={raw}: {e}"))
        })?),
        None => None,
    };
    let timeout_secs = cli
        .timeout
        .or(env_timeout)
        .or(file.timeout_secs)
        .unwrap_or(DEFAULT_TIMEOUT_SECS);
    if timeout_secs == 0 {
        return Err(ConfigError::InvalidValue("timeout must be at least 1 second".into()));
    }

    Ok(Launch::Run(EndpointConfig {
        remote_address,
        script_path: cli.file,
        request_timeout: Duration::from_secs(timeout_secs),
        log_level: cli
            .log_level
            .or_else(|| env(ENV_LOG_LEVEL))
            .or(file.log_level)
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string()),
    }))
}

/// Rewrite `-name value` pairs into `--name=value` tokens.
///
/// The `=` form lets a value start with `-` without clap mistaking it for a
/// flag.
fn normalize<I, T>(args: I) -> Result<Vec<String>, ConfigError>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let mut tokens = args.into_iter().map(Into::into);
    let mut normalized = Vec::new();

    while let Some(token) = tokens.next() {
        let body = token
            .strip_prefix("--")
            .or_else(|| token.strip_prefix('-'))
            .filter(|body| !body.is_empty())
            .ok_or_else(|| ConfigError::InvalidOption(token.clone()))?;

        let (name, inline_value) = match body.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None => (body, None),
        };

        let takes_value = FLAGS
            .iter()
            .find(|(flag, _)| *flag == name)
            .map(|(_, takes_value)| *takes_value)
            .ok_or_else(|| ConfigError::InvalidOption(token.clone()))?;

        if takes_value {
            let value = match inline_value {
                Some(value) => value,
                None => tokens
                    .next()
                    .ok_or_else(|| ConfigError::MissingValue(format!("-{name}")))?,
            };
            normalized.push(format!("--{name}={value}"));
        } else if inline_value.is_some() {
            return Err(ConfigError::InvalidOption(token));
        } else {
            // `-h` is the short spelling clap lists for help.
            normalized.push("--help".to_string());
        }
    }

    Ok(normalized)
}

fn first_line(rendered: &str) -> String {
    rendered
        .lines()
        .next()
        .unwrap_or_default()
        .trim_start_matches("error: ")
        .to_string()
}
