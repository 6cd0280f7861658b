//! nodeshell: a command shell for a remote node's JSON-RPC interface.

use std::process::ExitCode;

use anyhow::Context;
use nodeshell_config::{configure, EndpointConfig, Launch};
use nodeshell_rpc::NodeClient;
use nodeshell_shell::{Shell, ERROR_HEADER};
use tokio::io::BufReader;

const EXIT_FAILURE: u8 = 1;
const EXIT_CONFIG: u8 = 2;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match configure(std::env::args().skip(1)) {
        Ok(Launch::Run(config)) => config,
        Ok(Launch::Help(text)) => {
            print!("{text}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("nodeshell: {e}");
            eprintln!("run `nodeshell -help` for usage");
            return ExitCode::from(EXIT_CONFIG);
        }
    };

    nodeshell_utils::init_tracing(&config.log_level);

    match run(config).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("nodeshell: {e:#}");
            ExitCode::from(EXIT_FAILURE)
        }
    }
}

async fn run(config: EndpointConfig) -> anyhow::Result<ExitCode> {
    let client = match NodeClient::new(config.endpoint_url(), config.request_timeout) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("nodeshell: {e}");
            return Ok(ExitCode::from(EXIT_CONFIG));
        }
    };
    tracing::info!(endpoint = %client.endpoint_url(), "connected shell to node");

    let shell = Shell::new(client).with_statement_timeout(config.request_timeout);
    let mut stdout = tokio::io::stdout();

    match &config.script_path {
        Some(path) => {
            if let Err(e) = shell.run_file(path, &mut stdout).await {
                eprintln!("{ERROR_HEADER}");
                eprintln!("{e}");
                return Ok(ExitCode::from(e.exit_code()));
            }
        }
        None => {
            shell
                .run_loop(BufReader::new(tokio::io::stdin()), &mut stdout)
                .await
                .context("interactive session aborted")?;
        }
    }

    Ok(ExitCode::SUCCESS)
}
