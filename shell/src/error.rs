use std::path::PathBuf;
use std::time::Duration;

use nodeshell_rpc::RpcError;
use thiserror::Error;

/// Why a single statement failed.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("syntax error: {0}")]
    Parse(String),

    #[error("unknown command: {0} (type `help` for the command list)")]
    UnknownCommand(String),

    #[error("{0}")]
    Usage(String),

    #[error("statement timed out after {0:?}")]
    Timeout(Duration),

    #[error(transparent)]
    Rpc(#[from] RpcError),
}

/// Why a session ended abnormally.
#[derive(Debug, Error)]
pub enum ShellError {
    #[error("cannot read script {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("line {line}: {source}")]
    Parse {
        line: usize,
        #[source]
        source: EvalError,
    },

    #[error("line {line}: {source}")]
    Evaluation {
        line: usize,
        #[source]
        source: EvalError,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ShellError {
    /// Process exit status for a session that ended with this error.
    pub fn exit_code(&self) -> u8 {
        1
    }
}
