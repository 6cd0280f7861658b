//! The nodeshell command shell.
//!
//! A statement is one line of the form `command arg key=value ...`. It is
//! parsed into a [`Statement`], bound to one of a closed set of
//! [`Command`]s and dispatched as a single JSON-RPC call against the
//! session's handle.
//!
//! [`Shell`] runs statements either from a script file (batch) or from an
//! input stream with a prompt (interactive).

pub mod command;
pub mod error;
pub mod session;
pub mod statement;

pub use command::{Command, RemoteCall, COMMANDS};
pub use error::{EvalError, ShellError};
pub use session::{render, Shell, DEFAULT_PROMPT, ERROR_HEADER, QUIT};
pub use statement::Statement;
