//! Batch and interactive sessions.

use std::path::Path;
use std::time::{Duration, Instant};

use nodeshell_rpc::RpcHandle;
use nodeshell_utils::{format_duration, StatsCounter};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

use crate::command::{help_text, Command};
use crate::error::{EvalError, ShellError};
use crate::statement::Statement;

/// Printed before the detail of a failed interactive statement.
pub const ERROR_HEADER: &str = "ERROR DURING EXECUTION OF SCRIPT";

pub const DEFAULT_PROMPT: &str = "> ";

/// Input that closes an interactive session (and ends a script early).
pub const QUIT: &str = "quit";

const DEFAULT_STATEMENT_TIMEOUT: Duration = Duration::from_secs(30);

const EVALUATED: &str = "evaluated";
const FAILED: &str = "failed";

/// A shell bound to one node handle for its whole lifetime.
///
/// Statements run strictly one after another; the handle is never shared
/// between concurrent calls.
pub struct Shell<H> {
    handle: H,
    prompt: String,
    statement_timeout: Duration,
    stats: StatsCounter,
}

impl<H: RpcHandle> Shell<H> {
    pub fn new(handle: H) -> Self {
        Self {
            handle,
            prompt: DEFAULT_PROMPT.to_string(),
            statement_timeout: DEFAULT_STATEMENT_TIMEOUT,
            stats: StatsCounter::new(&[EVALUATED, FAILED]),
        }
    }

    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Bound on a single statement, remote round trip included.
    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = timeout;
        self
    }

    pub fn handle(&self) -> &H {
        &self.handle
    }

    /// Evaluate one line. Blank lines, comments and null results yield
    /// `Ok(None)`.
    pub async fn evaluate(&self, line: &str) -> Result<Option<Value>, EvalError> {
        match Statement::parse(line) {
            Ok(Some(statement)) => self.execute(&statement).await,
            Ok(None) => Ok(None),
            Err(e) => {
                self.stats.increment(EVALUATED);
                self.stats.increment(FAILED);
                tracing::warn!(error = %e, "statement rejected");
                Err(e)
            }
        }
    }

    async fn execute(&self, statement: &Statement) -> Result<Option<Value>, EvalError> {
        self.stats.increment(EVALUATED);
        let result = self.dispatch(statement).await;
        if let Err(ref e) = result {
            self.stats.increment(FAILED);
            tracing::warn!(command = %statement.command, error = %e, "statement failed");
        }
        result
    }

    async fn dispatch(&self, statement: &Statement) -> Result<Option<Value>, EvalError> {
        let command = Command::parse(statement)?;
        let Some(call) = command.remote_call() else {
            return Ok(Some(Value::String(help_text())));
        };

        tracing::debug!(method = %call.method, params = %call.params, "dispatching statement");
        let result = tokio::time::timeout(
            self.statement_timeout,
            self.handle.request(&call.method, call.params),
        )
        .await
        .map_err(|_| EvalError::Timeout(self.statement_timeout))??;

        Ok((!result.is_null()).then_some(result))
    }

    /// Run a script file once.
    ///
    /// Nothing is evaluated if the file cannot be read.
    pub async fn run_file<W>(&self, path: &Path, out: &mut W) -> Result<(), ShellError>
    where
        W: AsyncWrite + Unpin,
    {
        let source = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ShellError::FileRead {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::info!(path = %path.display(), endpoint = self.handle.endpoint(), "running script");
        self.run_script(&source, out).await
    }

    /// Run script text as one block.
    ///
    /// The whole text is parsed before anything is sent, so a syntax error
    /// on any line means no remote call is made. Statements then run in
    /// order and the first failure ends the run; calls already made are not
    /// undone.
    pub async fn run_script<W>(&self, script: &str, out: &mut W) -> Result<(), ShellError>
    where
        W: AsyncWrite + Unpin,
    {
        let started = Instant::now();
        self.stats.reset();

        let mut statements = Vec::new();
        for (index, text) in script.lines().enumerate() {
            if text.trim() == QUIT {
                break;
            }
            let line = index + 1;
            match Statement::parse_at(text, line) {
                Ok(Some(statement)) => statements.push(statement),
                Ok(None) => {}
                Err(source) => return Err(ShellError::Parse { line, source }),
            }
        }

        let mut outcome = Ok(());
        for statement in &statements {
            match self.execute(statement).await {
                Ok(Some(value)) => write_line(out, &render(&value)).await?,
                Ok(None) => {}
                Err(source) => {
                    outcome = Err(ShellError::Evaluation {
                        line: statement.line,
                        source,
                    });
                    break;
                }
            }
        }

        self.report(started);
        outcome
    }

    /// Prompt, read a line, evaluate, print; until `quit` or end of input.
    ///
    /// A failing statement prints [`ERROR_HEADER`] and its detail, then the
    /// loop carries on.
    pub async fn run_loop<R, W>(&self, mut input: R, out: &mut W) -> Result<(), ShellError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let started = Instant::now();
        self.stats.reset();
        tracing::info!(endpoint = self.handle.endpoint(), "interactive session started");

        let mut buf = Vec::new();
        loop {
            out.write_all(self.prompt.as_bytes()).await?;
            out.flush().await?;

            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                // End of input leaves the cursor after the prompt.
                out.write_all(b"\n").await?;
                break;
            }

            let outcome = match decode_line(&buf) {
                Some(line) if line.trim() == QUIT => break,
                Some(line) => self.evaluate(line).await,
                None => {
                    self.stats.increment(EVALUATED);
                    self.stats.increment(FAILED);
                    tracing::warn!(bytes = buf.len(), "statement is not valid UTF-8");
                    Err(EvalError::Parse("statement is not valid UTF-8".into()))
                }
            };

            match outcome {
                Ok(Some(value)) => write_line(out, &render(&value)).await?,
                Ok(None) => {}
                Err(e) => {
                    write_line(out, ERROR_HEADER).await?;
                    write_line(out, &e.to_string()).await?;
                }
            }
        }

        out.flush().await?;
        self.report(started);
        Ok(())
    }

    fn report(&self, started: Instant) {
        tracing::info!(
            evaluated = self.stats.get(EVALUATED),
            failed = self.stats.get(FAILED),
            elapsed = %format_duration(started.elapsed()),
            "session closed"
        );
    }

    /// Statements evaluated in the current session.
    pub fn evaluated(&self) -> u64 {
        self.stats.get(EVALUATED)
    }

    /// Statements that failed in the current session.
    pub fn failed(&self) -> u64 {
        self.stats.get(FAILED)
    }
}

/// Textual form of a result: strings bare, structures pretty-printed,
/// everything else as JSON.
pub fn render(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Array(_) | Value::Object(_) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        other => other.to_string(),
    }
}

/// One input line without its `\n` or `\r\n` terminator, if it is UTF-8.
fn decode_line(raw: &[u8]) -> Option<&str> {
    let raw = raw.strip_suffix(b"\n").unwrap_or(raw);
    let raw = raw.strip_suffix(b"\r").unwrap_or(raw);
    std::str::from_utf8(raw).ok()
}

async fn write_line<W>(out: &mut W, text: &str) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    out.write_all(text.as_bytes()).await?;
    out.write_all(b"\n").await?;
    out.flush().await
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decode_line_strips_terminators() {
        assert_eq!(decode_line(b"block-number\r\n"), Some("block-number"));
        assert_eq!(decode_line(b"quit\n"), Some("quit"));
        assert_eq!(decode_line(b"accounts"), Some("accounts"));
        assert_eq!(decode_line(b"balance \xff\xfe\n"), None);
    }

    #[test]
    fn render_strings_bare() {
        assert_eq!(render(&json!("0x10")), "0x10");
    }

    #[test]
    fn render_scalars_as_json() {
        assert_eq!(render(&json!(true)), "true");
        assert_eq!(render(&json!(42)), "42");
    }

    #[test]
    fn render_structures_pretty() {
        assert_eq!(render(&json!(["0x1"])), "[\n  \"0x1\"\n]");
    }
}
