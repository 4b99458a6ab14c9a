/*!
 * Command Runner
 * Argument-vector execution of external tools, one child per call
 */

use std::future::Future;
use std::io;
use std::pin::Pin;
use std::process::Stdio;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::process::Command;

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Arguments following one of these are masked in log output.
const SECRET_FLAGS: &[&str] = &["password", "wifi-sec.psk"];

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("empty command line")]
    Empty,

    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("I/O error while reading command output: {0}")]
    Io(#[from] io::Error),

    #[error("{program} exited with {}", display_code(.code))]
    Exit { program: String, code: Option<i32> },

    #[error("{program} timed out after {}s", .after.as_secs())]
    TimedOut { program: String, after: Duration },
}

impl CommandError {
    /// Exit code of the failed process, when it exited normally.
    pub fn code(&self) -> Option<i32> {
        match self {
            CommandError::Exit { code, .. } => *code,
            _ => None,
        }
    }
}

fn display_code(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("code {}", code),
        None => "a signal".to_string(),
    }
}

/// Split a command line into an argument vector.
///
/// Words are separated by whitespace. A word opening with `"` starts a quoted
/// argument that runs until a word ending with `"`; the words in between are
/// joined with single spaces and the surrounding quotes are dropped. There is
/// no escape for a literal quote.
pub fn tokenize(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut quoted: Option<String> = None;

    for word in line.split_whitespace() {
        match quoted.take() {
            Some(mut acc) => {
                acc.push(' ');
                match word.strip_suffix('"') {
                    Some(last) => {
                        acc.push_str(last);
                        args.push(acc);
                    }
                    None => {
                        acc.push_str(word);
                        quoted = Some(acc);
                    }
                }
            }
            None => match word.strip_prefix('"') {
                Some(rest) => match rest.strip_suffix('"') {
                    Some(inner) => args.push(inner.to_string()),
                    None => quoted = Some(rest.to_string()),
                },
                None => args.push(word.to_string()),
            },
        }
    }

    // Unterminated quote runs to the end of the line
    if let Some(acc) = quoted {
        args.push(acc);
    }

    args
}

/// Render an argument vector for logs, hiding secrets.
pub fn redact(argv: &[String]) -> String {
    let mut out = Vec::with_capacity(argv.len());
    let mut hide_next = false;
    for arg in argv {
        if hide_next {
            out.push("******".to_string());
            hide_next = false;
        } else {
            hide_next = SECRET_FLAGS.contains(&arg.as_str());
            out.push(if arg.contains(' ') {
                format!("\"{}\"", arg)
            } else {
                arg.clone()
            });
        }
    }
    out.join(" ")
}

pub type ExecFuture<'a> = Pin<Box<dyn Future<Output = Result<String, CommandError>> + Send + 'a>>;

/// Something that can run an argument vector and hand back its stdout.
pub trait Execute: Send + Sync {
    fn execute<'a>(&'a self, argv: &'a [String]) -> ExecFuture<'a>;
}

#[derive(Debug, Clone)]
pub struct CommandRunner {
    timeout: Duration,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl CommandRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    pub async fn run(&self, line: &str) -> Result<String, CommandError> {
        self.run_argv(&tokenize(line)).await
    }

    pub async fn run_argv(&self, argv: &[String]) -> Result<String, CommandError> {
        let (program, args) = argv.split_first().ok_or(CommandError::Empty)?;

        tracing::debug!("exec: {}", redact(argv));
        let started = Instant::now();

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| CommandError::Spawn {
                program: program.clone(),
                source,
            })?;

        // Dropping the future on timeout drops the child, which kills it
        let output = match tokio::time::timeout(self.timeout, child.wait_with_output()).await {
            Ok(result) => result?,
            Err(_) => {
                tracing::warn!("{} timed out after {:?}, killed", program, self.timeout);
                return Err(CommandError::TimedOut {
                    program: program.clone(),
                    after: self.timeout,
                });
            }
        };

        tracing::debug!(
            "exit: {} status={} in {}ms",
            program,
            output.status,
            started.elapsed().as_millis()
        );

        if !output.status.success() {
            return Err(CommandError::Exit {
                program: program.clone(),
                code: output.status.code(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

impl Execute for CommandRunner {
    fn execute<'a>(&'a self, argv: &'a [String]) -> ExecFuture<'a> {
        Box::pin(self.run_argv(argv))
    }
}
