//! Blocking runner for the external linter processes
//!
//! Both linters are .NET projects started through `dotnet run`. Each call
//! blocks until the process exits and its output is drained, or until the
//! timeout elapses; a timed-out process is killed and reported as
//! `ToolTimeout`.

use crate::errors::LintError;
use std::io::Read;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Captured output of a finished tool run
#[derive(Debug, Clone)]
pub struct ExternalToolResult {
    /// Standard output
    pub stdout: String,
    /// Standard error
    pub stderr: String,
    /// Process exit code (`None` when killed by a signal)
    pub return_code: Option<i32>,
}

impl ExternalToolResult {
    pub fn success(&self) -> bool {
        self.return_code == Some(0)
    }

    /// stdout followed by stderr
    pub fn combined_output(&self) -> String {
        if self.stderr.is_empty() {
            return self.stdout.clone();
        }
        format!("{}\n{}", self.stdout, self.stderr)
    }

    /// Turn a non-zero exit into a `ToolCrash`
    pub fn require_success(self, tool_name: &str) -> Result<Self, LintError> {
        if self.success() {
            return Ok(self);
        }
        let code = self
            .return_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "signal".to_string());
        let detail = last_lines(&self.combined_output(), 5);
        Err(LintError::ToolCrash {
            tool: tool_name.to_string(),
            message: format!("exited with status {}: {}", code, detail),
        })
    }
}

/// Run an external tool to completion
///
/// # Arguments
/// * `cmd` - Command and arguments to run
/// * `tool_name` - Human-readable tool name for error messages
/// * `timeout` - Wall-clock limit for the process and its output (zero = no timeout)
pub fn run_external_tool(
    cmd: &[String],
    tool_name: &str,
    timeout: Duration,
) -> Result<ExternalToolResult, LintError> {
    let (program, args) = cmd.split_first().ok_or_else(|| LintError::ToolCrash {
        tool: tool_name.to_string(),
        message: "Empty command".to_string(),
    })?;

    debug!("Running {}: {} {:?}", tool_name, program, args);
    let deadline = (!timeout.is_zero()).then(|| Instant::now() + timeout);

    let mut child = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                LintError::ToolNotFound {
                    tool: program.clone(),
                }
            } else {
                LintError::ToolCrash {
                    tool: tool_name.to_string(),
                    message: format!("Failed to run {}: {}", program, e),
                }
            }
        })?;

    // Drain both pipes while waiting so a chatty tool cannot block on a full pipe
    let (tx, rx) = mpsc::channel();
    let mut pending = 0;
    if let Some(pipe) = child.stdout.take() {
        spawn_reader(Stream::Stdout, pipe, tx.clone());
        pending += 1;
    }
    if let Some(pipe) = child.stderr.take() {
        spawn_reader(Stream::Stderr, pipe, tx.clone());
        pending += 1;
    }
    drop(tx);

    let status = wait_with_timeout(&mut child, tool_name, timeout, deadline)?;

    // Processes started by the tool can keep the pipes open after it exits
    let mut stdout = String::new();
    let mut stderr = String::new();
    for _ in 0..pending {
        let received = match deadline {
            Some(deadline) => rx.recv_timeout(deadline.saturating_duration_since(Instant::now())),
            None => rx.recv().map_err(|_| RecvTimeoutError::Disconnected),
        };
        match received {
            Ok((Stream::Stdout, text)) => stdout = text,
            Ok((Stream::Stderr, text)) => stderr = text,
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    "{} exited but its output was still open after {}s",
                    tool_name,
                    timeout.as_secs()
                );
                return Err(timed_out(tool_name, timeout));
            }
            Err(RecvTimeoutError::Disconnected) => break,
        }
    }

    Ok(ExternalToolResult {
        stdout,
        stderr,
        return_code: status.code(),
    })
}

fn wait_with_timeout(
    child: &mut Child,
    tool_name: &str,
    timeout: Duration,
    deadline: Option<Instant>,
) -> Result<ExitStatus, LintError> {
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok(status),
            Ok(None) => {
                if deadline.is_some_and(|d| Instant::now() >= d) {
                    let _ = child.kill();
                    let _ = child.wait();
                    warn!("{} timed out after {}s", tool_name, timeout.as_secs());
                    return Err(timed_out(tool_name, timeout));
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                return Err(LintError::ToolCrash {
                    tool: tool_name.to_string(),
                    message: format!("Failed to wait for {}: {}", tool_name, e),
                })
            }
        }
    }
}

fn timed_out(tool_name: &str, timeout: Duration) -> LintError {
    LintError::ToolTimeout {
        tool: tool_name.to_string(),
        timeout,
    }
}

#[derive(Debug, Clone, Copy)]
enum Stream {
    Stdout,
    Stderr,
}

fn spawn_reader<R: Read + Send + 'static>(stream: Stream, mut pipe: R, tx: Sender<(Stream, String)>) {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        let _ = tx.send((stream, String::from_utf8_lossy(&buf).into_owned()));
    });
}

fn last_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
    lines[lines.len().saturating_sub(n)..].join(" | ")
}
