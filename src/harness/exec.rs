//! Checked external-command abstraction.
//!
//! Every external process the harness drives (compiler, emulator) goes
//! through the `CommandRunner` capability, which returns a structured
//! outcome instead of a bare exit status and enforces a per-invocation
//! timeout so a hung toolchain binary cannot stall the whole run.

use std::io::Read;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};

use crate::error::Result;

/// How polling waits between `try_wait` checks on a running child.
const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(5);

/// How an external invocation ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitDisposition {
    /// Process exited on its own with this code. Termination by signal is
    /// reported as code -1.
    Exited(i32),
    /// Process exceeded the timeout and was killed.
    TimedOut,
}

/// Structured result of one external invocation.
#[derive(Debug, Clone)]
pub struct ExecOutcome {
    pub disposition: ExitDisposition,
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

/// Capability for running external commands.
///
/// `argv` is the full invocation: program first, then its arguments.
#[cfg_attr(test, mockall::automock)]
pub trait CommandRunner {
    fn run(&self, argv: &[String], timeout: Duration) -> Result<ExecOutcome>;
}

/// Production runner backed by `std::process::Command`.
///
/// Stdout and stderr are piped and drained on dedicated reader threads while
/// the parent polls `try_wait` against the deadline; draining concurrently
/// keeps a chatty child from blocking on a full pipe.
#[derive(Debug, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, argv: &[String], timeout: Duration) -> Result<ExecOutcome> {
        let (program, args) = argv.split_first().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "empty command line")
        })?;

        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout_handle = spawn_drain(child.stdout.take());
        let stderr_handle = spawn_drain(child.stderr.take());

        let disposition = wait_with_deadline(&mut child, timeout)?;

        let stdout = stdout_handle.join().unwrap_or_default();
        let stderr = stderr_handle.join().unwrap_or_default();

        Ok(ExecOutcome {
            disposition,
            stdout,
            stderr,
        })
    }
}

/// Drains a captured stream to completion on a background thread.
fn spawn_drain<R: Read + Send + 'static>(
    stream: Option<R>,
) -> std::thread::JoinHandle<Vec<u8>> {
    std::thread::spawn(move || {
        let mut bytes = Vec::new();
        if let Some(mut stream) = stream {
            let _ = stream.read_to_end(&mut bytes);
        }
        bytes
    })
}

/// Polls the child until it exits or the deadline passes; a child that
/// outlives the deadline is killed and reaped.
fn wait_with_deadline(child: &mut Child, timeout: Duration) -> Result<ExitDisposition> {
    let started_at = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(ExitDisposition::Exited(status.code().unwrap_or(-1)));
        }

        if started_at.elapsed() >= timeout {
            terminate_and_reap(child);
            return Ok(ExitDisposition::TimedOut);
        }
        std::thread::sleep(WAIT_POLL_INTERVAL);
    }
}

fn terminate_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sh(script: &str) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), script.to_string()]
    }

    #[test]
    fn test_captures_stdout_and_stderr() {
        let runner = SystemRunner;
        let outcome = runner
            .run(&sh("echo out; echo err >&2"), Duration::from_secs(5))
            .unwrap();

        assert_eq!(outcome.disposition, ExitDisposition::Exited(0));
        assert_eq!(outcome.stdout, b"out\n");
        assert_eq!(outcome.stderr, b"err\n");
    }

    #[test]
    fn test_reports_nonzero_exit_code() {
        let runner = SystemRunner;
        let outcome = runner.run(&sh("exit 3"), Duration::from_secs(5)).unwrap();

        assert_eq!(outcome.disposition, ExitDisposition::Exited(3));
    }

    #[test]
    fn test_times_out_and_kills_hung_process() {
        let runner = SystemRunner;
        let started = Instant::now();
        let outcome = runner
            .run(&sh("sleep 10"), Duration::from_millis(50))
            .unwrap();

        assert_eq!(outcome.disposition, ExitDisposition::TimedOut);
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_missing_program_is_an_io_error() {
        let runner = SystemRunner;
        let argv = vec!["/nonexistent/rivcc".to_string()];
        assert!(runner.run(&argv, Duration::from_secs(1)).is_err());
    }

    #[test]
    fn test_empty_command_line_is_rejected() {
        let runner = SystemRunner;
        assert!(runner.run(&[], Duration::from_secs(1)).is_err());
    }
}
