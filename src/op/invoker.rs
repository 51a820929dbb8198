/// Process execution: spawn `op`, feed stdin, collect stdout/stderr.
use std::io::{self, Read, Write};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use super::args::Invocation;
use super::config::{CancelToken, ClientConfig, STDIN_PREVIEW_CHARS};
use super::errors::OpError;

/// How often a running process is polled when a timeout or cancel token is set.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Executes an assembled [`Invocation`] and returns raw stdout.
///
/// [`ProcessRunner`] is the real implementation; tests substitute a recorder.
pub trait Runner: Send + Sync {
    /// Run one invocation to completion.
    ///
    /// # Errors
    ///
    /// Returns `OpError` when the process cannot be started, exits non-zero, or is
    /// killed by a timeout or cancellation.
    fn run(&self, invocation: &Invocation) -> Result<Vec<u8>, OpError>;
}

/// Runs the configured binary as a child process, one process per call.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    config: ClientConfig,
}

impl ProcessRunner {
    #[must_use]
    pub fn new(config: ClientConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Write the command line and a stdin preview. Write failures are ignored.
    fn echo(&self, out: &mut dyn Write, argv: &[String], stdin: Option<&[u8]>) {
        let program = self.config.program.display().to_string();
        let _ = writeln!(out, "[debug] {}", command_line(&program, argv));
        if let Some(bytes) = stdin {
            let _ = writeln!(out, "[debug] stdin ({} bytes): {}", bytes.len(), stdin_preview(bytes));
        }
    }

    fn is_cancelled(&self) -> bool {
        self.config.cancel.as_ref().is_some_and(CancelToken::is_cancelled)
    }

    /// Wait for exit, killing the child if the timeout elapses or the token fires.
    fn wait(&self, child: &mut Child) -> Result<ExitStatus, OpError> {
        if self.config.timeout.is_none() && self.config.cancel.is_none() {
            return Ok(child.wait()?);
        }

        let started = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if self.is_cancelled() {
                kill(child);
                return Err(OpError::Cancelled);
            }
            if let Some(timeout) = self.config.timeout {
                if started.elapsed() >= timeout {
                    kill(child);
                    return Err(OpError::TimedOut(timeout));
                }
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Runner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> Result<Vec<u8>, OpError> {
        // A token that already fired means nothing is launched, not even a mutation.
        if self.is_cancelled() {
            tracing::debug!(subcommand = invocation.subcommand, "cancelled before launch");
            return Err(OpError::Cancelled);
        }

        let mut argv = self.config.leading_args();
        argv.extend(invocation.argv());

        let _timer = DebugTimer::new(invocation.subcommand, self.config.debug);
        if self.config.debug {
            self.echo(&mut io::stderr().lock(), &argv, invocation.stdin.as_deref());
        }
        tracing::debug!(
            program = %self.config.program.display(),
            subcommand = invocation.subcommand,
            args = argv.len(),
            stdin = invocation.stdin.as_ref().map_or(0, Vec::len),
            "running op"
        );

        let stdin_mode = if invocation.stdin.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        };
        let mut child = Command::new(&self.config.program)
            .args(&argv)
            .stdin(stdin_mode)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| OpError::Launch {
                program: self.config.program.display().to_string(),
                source,
            })?;

        // Stdin is written on its own thread so a large payload cannot deadlock
        // against a child that is blocked writing stdout.
        let writer = match (child.stdin.take(), invocation.stdin.clone()) {
            (Some(mut pipe), Some(bytes)) => Some(thread::spawn(move || pipe.write_all(&bytes))),
            _ => None,
        };
        let stdout = spawn_reader(child.stdout.take());
        let stderr = spawn_reader(child.stderr.take());

        let status = self.wait(&mut child)?;
        let stdout = join(stdout)?;
        let stderr = join(stderr)?;
        tracing::trace!(status = ?status.code(), stdout = stdout.len(), stderr = stderr.len(), "op exited");

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr).into_owned();
            tracing::debug!(status = ?status.code(), "op failed");
            return Err(if stderr.is_empty() {
                OpError::Exit {
                    status: status.code(),
                }
            } else {
                OpError::Tool {
                    status: status.code(),
                    stderr,
                }
            });
        }

        if let Some(writer) = writer {
            match join(writer) {
                Err(OpError::Io(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
                other => other?,
            }
        }

        Ok(stdout)
    }
}

fn kill(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}

fn spawn_reader<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut buf)?;
        }
        Ok(buf)
    })
}

fn join<T>(handle: JoinHandle<io::Result<T>>) -> Result<T, OpError> {
    handle
        .join()
        .map_err(|_| io::Error::other("op pipe thread panicked"))?
        .map_err(OpError::from)
}

/// Render a command line for display, single-quoting arguments that need it.
#[must_use]
pub fn command_line(program: &str, argv: &[String]) -> String {
    let mut line = program.to_owned();
    for arg in argv {
        line.push(' ');
        if arg.is_empty() || arg.chars().any(|c| c.is_whitespace() || matches!(c, '\'' | '"' | '\\' | '$')) {
            line.push('\'');
            line.push_str(&arg.replace('\'', r"'\''"));
            line.push('\'');
        } else {
            line.push_str(arg);
        }
    }
    line
}

/// At most [`STDIN_PREVIEW_CHARS`] characters of a stdin payload.
#[must_use]
pub fn stdin_preview(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes)
        .chars()
        .take(STDIN_PREVIEW_CHARS)
        .collect()
}

// --- Debug timer ---

/// A RAII timer that prints elapsed milliseconds to stderr on drop.
///
/// Does nothing when `active` is false.
pub struct DebugTimer {
    label: &'static str,
    start: Instant,
    active: bool,
}

impl DebugTimer {
    #[must_use]
    pub fn new(label: &'static str, active: bool) -> Self {
        Self {
            label,
            start: Instant::now(),
            active,
        }
    }
}

impl Drop for DebugTimer {
    fn drop(&mut self) {
        if self.active {
            let ms = self.start.elapsed().as_secs_f64() * 1000.0;
            eprintln!("[debug] op {}: {ms:.2}ms", self.label);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_line_quotes_when_needed() {
        let argv: Vec<String> = ["item", "get", "My Login", "--vault", "it's", "--format", "json"]
            .iter()
            .map(|s| (*s).to_owned())
            .collect();
        assert_eq!(
            command_line("op", &argv),
            r"op item get 'My Login' --vault 'it'\''s' --format json"
        );
    }

    #[test]
    fn test_stdin_preview_truncates_to_limit() {
        let long = "x".repeat(STDIN_PREVIEW_CHARS + 100);
        assert_eq!(stdin_preview(long.as_bytes()).chars().count(), STDIN_PREVIEW_CHARS);

        let short = br#"[{"id":"abc"}]"#;
        assert_eq!(stdin_preview(short), r#"[{"id":"abc"}]"#);
    }

    #[test]
    fn test_stdin_preview_counts_chars_not_bytes() {
        let wide = "é".repeat(STDIN_PREVIEW_CHARS + 1);
        let preview = stdin_preview(wide.as_bytes());
        assert_eq!(preview.chars().count(), STDIN_PREVIEW_CHARS);
        assert!(preview.chars().all(|c| c == 'é'));
    }

    #[test]
    fn test_echo_writes_command_line_and_stdin_preview() {
        let runner = ProcessRunner::new(ClientConfig::new().debug(true));
        let inv = crate::op::args::get_items(&["a1", "b2"], "Private").unwrap();
        let stdin = inv.stdin.clone().unwrap();

        let mut out = Vec::new();
        runner.echo(&mut out, &inv.argv(), inv.stdin.as_deref());
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "[debug] op item get - --vault Private --format json");
        assert_eq!(
            lines[1],
            format!("[debug] stdin ({} bytes): {}", stdin.len(), String::from_utf8_lossy(&stdin))
        );
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn test_echo_truncates_long_stdin() {
        let runner = ProcessRunner::default();
        let ids: Vec<String> = (0..200).map(|i| format!("item-{i:04}")).collect();
        let inv = crate::op::args::get_items(&ids, "").unwrap();
        let total = inv.stdin.as_ref().map_or(0, Vec::len);
        assert!(total > STDIN_PREVIEW_CHARS);

        let mut out = Vec::new();
        runner.echo(&mut out, &inv.argv(), inv.stdin.as_deref());
        let text = String::from_utf8(out).unwrap();
        let stdin_line = text.lines().nth(1).unwrap();
        let prefix = format!("[debug] stdin ({total} bytes): ");
        assert!(stdin_line.starts_with(&prefix), "{stdin_line}");
        assert_eq!(stdin_line[prefix.len()..].chars().count(), STDIN_PREVIEW_CHARS);
    }

    #[test]
    fn test_echo_without_stdin_is_one_line() {
        let runner = ProcessRunner::default();
        let inv = crate::op::args::list_vaults();
        let mut out = Vec::new();
        runner.echo(&mut out, &inv.argv(), None);
        assert_eq!(String::from_utf8(out).unwrap(), "[debug] op vault list --format json\n");
    }

    #[test]
    fn test_cancelled_token_prevents_launch() {
        let token = CancelToken::new();
        token.cancel();
        // A binary that cannot exist: reaching spawn would yield a launch error instead.
        let runner =
            ProcessRunner::new(ClientConfig::new().program("/nonexistent/opshim-test-op").cancel_token(token));
        let err = runner.run(&crate::op::args::list_vaults()).unwrap_err();
        assert!(matches!(err, OpError::Cancelled), "{err:?}");
    }

    #[test]
    fn test_missing_binary_is_launch_error() {
        let runner = ProcessRunner::new(ClientConfig::new().program("/nonexistent/opshim-test-op"));
        let inv = crate::op::args::list_vaults();
        let err = runner.run(&inv).unwrap_err();
        assert!(matches!(err, OpError::Launch { .. }), "{err:?}");
    }
}
