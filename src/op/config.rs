/// Client configuration: which binary to run and how to run it.
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Default binary name, resolved through `PATH`.
pub const DEFAULT_PROGRAM: &str = "op";

/// Length limit, in characters, of the stdin preview printed in debug mode.
pub const STDIN_PREVIEW_CHARS: usize = 512;

/// Shared flag that aborts in-flight invocations when set.
///
/// Clones share the same flag, so one token can be handed to a client and kept by
/// the caller to cancel from another thread.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Settings threaded into the invoker at construction time.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Binary to execute.
    pub program: PathBuf,
    /// Arguments placed before everything else (e.g. a wrapper script's own args).
    pub program_args: Vec<String>,
    /// `--account` to target when several accounts are signed in.
    pub account: Option<String>,
    /// Echo command lines and stdin previews to stderr.
    pub debug: bool,
    /// Kill the process if it runs longer than this. `None` waits forever.
    pub timeout: Option<Duration>,
    /// Kill the process when this token is cancelled.
    pub cancel: Option<CancelToken>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
            program_args: Vec::new(),
            account: None,
            debug: false,
            timeout: None,
            cancel: None,
        }
    }
}

impl ClientConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    #[must_use]
    pub fn program_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.program_args = args.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.account = Some(account.into());
        self
    }

    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    #[must_use]
    pub fn cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Arguments that precede the subcommand on every call.
    #[must_use]
    pub fn leading_args(&self) -> Vec<String> {
        let mut args = self.program_args.clone();
        if let Some(account) = &self.account {
            args.push("--account".to_owned());
            args.push(account.clone());
        }
        args
    }
}
