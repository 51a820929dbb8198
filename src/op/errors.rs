/// Errors from the `op` client layer.
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while invoking `op` or decoding its output.
#[derive(Debug, Error)]
pub enum OpError {
    /// The binary could not be started (missing from `PATH`, not executable, ...).
    #[error("failed to run '{program}': {source}")]
    Launch {
        /// Program that was being spawned.
        program: String,
        /// Underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// `op` exited non-zero and wrote a diagnostic to stderr.
    #[error("op returned err: {stderr}")]
    Tool {
        /// Exit code, if the process was not killed by a signal.
        status: Option<i32>,
        /// Captured stderr, verbatim.
        stderr: String,
    },

    /// `op` exited non-zero without writing anything to stderr.
    #[error("op exited unsuccessfully ({})", display_status(*status))]
    Exit {
        /// Exit code, if the process was not killed by a signal.
        status: Option<i32>,
    },

    /// Stdout could not be decoded into the requested shape.
    #[error("malformed op response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A required list argument was empty. Raised before any process is spawned.
    #[error("no {what} specified")]
    EmptyInput {
        /// What was missing, e.g. "assignments".
        what: &'static str,
    },

    /// A string could not be parsed as an `op://vault/item/field` reference.
    #[error("invalid secret reference '{reference}'")]
    InvalidReference {
        /// The rejected input.
        reference: String,
    },

    /// A batched read did not yield a value for one of its references.
    #[error("no value returned for '{reference}'")]
    MissingSecret {
        /// The reference without a value.
        reference: String,
    },

    /// The caller-configured timeout elapsed; the process was killed.
    #[error("op did not finish within {0:?}")]
    TimedOut(Duration),

    /// The caller's cancel token fired; the process was killed.
    #[error("op invocation cancelled")]
    Cancelled,

    /// I/O failure while talking to a running process.
    #[error("I/O error talking to op: {0}")]
    Io(#[from] std::io::Error),
}

fn display_status(status: Option<i32>) -> String {
    status.map_or_else(|| "terminated by signal".to_owned(), |c| format!("exit code {c}"))
}

impl OpError {
    /// Return the CLI exit code for this error.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::EmptyInput { .. } | Self::InvalidReference { .. } => 2,
            Self::Launch { .. } | Self::Tool { .. } | Self::Exit { .. } | Self::Io(_) => 3,
            Self::Decode(_) | Self::MissingSecret { .. } => 4,
            Self::TimedOut(_) | Self::Cancelled => 5,
        }
    }

    /// Stderr text written by `op`, when the failure came from the tool itself.
    #[must_use]
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::Tool { stderr, .. } => Some(stderr),
            _ => None,
        }
    }
}
