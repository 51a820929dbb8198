/// Serializable output types that are not plain `op` records.
///
/// Vaults and items are written as the library records themselves; these cover
/// secret values and the error envelope.
use serde::{Deserialize, Serialize};

use opshim::OpError;

/// One secret value read by reference.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecretOutput {
    /// The `op://` reference that was read.
    pub reference: String,
    /// Plaintext value.
    pub value: String,
}

/// A structured error envelope for JSON error output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorOutput {
    /// Always `false`.
    pub ok: bool,
    /// Error details.
    pub error: ErrorDetail,
}

/// Error detail in the JSON error envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    /// Machine-readable error code (snake_case).
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// Raw stderr from `op`, when the tool itself reported the failure.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stderr: Option<String>,
}

impl ErrorOutput {
    /// Construct from an `OpError`.
    #[must_use]
    pub fn from_op_error(err: &OpError) -> Self {
        let code = match err {
            OpError::Launch { .. } => "launch_failed",
            OpError::Tool { .. } => "op_error",
            OpError::Exit { .. } => "op_exit",
            OpError::Decode(_) => "malformed_response",
            OpError::EmptyInput { .. } => "empty_input",
            OpError::InvalidReference { .. } => "invalid_reference",
            OpError::MissingSecret { .. } => "missing_secret",
            OpError::TimedOut(_) => "timed_out",
            OpError::Cancelled => "cancelled",
            OpError::Io(_) => "io_error",
        };
        Self {
            ok: false,
            error: ErrorDetail {
                code: code.to_owned(),
                message: err.to_string(),
                stderr: err.stderr().map(|s| s.trim_end().to_owned()),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_envelope_for_tool_error() {
        let err = OpError::Tool {
            status: Some(1),
            stderr: "[ERROR] \"Nope\" isn't an item.\n".to_owned(),
        };
        let out = ErrorOutput::from_op_error(&err);
        assert!(!out.ok);
        assert_eq!(out.error.code, "op_error");
        assert_eq!(out.error.stderr.as_deref(), Some("[ERROR] \"Nope\" isn't an item."));

        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["error"]["code"], "op_error");
    }

    #[test]
    fn test_error_envelope_omits_stderr() {
        let out = ErrorOutput::from_op_error(&OpError::EmptyInput { what: "assignments" });
        let json = serde_json::to_value(&out).unwrap();
        assert!(json["error"].get("stderr").is_none());
        assert_eq!(json["error"]["message"], "no assignments specified");
    }
}
