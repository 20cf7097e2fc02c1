//! Error types for Reel

use thiserror::Error;

/// The main error type for Reel operations.
///
/// One variant per pipeline failure kind. Every variant is fatal to the
/// invocation that produced it.
#[derive(Debug, Error)]
pub enum ReelError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Job submission failed: {0}")]
    Submission(String),

    #[error("Job status query failed: {0}")]
    Poll(String),

    #[error("Job still pending after {attempts} poll attempts")]
    PollTimeout { attempts: u32 },

    #[error("No video generated: {0}")]
    NoResult(String),

    #[error("Failed to download video: {0}")]
    Download(String),

    #[error("Missing invocation context: {0}")]
    MissingContext(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Usage record failed: {0}")]
    UsageRecord(String),

    #[error("Invocation cancelled before {0}")]
    Cancelled(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl ReelError {
    /// Stable snake_case name of the failure kind, for logs and reports
    pub fn kind(&self) -> &'static str {
        match self {
            ReelError::Configuration(_) => "configuration",
            ReelError::InvalidRequest(_) => "invalid_request",
            ReelError::Submission(_) => "submission",
            ReelError::Poll(_) => "poll",
            ReelError::PollTimeout { .. } => "poll_timeout",
            ReelError::NoResult(_) => "no_result",
            ReelError::Download(_) => "download",
            ReelError::MissingContext(_) => "missing_context",
            ReelError::Upload(_) => "upload",
            ReelError::UsageRecord(_) => "usage_record",
            ReelError::Cancelled(_) => "cancelled",
            ReelError::IoError(_) => "io",
        }
    }
}

/// Result type alias for Reel operations
pub type Result<T> = std::result::Result<T, ReelError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_poll_timeout_message_names_attempts() {
        let err = ReelError::PollTimeout { attempts: 3 };
        assert_eq!(err.to_string(), "Job still pending after 3 poll attempts");
        assert_eq!(err.kind(), "poll_timeout");
    }

    #[test]
    fn test_no_result_carries_payload() {
        let err = ReelError::NoResult(r#"{"done":true}"#.to_string());
        assert!(err.to_string().contains(r#"{"done":true}"#));
    }

    #[test]
    fn test_io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: ReelError = io.into();
        assert_eq!(err.kind(), "io");
    }
}
