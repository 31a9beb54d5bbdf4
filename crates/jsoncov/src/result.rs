//! Result and error types for jsoncov.

use thiserror::Error;

/// Result type for reporter operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Errors that can occur while collecting events or building a report
#[derive(Debug, Error)]
pub enum ReportError {
    /// Raw coverage for a file does not line up with its source lines
    #[error("Invalid coverage data for {filename}: {message}")]
    InvalidCoverageData {
        /// File whose coverage entry is malformed
        filename: String,
        /// Error message
        message: String,
    },

    /// An event arrived after the run already finished
    #[error("Run already finished, rejected '{event}' event")]
    RunFinished {
        /// Name of the rejected event
        event: &'static str,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ReportError {
    /// Create an invalid coverage data error
    #[must_use]
    pub fn invalid_coverage(filename: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidCoverageData {
            filename: filename.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_coverage_error() {
        let err = ReportError::invalid_coverage("lib/a.js", "line 7 has no source");
        let message = err.to_string();
        assert!(message.contains("lib/a.js"));
        assert!(message.contains("line 7 has no source"));
    }

    #[test]
    fn test_run_finished_error() {
        let err = ReportError::RunFinished { event: "pass" };
        assert_eq!(err.to_string(), "Run already finished, rejected 'pass' event");
    }

    #[test]
    fn test_io_error_from() {
        let io_err = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe closed");
        let err: ReportError = io_err.into();
        assert!(err.to_string().contains("I/O"));
    }

    #[test]
    fn test_json_error_from() {
        let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err: ReportError = json_err.into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
