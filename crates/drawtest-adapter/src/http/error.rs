/*
[INPUT]:  Failure sources of the three task operations (status codes, transport, body parsing)
[OUTPUT]: Normalized error kinds carrying a human-readable message
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new operations or changing error messages
*/

use std::fmt;

use thiserror::Error;

/// Main error type for the drawing-test service client.
///
/// Every variant carries the message shown to the user; the variant itself is the only
/// structured information.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DrawTestError {
    /// Creating the task from the uploaded drawings failed
    #[error("{0}")]
    Upload(String),

    /// Submitting questionnaire answers failed
    #[error("{0}")]
    Submit(String),

    /// The service does not know the task
    #[error("{0}")]
    NotFound(String),

    /// Any other report status check failure
    #[error("{0}")]
    StatusCheck(String),

    /// Downloading the finished report failed
    #[error("{0}")]
    Download(String),
}

/// Error kind without the message, used for logging and matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Upload,
    Submit,
    NotFound,
    StatusCheck,
    Download,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::Upload => "UploadError",
            ErrorKind::Submit => "SubmitError",
            ErrorKind::NotFound => "NotFoundError",
            ErrorKind::StatusCheck => "StatusCheckError",
            ErrorKind::Download => "DownloadError",
        };
        f.write_str(name)
    }
}

impl DrawTestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DrawTestError::Upload(_) => ErrorKind::Upload,
            DrawTestError::Submit(_) => ErrorKind::Submit,
            DrawTestError::NotFound(_) => ErrorKind::NotFound,
            DrawTestError::StatusCheck(_) => ErrorKind::StatusCheck,
            DrawTestError::Download(_) => ErrorKind::Download,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            DrawTestError::Upload(message)
            | DrawTestError::Submit(message)
            | DrawTestError::NotFound(message)
            | DrawTestError::StatusCheck(message)
            | DrawTestError::Download(message) => message,
        }
    }
}

/// Result type alias for drawing-test operations
pub type Result<T> = std::result::Result<T, DrawTestError>;
