//! Error types for richblocks library.

use std::io;
use thiserror::Error;

/// Result type alias for richblocks operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while converting, submitting or importing content.
///
/// The conversion pipeline itself never produces an error; these cover the
/// I/O around it.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Transport-level HTTP failure (DNS, TLS, timeout, ...).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The content store answered with a non-success status.
    #[error("Content store error ({status}): {message}")]
    Store {
        /// HTTP status code
        status: u16,
        /// Message reported by the store
        message: String,
    },

    /// The podcast feed could not be parsed.
    #[error("Feed error: {0}")]
    Feed(String),

    /// JSON (de)serialization failure.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Review type not among the known destinations.
    #[error("Invalid review type")]
    InvalidReviewType(String),

    /// A required request field is missing or blank.
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    /// The submission converted to zero blocks.
    #[error("Nothing to submit: the content produced no blocks")]
    EmptySubmission,

    /// The episode ledger could not be read or written.
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// Error during rendering (JSON, text, HTML).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error was caused by the caller's input rather than an
    /// upstream failure.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidReviewType(_) | Error::MissingField(_) | Error::EmptySubmission
        )
    }
}

impl From<rss::Error> for Error {
    fn from(err: rss::Error) -> Self {
        Error::Feed(err.to_string())
    }
}
