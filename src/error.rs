//! Error types for tattoo-dl
//!
//! Errors are layered the way the pipeline is:
//! - [`ExtractError`] - the front-matter block could not be isolated
//! - [`DecodeError`] - the block is not valid TOML for an artwork record
//! - [`PathError`] - the record cannot produce an output directory name
//! - [`FetchError`] - one content hash could not be fetched
//!
//! Per-file and per-asset errors are recovered by the batch runner. Only configuration,
//! output-root and traversal errors propagate to the caller of [`crate::BatchRunner::run`].

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for tattoo-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for tattoo-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "gateway_url")
        key: Option<String>,
    },

    /// Front-matter block could not be extracted
    #[error("front matter error: {0}")]
    Extract(#[from] ExtractError),

    /// Front-matter block is not a valid artwork record
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Record cannot produce an output path
    #[error("output path error: {0}")]
    Path(#[from] PathError),

    /// Asset fetch failed
    #[error("fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Directory tree could not be enumerated (fatal for a batch run)
    #[error("traversal error: {0}")]
    Traversal(#[from] walkdir::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP client error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl Error {
    /// Machine-readable error code, used in events and log fields
    pub fn code(&self) -> &'static str {
        match self {
            Error::Config { .. } => "config_error",
            Error::Extract(e) => match e {
                ExtractError::MissingDelimiter => "missing_delimiter",
                ExtractError::UnterminatedBlock { .. } => "unterminated_block",
                ExtractError::Io(_) => "read_error",
            },
            Error::Decode(_) => "decode_error",
            Error::Path(PathError::MissingDate) => "missing_date",
            Error::Fetch(e) => e.code(),
            Error::Traversal(_) => "traversal_error",
            Error::Io(_) => "io_error",
            Error::Network(_) => "network_error",
        }
    }
}

/// Front-matter extraction errors
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The stream is empty or its first line is blank, so there is no delimiter
    #[error("missing front matter delimiter on first line")]
    MissingDelimiter,

    /// The stream ended before the closing delimiter was seen
    #[error("front matter not terminated: closing {delimiter:?} never found")]
    UnterminatedBlock {
        /// The delimiter line that opened the block
        delimiter: String,
    },

    /// Reading the stream failed
    #[error("failed to read front matter: {0}")]
    Io(#[from] std::io::Error),
}

/// The front-matter block is not syntactically valid TOML for an artwork record
#[derive(Debug, Error)]
#[error("{0}")]
pub struct DecodeError(#[from] pub toml::de::Error);

/// Output path derivation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PathError {
    /// Neither `tattoodate` nor `date` holds a usable `YYYY-MM-DD` prefix
    #[error("record has no usable date (need tattoodate or date with at least 10 characters)")]
    MissingDate,
}

/// Per-asset fetch errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The fetch did not complete within the configured timeout
    #[error("timed out after {}s", after.as_secs())]
    Timeout {
        /// The configured bound that elapsed
        after: Duration,
    },

    /// The gateway could not be reached or the request failed before a response
    #[error("connection failed: {0}")]
    ConnectionFailed(String),

    /// The gateway answered with a non-2xx status
    #[error("gateway returned HTTP {status}")]
    NonSuccessStatus {
        /// HTTP status code
        status: u16,
    },

    /// Creating the destination file or copying the body into it failed
    #[error("failed to write {}: {reason}", path.display())]
    WriteFailed {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error message
        reason: String,
    },
}

impl FetchError {
    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            FetchError::Timeout { .. } => "timeout",
            FetchError::ConnectionFailed(_) => "connection_failed",
            FetchError::NonSuccessStatus { .. } => "non_success_status",
            FetchError::WriteFailed { .. } => "write_failed",
        }
    }
}
