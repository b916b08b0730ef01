//! Error types for the download module.
//!
//! Every hard failure surfaces as a [`DownloadError`] whose message starts
//! with [`ERROR_PREFIX`] and whose [`source`](std::error::Error::source)
//! chain carries the underlying cause. [`FailureKind`] gives callers the
//! coarse classification without matching on every variant.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Stable prefix shared by every [`DownloadError`] message.
///
/// Kept in sync with the `#[error]` strings below.
pub const ERROR_PREFIX: &str = "download occurred error";

/// Coarse classification of a download failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Destination occupied and overwrite disallowed.
    AlreadyExists,
    /// Destination preparation failed (directory creation, file open, lock).
    Io,
    /// The request or the streaming copy failed.
    Transfer,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::AlreadyExists => "already-exists",
            Self::Io => "io",
            Self::Transfer => "transfer",
        };
        f.write_str(name)
    }
}

/// Errors returned by the download operation.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// The destination already exists and overwrite was not allowed.
    #[error("download occurred error: {path} already exists")]
    AlreadyExists {
        /// The occupied destination path.
        path: PathBuf,
    },

    /// Destination preparation failed before any byte was transferred.
    #[error("download occurred error: IO error preparing {path}: {source}")]
    Io {
        /// The path being prepared (parent directory or destination file).
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The network read or the streaming copy failed.
    #[error("download occurred error: transfer from {url} failed: {source}")]
    Transfer {
        /// The locator being fetched.
        url: String,
        /// What went wrong during the transfer.
        #[source]
        source: TransferError,
    },
}

/// Root causes of a [`DownloadError::Transfer`].
#[derive(Debug, Error)]
pub enum TransferError {
    /// The locator could not be parsed as an absolute URL.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[source] url::ParseError),

    /// The URL scheme is not one the HTTP client can fetch.
    #[error("unsupported URL scheme: {0}")]
    UnsupportedScheme(String),

    /// A transient HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// The request timed out (connect or read).
    #[error("request timed out")]
    Timeout(#[source] reqwest::Error),

    /// Connection-level failure (DNS, refused, reset, TLS) or body stream error.
    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("HTTP {status}")]
    HttpStatus {
        /// The HTTP status code.
        status: u16,
    },

    /// Writing the body to the destination failed mid-copy.
    #[error("write to {path} failed: {source}")]
    Write {
        /// The file being written.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

impl TransferError {
    /// Maps a reqwest error to `Timeout` or `Network`.
    pub(crate) fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error)
        } else {
            Self::Network(error)
        }
    }
}

impl DownloadError {
    /// Creates an already-exists error.
    pub fn already_exists(path: impl Into<PathBuf>) -> Self {
        Self::AlreadyExists { path: path.into() }
    }

    /// Creates a destination-preparation IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Creates a transfer error.
    pub fn transfer(url: impl Into<String>, source: TransferError) -> Self {
        Self::Transfer {
            url: url.into(),
            source,
        }
    }

    /// Returns the failure classification.
    #[must_use]
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::AlreadyExists { .. } => FailureKind::AlreadyExists,
            Self::Io { .. } => FailureKind::Io,
            Self::Transfer { .. } => FailureKind::Transfer,
        }
    }

    /// Returns the HTTP status if the server rejected the request.
    #[must_use]
    pub fn http_status(&self) -> Option<u16> {
        match self {
            Self::Transfer {
                source: TransferError::HttpStatus { status },
                ..
            } => Some(*status),
            _ => None,
        }
    }
}

// No `From<std::io::Error>` / `From<reqwest::Error>`: every variant needs a
// path or URL the source error does not carry.
