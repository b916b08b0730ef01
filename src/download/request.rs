//! Download request and outcome types.

use std::path::{Path, PathBuf};

use serde::Serialize;

/// One download: where to fetch from, where to write, and the conflict policy.
///
/// Defaults to `overwrite = false` and `silent = true`: an existing
/// destination is left alone and reported as
/// [`DownloadOutcome::AlreadyExists`] rather than as an error.
///
/// # Example
///
/// ```
/// use httpsave_core::DownloadRequest;
///
/// let request = DownloadRequest::new("https://example.com/data.csv", "out/data.csv")
///     .overwrite(true)
///     .silent(false);
/// assert!(request.is_overwrite());
/// assert!(!request.is_silent());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadRequest {
    url: String,
    destination: PathBuf,
    overwrite: bool,
    silent: bool,
}

impl DownloadRequest {
    /// Creates a request with the default conflict policy.
    pub fn new(url: impl Into<String>, destination: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            destination: destination.into(),
            overwrite: false,
            silent: true,
        }
    }

    /// Allows replacing an existing destination file.
    #[must_use]
    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Chooses between a quiet decline (`true`) and a hard error (`false`)
    /// when the destination exists and overwrite is disallowed.
    #[must_use]
    pub fn silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// The locator being fetched.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The destination file path.
    #[must_use]
    pub fn destination(&self) -> &Path {
        &self.destination
    }

    /// Whether an existing destination may be replaced.
    #[must_use]
    pub fn is_overwrite(&self) -> bool {
        self.overwrite
    }

    /// Whether a conflict yields a decline instead of an error.
    #[must_use]
    pub fn is_silent(&self) -> bool {
        self.silent
    }
}

/// Non-error result of a download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
#[must_use = "the outcome tells whether the destination was written"]
pub enum DownloadOutcome {
    /// The destination now holds exactly the response body.
    Saved {
        /// Final destination path.
        path: PathBuf,
        /// Number of body bytes written.
        bytes_written: u64,
        /// HTTP status of the response that was saved.
        status: u16,
    },
    /// The destination existed, overwrite was disallowed, and silent mode
    /// turned the conflict into a decline. Nothing was touched.
    AlreadyExists {
        /// The occupied destination path.
        path: PathBuf,
    },
}

impl DownloadOutcome {
    /// `true` when the file was written.
    #[must_use]
    pub fn is_saved(&self) -> bool {
        matches!(self, Self::Saved { .. })
    }

    /// The destination path in either case.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Saved { path, .. } | Self::AlreadyExists { path } => path,
        }
    }

    /// Bytes written, zero for a decline.
    #[must_use]
    pub fn bytes_written(&self) -> u64 {
        match self {
            Self::Saved { bytes_written, .. } => *bytes_written,
            Self::AlreadyExists { .. } => 0,
        }
    }
}
