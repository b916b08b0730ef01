//! Streaming HTTP download to a local file.
//!
//! This module fetches one resource with a GET request and writes its body
//! to a destination path, chunk by chunk, without holding the whole payload
//! in memory.
//!
//! # Features
//!
//! - Existing-file policy: decline quietly, fail loudly, or overwrite
//! - Missing parent directories are created before the transfer
//! - Exclusive lock on the destination while bytes are written
//! - Classified errors ([`FailureKind`]) with the root cause in the source chain
//! - Optional write-to-`.part`-then-rename and opt-in per-path serialization
//!
//! # Example
//!
//! ```no_run
//! use httpsave_core::download::{DownloadRequest, download};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let request = DownloadRequest::new("https://example.com/paper.pdf", "papers/paper.pdf");
//! let outcome = download(&request).await?;
//! if !outcome.is_saved() {
//!     println!("{} already exists", outcome.path().display());
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod constants;
mod destination;
mod error;
mod path_locks;
mod request;

pub use client::{Downloader, download, download_with_client};
pub use config::{DownloadConfig, build_client};
pub use constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_BUFFER_SIZE, MAX_BUFFER_SIZE, MIN_BUFFER_SIZE,
    PART_FILE_SUFFIX, READ_TIMEOUT_SECS,
};
pub use error::{DownloadError, ERROR_PREFIX, FailureKind, TransferError};
pub use path_locks::PathLocks;
pub use request::{DownloadOutcome, DownloadRequest};
