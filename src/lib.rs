//! httpsave core library
//!
//! Streams the body of an HTTP resource into a local file, with a
//! configurable policy for destinations that already exist.
//!
//! # Architecture
//!
//! - [`download`](mod@download) - request/outcome types, the streaming pipeline, error
//!   classification, and the opt-in [`PathLocks`] wrapper

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod download;
#[cfg(test)]
pub mod test_support;
pub(crate) mod user_agent;

// Re-export commonly used types
pub use download::{
    DownloadConfig, DownloadError, DownloadOutcome, DownloadRequest, Downloader, FailureKind,
    PathLocks, TransferError, download, download_with_client,
};
