//! Opt-in per-destination serialization.
//!
//! The core download takes no locks between calls: two overlapping calls on
//! the same path race, and the loser fails to acquire the file. [`PathLocks`]
//! queues such calls instead, so the second one starts only after the first
//! has returned.
//!
//! # Example
//!
//! ```no_run
//! use httpsave_core::{DownloadRequest, Downloader, PathLocks};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = Downloader::new();
//! let locks = PathLocks::new();
//! let request = DownloadRequest::new("https://example.com/a.bin", "a.bin").overwrite(true);
//! locks.download(&downloader, &request).await?;
//! # Ok(())
//! # }
//! ```

use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{debug, instrument};

use super::client::Downloader;
use super::error::DownloadError;
use super::request::{DownloadOutcome, DownloadRequest};

/// Process-local lock table keyed by absolute destination path.
///
/// Designed to be shared behind an `Arc` across tasks.
#[derive(Debug, Default)]
pub struct PathLocks {
    /// Entries hold an `Arc` so the `DashMap` shard lock is released before
    /// awaiting the inner mutex.
    paths: DashMap<PathBuf, Arc<Mutex<()>>>,
}

impl PathLocks {
    /// Creates an empty lock table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of destinations with a download currently holding or waiting
    /// on a lock.
    #[must_use]
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Returns `true` when no destination is locked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Runs `downloader.download(request)` while holding the lock for the
    /// request's destination.
    ///
    /// # Errors
    ///
    /// Same as [`Downloader::download`].
    #[instrument(skip_all, fields(path = %request.destination().display()))]
    pub async fn download(
        &self,
        downloader: &Downloader,
        request: &DownloadRequest,
    ) -> Result<DownloadOutcome, DownloadError> {
        let entry = TableEntry::acquire(&self.paths, lock_key(request.destination()));
        let _held = entry.lock.lock().await;
        debug!("acquired destination lock");
        downloader.download(request).await
    }
}

/// One caller's reference to a table entry. Dropping it prunes the entry
/// once no other caller holds or awaits it, including when the download
/// future is cancelled.
struct TableEntry<'a> {
    paths: &'a DashMap<PathBuf, Arc<Mutex<()>>>,
    key: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl<'a> TableEntry<'a> {
    fn acquire(paths: &'a DashMap<PathBuf, Arc<Mutex<()>>>, key: PathBuf) -> Self {
        let lock = paths
            .entry(key.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        Self { paths, key, lock }
    }
}

impl Drop for TableEntry<'_> {
    fn drop(&mut self) {
        // Two references left: the table's and this one.
        self.paths
            .remove_if(&self.key, |_, entry| Arc::strong_count(entry) == 2);
    }
}

/// Absolute form of `path` with `.` and `..` folded away lexically.
///
/// Symlinks are not resolved, so `link/../a.bin` and the real parent of
/// `link` may still map to different keys.
fn lock_key(path: &Path) -> PathBuf {
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    let mut key = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if matches!(key.components().next_back(), Some(Component::Normal(_))) {
                    key.pop();
                }
            }
            other => key.push(other),
        }
    }
    key
}
