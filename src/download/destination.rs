//! Destination path preparation: validation, conflict check, parent
//! directory creation, and exclusive file acquisition.

use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use tokio::fs::{File, OpenOptions};
use tracing::{debug, warn};

use super::constants::PART_FILE_SUFFIX;
use super::error::DownloadError;

/// A destination split into its parent directory and file name.
#[derive(Debug, Clone)]
pub(crate) struct Destination {
    path: PathBuf,
    parent: Option<PathBuf>,
    file_name: OsString,
}

impl Destination {
    /// Validates that `path` names a file inside some (possibly missing) directory.
    pub(crate) fn parse(path: &Path) -> Result<Self, DownloadError> {
        if path.as_os_str().is_empty() {
            return Err(DownloadError::io(
                path,
                io::Error::new(io::ErrorKind::InvalidInput, "destination path is empty"),
            ));
        }
        let Some(file_name) = path.file_name() else {
            return Err(DownloadError::io(
                path,
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "destination path has no file name",
                ),
            ));
        };
        // `Path::parent` yields "" for a bare file name: the working directory.
        let parent = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .map(Path::to_path_buf);

        Ok(Self {
            path: path.to_path_buf(),
            parent,
            file_name: file_name.to_os_string(),
        })
    }

    pub(crate) fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling path used while an atomic download is in flight.
    pub(crate) fn part_path(&self) -> PathBuf {
        let mut name = self.file_name.clone();
        name.push(PART_FILE_SUFFIX);
        self.path.with_file_name(name)
    }

    /// Creates the parent directory chain if it is missing.
    pub(crate) async fn ensure_parent_dir(&self) -> Result<(), DownloadError> {
        let Some(parent) = &self.parent else {
            return Ok(());
        };
        if tokio::fs::metadata(parent)
            .await
            .is_ok_and(|meta| meta.is_dir())
        {
            return Ok(());
        }
        debug!(dir = %parent.display(), "creating destination directory");
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DownloadError::io(parent.clone(), e))
    }
}

/// Returns whether a regular file currently exists at `path`.
///
/// Directories and broken symlinks do not count; opening them later fails
/// with an IO error instead.
pub(crate) async fn is_occupied(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_file())
}

/// Opens `path` for writing, takes an exclusive lock, then truncates it.
///
/// Truncation happens only after the lock is held so a second writer that
/// loses the race never clobbers bytes the first one is streaming.
pub(crate) async fn open_exclusive(path: &Path) -> Result<File, DownloadError> {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(false);
    #[cfg(windows)]
    options.share_mode(0);

    let file = options
        .open(path)
        .await
        .map_err(|e| DownloadError::io(path, e))?;

    let std_file = file.into_std().await;
    FileExt::try_lock_exclusive(&std_file).map_err(|e| DownloadError::io(path, e))?;
    let file = File::from_std(std_file);

    file.set_len(0)
        .await
        .map_err(|e| DownloadError::io(path, e))?;
    Ok(file)
}

/// Closes `file`, waiting for any in-flight write so the lock is gone on return.
pub(crate) async fn release(file: File) {
    let std_file = file.into_std().await;
    drop(std_file);
}

/// Best-effort removal of an abandoned part file.
pub(crate) async fn discard_part(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await {
        if e.kind() != io::ErrorKind::NotFound {
            warn!(path = %path.display(), error = %e, "failed to remove partial download");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::download::FailureKind;

    #[test]
    fn test_parse_rejects_empty_path() {
        let error = Destination::parse(Path::new("")).unwrap_err();
        assert_eq!(error.kind(), FailureKind::Io);
    }

    #[test]
    fn test_parse_rejects_path_without_file_name() {
        let error = Destination::parse(Path::new("downloads/..")).unwrap_err();
        assert_eq!(error.kind(), FailureKind::Io);
        assert!(error.to_string().contains("no file name"));
    }

    #[test]
    fn test_parse_bare_file_name_has_no_parent() {
        let destination = Destination::parse(Path::new("report.pdf")).unwrap();
        assert!(destination.parent.is_none());
        assert_eq!(destination.file_name, OsString::from("report.pdf"));
    }

    #[test]
    fn test_part_path_is_sibling_with_suffix() {
        let destination = Destination::parse(Path::new("out/report.pdf")).unwrap();
        assert_eq!(destination.part_path(), PathBuf::from("out/report.pdf.part"));
    }

    #[tokio::test]
    async fn test_ensure_parent_dir_creates_nested_chain() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("a").join("b").join("c").join("file.bin");
        let destination = Destination::parse(&path).unwrap();

        destination.ensure_parent_dir().await.unwrap();
        assert!(temp_dir.path().join("a/b/c").is_dir());
        assert!(!path.exists(), "only the directory chain is created");
    }

    #[tokio::test]
    async fn test_ensure_parent_dir_fails_when_parent_is_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, b"x").unwrap();
        let destination = Destination::parse(&blocker.join("file.bin")).unwrap();

        let error = destination.ensure_parent_dir().await.unwrap_err();
        assert_eq!(error.kind(), FailureKind::Io);
    }

    #[tokio::test]
    async fn test_is_occupied_only_for_regular_files() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("present.txt");
        std::fs::write(&file, b"hello").unwrap();

        assert!(is_occupied(&file).await);
        assert!(!is_occupied(temp_dir.path()).await);
        assert!(!is_occupied(&temp_dir.path().join("absent.txt")).await);
    }

    #[tokio::test]
    async fn test_open_exclusive_truncates_and_blocks_second_handle() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("locked.bin");
        std::fs::write(&path, b"old content").unwrap();

        let file = open_exclusive(&path).await.unwrap();
        assert_eq!(std::fs::metadata(&path).unwrap().len(), 0);

        let second = open_exclusive(&path).await.unwrap_err();
        assert_eq!(second.kind(), FailureKind::Io);

        release(file).await;
        let again = open_exclusive(&path).await.unwrap();
        release(again).await;
    }

    #[tokio::test]
    async fn test_discard_part_ignores_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let part = temp_dir.path().join("gone.part");
        discard_part(&part).await;

        std::fs::write(&part, b"partial").unwrap();
        discard_part(&part).await;
        assert!(!part.exists());
    }
}
