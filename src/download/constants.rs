//! Constants for the download module (timeouts, copy buffer bounds).

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default idle time allowed between reads (5 minutes).
pub const READ_TIMEOUT_SECS: u64 = 300;

/// Default size of the buffer between the response stream and the file (256 KiB).
pub const DEFAULT_BUFFER_SIZE: usize = 256 * 1024;

/// Smallest accepted copy buffer (8 KiB).
pub const MIN_BUFFER_SIZE: usize = 8 * 1024;

/// Largest accepted copy buffer (16 MiB).
pub const MAX_BUFFER_SIZE: usize = 16 * 1024 * 1024;

/// Suffix of the sibling file used by atomic downloads.
pub const PART_FILE_SUFFIX: &str = ".part";
