//! Transport and copy settings for downloads.

use std::time::Duration;

use reqwest::Client;
use tracing::debug;

use super::constants::{
    CONNECT_TIMEOUT_SECS, DEFAULT_BUFFER_SIZE, MAX_BUFFER_SIZE, MIN_BUFFER_SIZE,
    READ_TIMEOUT_SECS,
};
use crate::user_agent;

/// Settings shared by every download made through one [`Downloader`](super::Downloader).
///
/// The defaults reproduce the plain contract: stream straight into the
/// destination, reject non-success HTTP statuses, no temporary file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadConfig {
    /// TCP/TLS connect timeout in seconds.
    pub connect_timeout_secs: u64,
    /// Idle timeout in seconds for each read, including the wait for
    /// response headers. A body that keeps arriving is never cut off.
    pub read_timeout_secs: u64,
    /// Capacity of the write buffer between the response stream and the file.
    pub buffer_size: usize,
    /// Write the body even when the server answers with a non-2xx status.
    pub accept_error_status: bool,
    /// Stream into a sibling `.part` file and rename it over the destination
    /// only after the copy completes.
    pub atomic: bool,
    /// `User-Agent` header sent with every request.
    pub user_agent: String,
}

impl Default for DownloadConfig {
    fn default() -> Self {
        Self {
            connect_timeout_secs: CONNECT_TIMEOUT_SECS,
            read_timeout_secs: READ_TIMEOUT_SECS,
            buffer_size: DEFAULT_BUFFER_SIZE,
            accept_error_status: false,
            atomic: false,
            user_agent: user_agent::default_user_agent(),
        }
    }
}

impl DownloadConfig {
    /// Sets connect and read timeouts.
    #[must_use]
    pub fn with_timeouts(mut self, connect_timeout_secs: u64, read_timeout_secs: u64) -> Self {
        self.connect_timeout_secs = connect_timeout_secs;
        self.read_timeout_secs = read_timeout_secs;
        self
    }

    /// Sets the copy buffer size, clamped to 8 KiB..=16 MiB.
    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = buffer_size.clamp(MIN_BUFFER_SIZE, MAX_BUFFER_SIZE);
        self
    }

    /// Writes error-status bodies to disk instead of failing.
    #[must_use]
    pub fn accept_error_status(mut self, accept: bool) -> Self {
        self.accept_error_status = accept;
        self
    }

    /// Enables write-to-temporary-then-rename.
    #[must_use]
    pub fn atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    /// Overrides the `User-Agent` header.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Returns the effective copy buffer size.
    ///
    /// Fields are public, so a value set directly is clamped here as well.
    #[must_use]
    pub fn effective_buffer_size(&self) -> usize {
        self.buffer_size.clamp(MIN_BUFFER_SIZE, MAX_BUFFER_SIZE)
    }
}

/// Builds a `reqwest` client from the transport part of `config`.
///
/// No whole-request deadline is set: transfers may run as long as the
/// server keeps sending.
///
/// # Errors
///
/// Returns the `reqwest` builder error (TLS backend initialization failure).
pub fn build_client(config: &DownloadConfig) -> Result<Client, reqwest::Error> {
    debug!(
        connect_timeout_secs = config.connect_timeout_secs,
        read_timeout_secs = config.read_timeout_secs,
        "building HTTP client"
    );
    Client::builder()
        .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
        .read_timeout(Duration::from_secs(config.read_timeout_secs))
        .user_agent(config.user_agent.as_str())
        .build()
}
