//! The streaming download-to-file operation.
//!
//! Three call shapes share one pipeline:
//! - [`Downloader::download`] reuses a configured client across calls,
//! - [`download_with_client`] runs on any caller-owned `reqwest::Client`,
//! - [`download`] provisions a throwaway client for a single call.

use std::path::Path;

use futures_util::StreamExt;
use reqwest::Client;
use tokio::fs::File;
use tokio::io::{AsyncWriteExt, BufWriter};
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::config::{DownloadConfig, build_client};
use super::destination::{self, Destination};
use super::error::{DownloadError, TransferError};
use super::request::{DownloadOutcome, DownloadRequest};

/// Reusable downloader holding a pooled HTTP client and its settings.
///
/// Holds no per-download state; one value can serve many concurrent calls.
///
/// # Example
///
/// ```no_run
/// use httpsave_core::{DownloadRequest, Downloader};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let downloader = Downloader::new();
/// let request = DownloadRequest::new("https://example.com/data.csv", "data/data.csv");
/// let outcome = downloader.download(&request).await?;
/// println!("saved: {}", outcome.is_saved());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Downloader {
    client: Client,
    config: DownloadConfig,
}

impl Default for Downloader {
    fn default() -> Self {
        Self::new()
    }
}

impl Downloader {
    /// Creates a downloader with [`DownloadConfig::default`].
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client builder fails with the static default
    /// configuration. This should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn new() -> Self {
        Self::with_config(DownloadConfig::default())
            .expect("failed to build HTTP client with static configuration")
    }

    /// Creates a downloader from explicit settings.
    ///
    /// # Errors
    ///
    /// Returns the `reqwest` builder error if the client cannot be built.
    #[instrument(level = "debug", skip_all)]
    pub fn with_config(config: DownloadConfig) -> Result<Self, reqwest::Error> {
        let client = build_client(&config)?;
        Ok(Self { client, config })
    }

    /// Wraps an existing client. Timeouts and User-Agent from `config` are
    /// ignored; the copy and status settings still apply.
    #[must_use]
    pub fn from_client(client: Client, config: DownloadConfig) -> Self {
        Self { client, config }
    }

    /// Returns the active settings.
    #[must_use]
    pub fn config(&self) -> &DownloadConfig {
        &self.config
    }

    /// Returns a reference to the underlying reqwest client.
    #[must_use]
    pub fn inner(&self) -> &Client {
        &self.client
    }

    /// Streams the resource at `request.url()` into `request.destination()`.
    ///
    /// # Errors
    ///
    /// - [`DownloadError::AlreadyExists`] when the destination exists,
    ///   overwrite is off, and silent mode is off
    /// - [`DownloadError::Io`] when the destination is invalid, its directory
    ///   cannot be created, or the file cannot be opened and locked
    /// - [`DownloadError::Transfer`] for URL, network, HTTP status, or write
    ///   failures
    #[instrument(
        skip(self, request),
        fields(url = %request.url(), path = %request.destination().display())
    )]
    pub async fn download(
        &self,
        request: &DownloadRequest,
    ) -> Result<DownloadOutcome, DownloadError> {
        run(&self.client, &self.config, request).await
    }
}

/// Runs the download on a caller-supplied client with default copy settings.
///
/// # Errors
///
/// Same as [`Downloader::download`].
#[instrument(
    skip(client, request),
    fields(url = %request.url(), path = %request.destination().display())
)]
pub async fn download_with_client(
    client: &Client,
    request: &DownloadRequest,
) -> Result<DownloadOutcome, DownloadError> {
    run(client, &DownloadConfig::default(), request).await
}

/// Runs the download on a client built for this call alone.
///
/// # Errors
///
/// Same as [`Downloader::download`], plus [`TransferError::Client`] when
/// the transient client cannot be built.
#[instrument(
    skip(request),
    fields(url = %request.url(), path = %request.destination().display())
)]
pub async fn download(request: &DownloadRequest) -> Result<DownloadOutcome, DownloadError> {
    let config = DownloadConfig::default();
    let client = build_client(&config)
        .map_err(|e| DownloadError::transfer(request.url(), TransferError::Client(e)))?;
    let outcome = run(&client, &config, request).await;
    drop(client);
    outcome
}

async fn run(
    client: &Client,
    config: &DownloadConfig,
    request: &DownloadRequest,
) -> Result<DownloadOutcome, DownloadError> {
    let url = request.url();
    let target = Destination::parse(request.destination())?;

    if !request.is_overwrite() && destination::is_occupied(target.path()).await {
        if request.is_silent() {
            warn!("destination exists and overwrite is disabled; skipping");
            return Ok(DownloadOutcome::AlreadyExists {
                path: target.path().to_path_buf(),
            });
        }
        return Err(DownloadError::already_exists(target.path()));
    }

    let parsed_url = parse_locator(url)?;
    target.ensure_parent_dir().await?;

    debug!("sending GET request");
    let response = client
        .get(parsed_url)
        .send()
        .await
        .map_err(|e| DownloadError::transfer(url, TransferError::from_reqwest(e)))?;

    let status = response.status();
    if !status.is_success() {
        if !config.accept_error_status {
            return Err(DownloadError::transfer(
                url,
                TransferError::HttpStatus {
                    status: status.as_u16(),
                },
            ));
        }
        warn!(status = status.as_u16(), "saving body of non-success response");
    }

    let write_path = if config.atomic {
        target.part_path()
    } else {
        target.path().to_path_buf()
    };
    let mut file = destination::open_exclusive(&write_path).await?;
    debug!(path = %write_path.display(), "destination opened");

    let copied = stream_to_file(
        &mut file,
        response,
        url,
        &write_path,
        config.effective_buffer_size(),
    )
    .await;
    destination::release(file).await;

    let bytes_written = match copied {
        Ok(bytes) => bytes,
        Err(error) => {
            if config.atomic {
                destination::discard_part(&write_path).await;
            }
            return Err(error);
        }
    };

    if config.atomic {
        if let Err(e) = tokio::fs::rename(&write_path, target.path()).await {
            destination::discard_part(&write_path).await;
            return Err(DownloadError::transfer(
                url,
                TransferError::Write {
                    path: target.path().to_path_buf(),
                    source: e,
                },
            ));
        }
    }

    info!(bytes = bytes_written, status = status.as_u16(), "download complete");

    Ok(DownloadOutcome::Saved {
        path: target.path().to_path_buf(),
        bytes_written,
        status: status.as_u16(),
    })
}

fn parse_locator(url: &str) -> Result<Url, DownloadError> {
    let parsed =
        Url::parse(url).map_err(|e| DownloadError::transfer(url, TransferError::InvalidUrl(e)))?;
    match parsed.scheme() {
        "http" | "https" => Ok(parsed),
        other => Err(DownloadError::transfer(
            url,
            TransferError::UnsupportedScheme(other.to_string()),
        )),
    }
}

/// Streams the response body into `file`, returning bytes written.
///
/// One chunk is read, then written, before the next is requested.
async fn stream_to_file(
    file: &mut File,
    response: reqwest::Response,
    url: &str,
    file_path: &Path,
    buffer_size: usize,
) -> Result<u64, DownloadError> {
    let mut writer = BufWriter::with_capacity(buffer_size, file);
    let mut stream = response.bytes_stream();
    let mut bytes_written: u64 = 0;

    while let Some(chunk_result) = stream.next().await {
        let chunk = chunk_result
            .map_err(|e| DownloadError::transfer(url, TransferError::from_reqwest(e)))?;

        writer
            .write_all(&chunk)
            .await
            .map_err(|e| write_error(url, file_path, e))?;

        bytes_written += chunk.len() as u64;
    }

    writer
        .flush()
        .await
        .map_err(|e| write_error(url, file_path, e))?;

    Ok(bytes_written)
}

fn write_error(url: &str, path: &Path, source: std::io::Error) -> DownloadError {
    DownloadError::transfer(
        url,
        TransferError::Write {
            path: path.to_path_buf(),
            source,
        },
    )
}
