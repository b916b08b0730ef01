//! CLI entry point for httpsave.

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use httpsave_core::{DownloadConfig, DownloadOutcome, DownloadRequest, Downloader};
use tracing::{debug, info, warn};

mod cli;

use cli::Args;

/// Exit code when the destination exists and was left untouched.
const EXIT_SKIPPED: u8 = 2;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let config = DownloadConfig::default()
        .with_timeouts(args.connect_timeout, args.read_timeout)
        .with_buffer_size(args.buffer_size)
        .accept_error_status(args.accept_error_status)
        .atomic(args.atomic);
    let downloader = Downloader::with_config(config).context("failed to build HTTP client")?;

    let request = DownloadRequest::new(args.url.clone(), args.destination())
        .overwrite(args.overwrite)
        .silent(!args.strict);

    let outcome = downloader.download(&request).await?;
    if args.json {
        println!("{}", serde_json::to_string(&outcome)?);
    }

    match outcome {
        DownloadOutcome::Saved {
            path,
            bytes_written,
            status,
        } => {
            info!(path = %path.display(), bytes = bytes_written, status, "saved");
            Ok(ExitCode::SUCCESS)
        }
        DownloadOutcome::AlreadyExists { path } => {
            warn!(
                path = %path.display(),
                "destination exists; pass --overwrite to replace it"
            );
            Ok(ExitCode::from(EXIT_SKIPPED))
        }
    }
}
