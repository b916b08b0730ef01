//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use httpsave_core::download::{CONNECT_TIMEOUT_SECS, DEFAULT_BUFFER_SIZE, READ_TIMEOUT_SECS};

/// Fallback file name when the URL path has no usable last segment.
const FALLBACK_FILE_NAME: &str = "index.html";

/// Save the body of an HTTP resource to a local file.
///
/// Existing files are left untouched unless --overwrite is given.
#[derive(Parser, Debug)]
#[command(name = "httpsave")]
#[command(author, version, about)]
pub struct Args {
    /// URL of the resource to fetch
    pub url: String,

    /// Destination file (defaults to the last URL path segment in the current directory)
    pub output: Option<PathBuf>,

    /// Replace the destination if it already exists
    #[arg(short = 'f', long)]
    pub overwrite: bool,

    /// Treat an existing destination as an error instead of skipping it
    #[arg(short, long)]
    pub strict: bool,

    /// Write to a temporary .part file and rename it on success
    #[arg(long)]
    pub atomic: bool,

    /// Save the body even if the server returns a non-2xx status
    #[arg(long)]
    pub accept_error_status: bool,

    /// Copy buffer size in bytes (clamped to 8 KiB..=16 MiB)
    #[arg(long, default_value_t = DEFAULT_BUFFER_SIZE)]
    pub buffer_size: usize,

    /// Connect timeout in seconds
    #[arg(long, default_value_t = CONNECT_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub connect_timeout: u64,

    /// Seconds to wait for the next chunk of data before giving up
    #[arg(long, default_value_t = READ_TIMEOUT_SECS, value_parser = clap::value_parser!(u64).range(1..=86400))]
    pub read_timeout: u64,

    /// Print the outcome as a JSON object on stdout
    #[arg(long)]
    pub json: bool,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,
}

impl Args {
    /// Returns the explicit output path or one derived from the URL.
    #[must_use]
    pub fn destination(&self) -> PathBuf {
        self.output
            .clone()
            .unwrap_or_else(|| PathBuf::from(file_name_from_url(&self.url)))
    }
}

fn file_name_from_url(url: &str) -> String {
    url::Url::parse(url)
        .ok()
        .and_then(|parsed| {
            parsed
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string))
        })
        .filter(|segment| !segment.is_empty() && segment != "." && segment != "..")
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_minimal_args_parse_with_defaults() {
        let args = Args::try_parse_from(["httpsave", "https://example.com/a.zip"]).unwrap();
        assert_eq!(args.url, "https://example.com/a.zip");
        assert!(args.output.is_none());
        assert!(!args.overwrite);
        assert!(!args.strict);
        assert!(!args.atomic);
        assert!(!args.json);
        assert_eq!(args.buffer_size, DEFAULT_BUFFER_SIZE);
        assert_eq!(args.connect_timeout, CONNECT_TIMEOUT_SECS);
        assert_eq!(args.read_timeout, READ_TIMEOUT_SECS);
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
    }

    #[test]
    fn test_cli_requires_url() {
        let result = Args::try_parse_from(["httpsave"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn test_cli_flags_parse() {
        let args = Args::try_parse_from([
            "httpsave",
            "https://example.com/a.zip",
            "out/a.zip",
            "-f",
            "--strict",
            "--atomic",
            "--accept-error-status",
            "-vv",
        ])
        .unwrap();
        assert_eq!(args.output, Some(PathBuf::from("out/a.zip")));
        assert!(args.overwrite);
        assert!(args.strict);
        assert!(args.atomic);
        assert!(args.accept_error_status);
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_rejects_zero_timeout() {
        let result = Args::try_parse_from([
            "httpsave",
            "https://example.com/a.zip",
            "--connect-timeout",
            "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn test_destination_from_url_last_segment() {
        let args = Args::try_parse_from(["httpsave", "https://example.com/files/data.csv?x=1"])
            .unwrap();
        assert_eq!(args.destination(), PathBuf::from("data.csv"));
    }

    #[test]
    fn test_destination_falls_back_for_bare_host() {
        let args = Args::try_parse_from(["httpsave", "https://example.com/"]).unwrap();
        assert_eq!(args.destination(), PathBuf::from(FALLBACK_FILE_NAME));

        let args = Args::try_parse_from(["httpsave", "not a url"]).unwrap();
        assert_eq!(args.destination(), PathBuf::from(FALLBACK_FILE_NAME));
    }

    #[test]
    fn test_explicit_output_wins() {
        let args =
            Args::try_parse_from(["httpsave", "https://example.com/a.zip", "b.zip"]).unwrap();
        assert_eq!(args.destination(), PathBuf::from("b.zip"));
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let result = Args::try_parse_from(["httpsave", "--help"]);
        assert_eq!(
            result.unwrap_err().kind(),
            clap::error::ErrorKind::DisplayHelp
        );
    }
}
