//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

/// Download books onto a mounted reading pen.
///
/// Without ids, the pen's pending queue (`configure/tbd.txt`) is processed
/// and truncated once every listed book is on the device.
#[derive(Parser, Debug)]
#[command(name = "pen-downloader")]
#[command(author, version, about)]
pub struct Args {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(short, long)]
    pub quiet: bool,

    /// Disable progress bars
    #[arg(long)]
    pub no_progress: bool,

    /// Mount point of the pen (must contain a `book/` directory)
    #[arg(short, long, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Read configuration from FILE instead of the default location
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Book ids to download (1-99999); the pending queue is used when omitted
    #[arg(value_name = "IDS")]
    pub ids: Vec<String>,
}

impl Args {
    /// Default tracing level from the verbosity flags.
    #[must_use]
    pub fn default_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "info",
                1 => "debug",
                _ => "trace",
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_default_args_parses_successfully() {
        let args = Args::try_parse_from(["pen-downloader"]).unwrap();
        assert_eq!(args.verbose, 0);
        assert!(!args.quiet);
        assert!(!args.no_progress);
        assert!(args.root.is_none());
        assert!(args.config.is_none());
        assert!(args.ids.is_empty());
        assert_eq!(args.default_log_level(), "info");
    }

    #[test]
    fn test_cli_verbose_flag_increments_count() {
        let args = Args::try_parse_from(["pen-downloader", "-v"]).unwrap();
        assert_eq!(args.verbose, 1);
        assert_eq!(args.default_log_level(), "debug");

        let args = Args::try_parse_from(["pen-downloader", "-vv"]).unwrap();
        assert_eq!(args.verbose, 2);
        assert_eq!(args.default_log_level(), "trace");

        let args = Args::try_parse_from(["pen-downloader", "--verbose", "--verbose"]).unwrap();
        assert_eq!(args.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_wins_over_verbose() {
        let args = Args::try_parse_from(["pen-downloader", "-q", "-v"]).unwrap();
        assert!(args.quiet);
        assert_eq!(args.default_log_level(), "error");
    }

    #[test]
    fn test_cli_root_and_config_paths() {
        let args = Args::try_parse_from([
            "pen-downloader",
            "--root",
            "/media/pen",
            "--config",
            "/tmp/pen.toml",
        ])
        .unwrap();
        assert_eq!(args.root, Some(PathBuf::from("/media/pen")));
        assert_eq!(args.config, Some(PathBuf::from("/tmp/pen.toml")));

        let args = Args::try_parse_from(["pen-downloader", "-r", "/mnt"]).unwrap();
        assert_eq!(args.root, Some(PathBuf::from("/mnt")));
    }

    #[test]
    fn test_cli_positional_ids_are_kept_raw() {
        let args =
            Args::try_parse_from(["pen-downloader", "9550", "05001", "--no-progress", "abc"])
                .unwrap();
        assert_eq!(args.ids, ["9550", "05001", "abc"]);
        assert!(args.no_progress);
    }

    #[test]
    fn test_cli_help_flag_shows_usage() {
        let result = Args::try_parse_from(["pen-downloader", "--help"]);
        let err = result.unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn test_cli_version_flag_shows_version() {
        let err = Args::try_parse_from(["pen-downloader", "--version"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayVersion);
    }

    #[test]
    fn test_cli_unknown_flag_rejected() {
        let err = Args::try_parse_from(["pen-downloader", "--concurrency", "4"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::UnknownArgument);
    }
}
