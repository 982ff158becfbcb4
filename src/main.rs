//! CLI entry point for the pen downloader.

use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use pen_downloader_core::{
    BatchRunner, BatchSummary, BookId, DeviceRoot, HttpClient, IdOrigin, ProgressMode,
    VersionSource, build_default_selector,
};
use tracing::{debug, info};

mod app_config;
mod cli;
mod output;

use cli::Args;

/// Process outcome; per-book failures still count as a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ProcessExit {
    Success,
    Failure,
}

impl From<ProcessExit> for ExitCode {
    fn from(exit: ProcessExit) -> Self {
        match exit {
            ProcessExit::Success => ExitCode::SUCCESS,
            ProcessExit::Failure => ExitCode::from(1),
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();
    init_tracing(args.default_log_level());
    debug!(?args, "CLI arguments parsed");

    let exit = match run(args).await {
        Ok(_) => ProcessExit::Success,
        Err(error) => {
            eprintln!("Error: {error:#}");
            ProcessExit::Failure
        }
    };
    exit.into()
}

/// Priority: `RUST_LOG` > quiet flag > verbose flag > default (info).
fn init_tracing(default_level: &str) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_ansi(!is_dumb_terminal())
        .with_env_filter(filter)
        .try_init();
}

fn is_dumb_terminal() -> bool {
    std::env::var("TERM")
        .map(|value| value.eq_ignore_ascii_case("dumb"))
        .unwrap_or(false)
}

async fn run(args: Args) -> Result<BatchSummary> {
    let loaded = app_config::load_config(args.config.as_deref())?;
    if let Some(path) = &loaded.path {
        debug!(path = %path.display(), "config path resolved");
    }
    let config = loaded.config;

    let explicit_ids = parse_id_args(&args.ids)?;

    let root = args
        .root
        .clone()
        .or_else(|| config.root.clone())
        .unwrap_or_else(|| PathBuf::from("."));
    let device = DeviceRoot::open(&root)?;
    info!(root = %device.root().display(), "device root ready");

    let (ids, origin) = if explicit_ids.is_empty() {
        let queue = device.pending_queue();
        let parsed = queue.load().await?;
        (parsed.ids.into_iter().collect(), IdOrigin::PendingQueue(queue))
    } else {
        (explicit_ids, IdOrigin::Explicit)
    };

    if ids.is_empty() {
        if !args.quiet {
            println!("{}", output::NOTHING_TO_DO);
        }
        return Ok(BatchSummary::default());
    }

    let (connect_secs, read_secs) = config.timeouts();
    let client = HttpClient::new_with_timeouts(connect_secs, read_secs);
    let progress = ProgressMode::detect(
        io::stderr().is_terminal(),
        args.no_progress || args.quiet,
        is_dumb_terminal(),
    );
    let version_source = if config.refetch_versions_per_book.unwrap_or(false) {
        VersionSource::PerBook
    } else {
        VersionSource::PerRun
    };
    let selector = build_default_selector(
        &client,
        &config.endpoints(),
        device.book_dir(),
        progress,
        version_source,
    );

    let total = unique_count(&ids);
    let quiet = args.quiet;
    let summary = BatchRunner::new(selector)
        .run_with(ids, &origin, |position, id, outcome| {
            if !quiet {
                println!("{}", output::format_book_line(position, total, id, outcome));
            }
        })
        .await?;

    if !quiet {
        println!("{}", output::format_summary(&summary));
    }
    Ok(summary)
}

fn parse_id_args(raw: &[String]) -> Result<Vec<BookId>> {
    raw.iter()
        .map(|value| {
            value
                .parse::<BookId>()
                .with_context(|| format!("Invalid book id argument '{value}'"))
        })
        .collect()
}

fn unique_count(ids: &[BookId]) -> usize {
    ids.iter().collect::<std::collections::BTreeSet<_>>().len()
}
