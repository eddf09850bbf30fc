//! Renju referee batch worker
//!
//! Reads one JSON request per line from `--input PATH` (or stdin) and writes
//! one JSON response per line to stdout.

use std::path::PathBuf;

use tokio::io::{self, AsyncBufRead, BufReader};
use tracing::info;

use referee::{run_batch, RefereeConfig};

/// Parse --input path/to/requests.ndjson from CLI args
fn parse_input_path() -> Option<PathBuf> {
    let args: Vec<String> = std::env::args().collect();
    for i in 0..args.len() {
        if args[i] == "--input" {
            if let Some(path) = args.get(i + 1) {
                return Some(PathBuf::from(path));
            }
        }
    }
    None
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file for local dev
    dotenvy::dotenv().ok();

    // Logs go to stderr; stdout carries responses
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = RefereeConfig::from_env()?;
    info!(
        rows = config.rows,
        cols = config.cols,
        to_win = config.to_win,
        restricted = ?config.restricted,
        search_depth = config.search_depth,
        workers = config.workers,
        "Referee config loaded"
    );

    let reader: Box<dyn AsyncBufRead + Unpin + Send> = match parse_input_path() {
        Some(path) => {
            info!(path = %path.display(), "Reading requests from file");
            Box::new(BufReader::new(tokio::fs::File::open(&path).await?))
        }
        None => Box::new(BufReader::new(io::stdin())),
    };

    let summary = run_batch(reader, io::stdout(), &config).await?;
    info!(
        processed = summary.processed,
        failed = summary.failed,
        "Referee finished"
    );
    Ok(())
}
