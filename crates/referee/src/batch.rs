//! Batch adjudication of newline-delimited JSON requests.
//!
//! Requests run concurrently on a bounded pool of blocking tasks. Responses
//! are written one per line in input order as soon as each is ready, so at
//! most `workers` requests are held in flight.

use std::sync::Arc;

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use crate::adjudicate::{respond, Response};
use crate::config::RefereeConfig;
use crate::error::RefereeError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub processed: usize,
    pub failed: usize,
}

type Job = (usize, JoinHandle<Response>);

/// Adjudicate every non-blank line of `reader`, writing responses to
/// `writer`.
pub async fn run_batch<R, W>(
    reader: R,
    mut writer: W,
    config: &RefereeConfig,
) -> Result<BatchSummary, RefereeError>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    info!(workers = config.workers, "Starting batch");
    let (jobs, mut finished) = mpsc::channel::<Job>(config.workers);

    let produce = dispatch(reader, jobs, config);
    let consume = async {
        let mut summary = BatchSummary::default();
        while let Some((line_no, handle)) = finished.recv().await {
            let response = match handle.await {
                Ok(response) => response,
                Err(e) => {
                    error!(line = line_no, error = %e, "Request task failed");
                    Response::Error {
                        error: RefereeError::from(e).to_string(),
                    }
                }
            };
            summary.processed += 1;
            if let Response::Error { error } = &response {
                summary.failed += 1;
                warn!(line = line_no, error = %error, "Request failed");
            }
            write_response(&mut writer, line_no, &response).await?;
        }
        Ok::<_, RefereeError>(summary)
    };

    let (dispatched, summary) = tokio::join!(produce, consume);
    dispatched?;
    let summary = summary?;

    info!(
        processed = summary.processed,
        failed = summary.failed,
        "Batch complete"
    );
    Ok(summary)
}

/// Read requests and start one blocking task per line, handing each task to
/// the writer in input order.
async fn dispatch<R>(reader: R, jobs: mpsc::Sender<Job>, config: &RefereeConfig) -> Result<(), RefereeError>
where
    R: AsyncBufRead + Unpin,
{
    let semaphore = Arc::new(Semaphore::new(config.workers));
    let shared = Arc::new(config.clone());
    let mut input = reader.lines();
    let mut line_no = 0;
    while let Some(line) = input.next_line().await? {
        line_no += 1;
        if line.trim().is_empty() {
            continue;
        }

        let permit = semaphore.clone().acquire_owned().await?;
        let config = Arc::clone(&shared);
        let handle = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            respond(&line, &config)
        });
        if jobs.send((line_no, handle)).await.is_err() {
            // Writer stopped; its error is reported by the caller.
            break;
        }
    }
    Ok(())
}

async fn write_response<W>(writer: &mut W, line_no: usize, response: &Response) -> Result<(), RefereeError>
where
    W: AsyncWrite + Unpin,
{
    let mut encoded = serde_json::to_vec(response).inspect_err(|e| {
        error!(line = line_no, error = %e, "Failed to encode response");
    })?;
    encoded.push(b'\n');
    writer.write_all(&encoded).await?;
    writer.flush().await?;
    Ok(())
}
