//! Worker pool that downloads and acknowledges listed files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

use super::queue::WorkQueue;
use crate::file::FileInfo;
use crate::transport::{SdtpClient, SdtpError};

/// Minimum allowed concurrency value.
const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
const MAX_CONCURRENCY: usize = 100;

/// Default worker count.
pub const DEFAULT_CONCURRENCY: usize = 4;

/// Error type for ingest engine construction.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },
}

/// Counters for a single ingest pass.
///
/// Updated concurrently by the workers; read once the pass has returned.
#[derive(Debug, Default)]
pub struct IngestStats {
    listed: AtomicUsize,
    downloaded: AtomicUsize,
    download_failed: AtomicUsize,
    acknowledged: AtomicUsize,
    ack_failed: AtomicUsize,
    cancelled: AtomicBool,
}

impl IngestStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files the listing returned.
    #[must_use]
    pub fn listed(&self) -> usize {
        self.listed.load(Ordering::SeqCst)
    }

    /// Number of files downloaded and verified.
    #[must_use]
    pub fn downloaded(&self) -> usize {
        self.downloaded.load(Ordering::SeqCst)
    }

    /// Number of files whose download failed and were skipped.
    #[must_use]
    pub fn download_failed(&self) -> usize {
        self.download_failed.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn acknowledged(&self) -> usize {
        self.acknowledged.load(Ordering::SeqCst)
    }

    #[must_use]
    pub fn ack_failed(&self) -> usize {
        self.ack_failed.load(Ordering::SeqCst)
    }

    /// Returns true if the pass stopped early because of cancellation.
    #[must_use]
    pub fn was_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    fn snapshot(&self) -> Self {
        let copy = Self::new();
        copy.listed.store(self.listed(), Ordering::SeqCst);
        copy.downloaded.store(self.downloaded(), Ordering::SeqCst);
        copy.download_failed
            .store(self.download_failed(), Ordering::SeqCst);
        copy.acknowledged.store(self.acknowledged(), Ordering::SeqCst);
        copy.ack_failed.store(self.ack_failed(), Ordering::SeqCst);
        copy.cancelled.store(self.was_cancelled(), Ordering::SeqCst);
        copy
    }
}

/// Runs ingest passes with a fixed number of workers.
///
/// # Concurrency Model
///
/// - `concurrency` workers run as Tokio tasks for the whole pass
/// - Listed records flow through a queue whose capacity equals the worker
///   count, so the producer waits once every worker is busy
/// - The producer selects between sending and cancellation and never blocks
///   on a queue nobody drains
/// - The pass returns only after every worker task has been joined
#[derive(Debug, Clone)]
pub struct IngestEngine {
    concurrency: usize,
    ack: bool,
}

impl IngestEngine {
    /// Creates an engine with `concurrency` workers.
    ///
    /// When `ack` is false, downloaded files are left unacknowledged and will
    /// be listed again by the server.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConcurrency`] if the value is outside
    /// the valid range (1-100).
    ///
    /// # Example
    ///
    /// ```
    /// use sdtp_core::IngestEngine;
    ///
    /// let engine = IngestEngine::new(4, true).unwrap();
    /// assert_eq!(engine.concurrency(), 4);
    /// assert!(IngestEngine::new(0, true).is_err());
    /// ```
    #[instrument(level = "debug")]
    pub fn new(concurrency: usize, ack: bool) -> Result<Self, EngineError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(EngineError::InvalidConcurrency { value: concurrency });
        }
        Ok(Self { concurrency, ack })
    }

    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Lists files matching `tags` and ingests them into `dest_dir`.
    ///
    /// # Errors
    ///
    /// Returns the listing error unchanged if the listing fails (including
    /// [`SdtpError::Cancelled`] when cancelled before the listing completes).
    ///
    /// Individual download and acknowledge failures do NOT cause this method
    /// to error; they are logged and counted in the returned stats.
    #[instrument(skip(self, client, tags, cancel), fields(concurrency = self.concurrency, ack = self.ack, dest_dir = %dest_dir.display()))]
    pub async fn run(
        &self,
        client: Arc<dyn SdtpClient>,
        tags: &HashMap<String, String>,
        dest_dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<IngestStats, SdtpError> {
        let files = client.list(tags, cancel).await?;
        if files.is_empty() {
            info!("listing is empty, nothing to ingest");
            return Ok(IngestStats::new());
        }

        let stats = Arc::new(IngestStats::new());
        stats.listed.store(files.len(), Ordering::SeqCst);
        info!(count = files.len(), "starting ingest pass");

        let (sender, queue) = WorkQueue::bounded(self.concurrency);
        let mut workers = JoinSet::new();
        for worker_id in 0..self.concurrency {
            workers.spawn(run_worker(
                worker_id,
                Arc::clone(&client),
                queue.clone(),
                dest_dir.to_path_buf(),
                self.ack,
                Arc::clone(&stats),
                cancel.clone(),
            ));
        }
        drop(queue);

        for file in files {
            tokio::select! {
                biased;
                () = cancel.cancelled() => {
                    debug!("cancelled while queueing files");
                    break;
                }
                sent = sender.send(file) => {
                    if sent.is_err() {
                        break;
                    }
                }
            }
        }
        drop(sender);

        debug!(workers = workers.len(), "waiting for workers to finish");
        while let Some(joined) = workers.join_next().await {
            // Task panics are logged but don't fail the pass
            if let Err(e) = joined {
                warn!(error = %e, "ingest worker panicked");
            }
        }

        if cancel.is_cancelled() {
            stats.cancelled.store(true, Ordering::SeqCst);
        }

        info!(
            listed = stats.listed(),
            downloaded = stats.downloaded(),
            download_failed = stats.download_failed(),
            acknowledged = stats.acknowledged(),
            ack_failed = stats.ack_failed(),
            cancelled = stats.was_cancelled(),
            "ingest pass complete"
        );

        Ok(Arc::try_unwrap(stats).unwrap_or_else(|shared| shared.snapshot()))
    }
}

async fn run_worker(
    worker_id: usize,
    client: Arc<dyn SdtpClient>,
    queue: WorkQueue,
    dest_dir: PathBuf,
    ack: bool,
    stats: Arc<IngestStats>,
    cancel: CancellationToken,
) {
    loop {
        let next = tokio::select! {
            biased;
            () = cancel.cancelled() => None,
            file = queue.next() => file,
        };
        let Some(file) = next else {
            break;
        };
        ingest_file(client.as_ref(), &file, &dest_dir, ack, &stats, &cancel).await;
    }
    debug!(worker_id, "worker exiting");
}

/// Downloads then acknowledges one file. Ack runs only after a successful download.
async fn ingest_file(
    client: &dyn SdtpClient,
    file: &FileInfo,
    dest_dir: &Path,
    ack: bool,
    stats: &IngestStats,
    cancel: &CancellationToken,
) {
    match client.download(file, dest_dir, cancel).await {
        Ok(path) => {
            stats.downloaded.fetch_add(1, Ordering::SeqCst);
            info!(file_id = file.id, path = %path.display(), "downloaded");
        }
        Err(e) if e.is_cancelled() => {
            debug!(file_id = file.id, name = %file.name, "download cancelled");
            return;
        }
        Err(e) => {
            stats.download_failed.fetch_add(1, Ordering::SeqCst);
            warn!(file_id = file.id, name = %file.name, error = %e, "download failed, skipping");
            return;
        }
    }

    if !ack {
        return;
    }

    match client.ack(file, cancel).await {
        Ok(()) => {
            stats.acknowledged.fetch_add(1, Ordering::SeqCst);
        }
        Err(e) => {
            stats.ack_failed.fetch_add(1, Ordering::SeqCst);
            warn!(file_id = file.id, name = %file.name, error = %e, "acknowledge failed");
        }
    }
}
