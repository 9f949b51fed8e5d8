//! Bounded multi-consumer work queue.

use std::sync::Arc;

use tokio::sync::{Mutex, mpsc};

use crate::file::FileInfo;

/// Receiving side of the ingest queue, shared by every worker.
///
/// Each record is handed to exactly one caller of [`WorkQueue::next`].
#[derive(Debug, Clone)]
pub(crate) struct WorkQueue {
    receiver: Arc<Mutex<mpsc::Receiver<FileInfo>>>,
}

impl WorkQueue {
    /// Creates a queue holding at most `capacity` pending records.
    pub(crate) fn bounded(capacity: usize) -> (mpsc::Sender<FileInfo>, Self) {
        let (sender, receiver) = mpsc::channel(capacity);
        (
            sender,
            Self {
                receiver: Arc::new(Mutex::new(receiver)),
            },
        )
    }

    /// Waits for the next record; `None` once the sender is dropped and the
    /// queue has drained. Cancel safe.
    pub(crate) async fn next(&self) -> Option<FileInfo> {
        self.receiver.lock().await.recv().await
    }
}
