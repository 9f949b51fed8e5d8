//! In-memory [`SdtpClient`] that records every call.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::file::FileInfo;
use crate::transport::{Operation, SdtpClient, SdtpError, cancellable};

/// A recorded client call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Check,
    List(HashMap<String, String>),
    Download(i64),
    Ack(i64),
    Register,
}

type ErrorFactory = fn() -> SdtpError;

#[derive(Default)]
pub struct MockSdtpClient {
    files: Vec<FileInfo>,
    list_error: Option<ErrorFactory>,
    download_errors: HashMap<i64, ErrorFactory>,
    ack_errors: HashMap<i64, ErrorFactory>,
    download_delay: Option<Duration>,
    calls: Mutex<Vec<Call>>,
    active_downloads: AtomicUsize,
    max_active_downloads: AtomicUsize,
}

impl MockSdtpClient {
    pub fn with_files(files: Vec<FileInfo>) -> Self {
        Self {
            files,
            ..Self::default()
        }
    }

    /// Generates `count` records with ids `1..=count`.
    pub fn with_generated_files(count: usize) -> Self {
        let files = (1..=count)
            .map(|i| FileInfo::new(i64::try_from(i).unwrap(), format!("file-{i}.dat"), ""))
            .collect();
        Self::with_files(files)
    }

    pub fn fail_list(mut self, error: ErrorFactory) -> Self {
        self.list_error = Some(error);
        self
    }

    pub fn fail_download(mut self, id: i64, error: ErrorFactory) -> Self {
        self.download_errors.insert(id, error);
        self
    }

    pub fn fail_ack(mut self, id: i64, error: ErrorFactory) -> Self {
        self.ack_errors.insert(id, error);
        self
    }

    pub fn download_delay(mut self, delay: Duration) -> Self {
        self.download_delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn downloaded_ids(&self) -> Vec<i64> {
        self.ids_for(|call| match call {
            Call::Download(id) => Some(*id),
            _ => None,
        })
    }

    pub fn acked_ids(&self) -> Vec<i64> {
        self.ids_for(|call| match call {
            Call::Ack(id) => Some(*id),
            _ => None,
        })
    }

    pub fn max_active_downloads(&self) -> usize {
        self.max_active_downloads.load(Ordering::SeqCst)
    }

    fn ids_for(&self, pick: impl Fn(&Call) -> Option<i64>) -> Vec<i64> {
        let mut ids: Vec<i64> = self.calls().iter().filter_map(pick).collect();
        ids.sort_unstable();
        ids
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl SdtpClient for MockSdtpClient {
    async fn check(&self, _cancel: &CancellationToken) -> Result<(), SdtpError> {
        self.record(Call::Check);
        Ok(())
    }

    async fn list(
        &self,
        tags: &HashMap<String, String>,
        _cancel: &CancellationToken,
    ) -> Result<Vec<FileInfo>, SdtpError> {
        self.record(Call::List(tags.clone()));
        match self.list_error {
            Some(error) => Err(error()),
            None => Ok(self.files.clone()),
        }
    }

    async fn download(
        &self,
        file: &FileInfo,
        dest_dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, SdtpError> {
        self.record(Call::Download(file.id));
        let active = self.active_downloads.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active_downloads.fetch_max(active, Ordering::SeqCst);

        let delay = self.download_delay.unwrap_or(Duration::from_millis(1));
        let waited = cancellable(Operation::Download, cancel, async {
            tokio::time::sleep(delay).await;
            Ok(())
        })
        .await;
        self.active_downloads.fetch_sub(1, Ordering::SeqCst);
        waited?;

        match self.download_errors.get(&file.id) {
            Some(error) => Err(error()),
            None => Ok(dest_dir.join(&file.name)),
        }
    }

    async fn ack(&self, file: &FileInfo, _cancel: &CancellationToken) -> Result<(), SdtpError> {
        self.record(Call::Ack(file.id));
        self.ack_errors.get(&file.id).map_or(Ok(()), |error| Err(error()))
    }

    async fn register(&self, _cancel: &CancellationToken) -> Result<(), SdtpError> {
        self.record(Call::Register);
        Ok(())
    }
}
