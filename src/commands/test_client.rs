//! Substitute `SdtpClient` for command handler tests.

#![allow(clippy::unwrap_used)]

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use sdtp_core::{FileInfo, Operation, SdtpClient, SdtpError};
use tokio_util::sync::CancellationToken;

type ErrorFactory = fn() -> SdtpError;

#[derive(Default)]
pub(crate) struct FakeClient {
    pub(crate) files: Vec<FileInfo>,
    pub(crate) check_error: Option<ErrorFactory>,
    pub(crate) list_error: Option<ErrorFactory>,
    pub(crate) register_error: Option<ErrorFactory>,
    pub(crate) acked: Mutex<Vec<i64>>,
}

impl FakeClient {
    pub(crate) fn with_files(files: Vec<FileInfo>) -> Self {
        Self {
            files,
            ..Self::default()
        }
    }

    pub(crate) fn acked(&self) -> Vec<i64> {
        let mut ids = self.acked.lock().unwrap().clone();
        ids.sort_unstable();
        ids
    }
}

#[async_trait]
impl SdtpClient for FakeClient {
    async fn check(&self, _cancel: &CancellationToken) -> Result<(), SdtpError> {
        self.check_error.map_or(Ok(()), |error| Err(error()))
    }

    async fn list(
        &self,
        _tags: &HashMap<String, String>,
        cancel: &CancellationToken,
    ) -> Result<Vec<FileInfo>, SdtpError> {
        if cancel.is_cancelled() {
            return Err(SdtpError::Cancelled {
                operation: Operation::List,
            });
        }
        match self.list_error {
            Some(error) => Err(error()),
            None => Ok(self.files.clone()),
        }
    }

    async fn download(
        &self,
        file: &FileInfo,
        dest_dir: &Path,
        _cancel: &CancellationToken,
    ) -> Result<PathBuf, SdtpError> {
        let path = dest_dir.join(&file.name);
        tokio::fs::write(&path, file.name.as_bytes())
            .await
            .map_err(|e| SdtpError::filesystem(&path, e))?;
        Ok(path)
    }

    async fn ack(&self, file: &FileInfo, _cancel: &CancellationToken) -> Result<(), SdtpError> {
        self.acked.lock().unwrap().push(file.id);
        Ok(())
    }

    async fn register(&self, _cancel: &CancellationToken) -> Result<(), SdtpError> {
        self.register_error.map_or(Ok(()), |error| Err(error()))
    }
}
