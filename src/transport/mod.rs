//! SDTP protocol client over mutual TLS.
//!
//! This module turns the five protocol operations into authenticated HTTP
//! calls and normalizes every response into [`SdtpError`] kinds.
//!
//! | Operation | Method | Path            | Success   |
//! |-----------|--------|-----------------|-----------|
//! | check     | HEAD   | `/files`        | 2xx       |
//! | list      | GET    | `/files?k=v...` | 200       |
//! | download  | GET    | `/files/{id}`   | 200       |
//! | ack       | DELETE | `/files/{id}`   | 200, 204  |
//! | register  | PUT    | `/register`     | 200, 201  |
//!
//! # Example
//!
//! ```no_run
//! use std::collections::HashMap;
//! use sdtp_core::{ClientConfig, HttpSdtpClient, SdtpClient};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("https://sdtp.example.org/api/v1", "client.pem", "client.key")?;
//! let client = HttpSdtpClient::new(&config)?;
//! let cancel = CancellationToken::new();
//! let files = client.list(&HashMap::new(), &cancel).await?;
//! println!("{} files available", files.len());
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod status;

pub use client::HttpSdtpClient;
pub use error::{Operation, SdtpError};
pub use status::classify_status;

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::file::FileInfo;

/// The SDTP capability set.
///
/// The ingest engine and the command layer only depend on this trait, so they
/// can run against a substitute implementation in tests.
///
/// # Object Safety
///
/// This trait uses `async_trait` to support dynamic dispatch via
/// `Arc<dyn SdtpClient>` shared across ingest workers.
#[async_trait]
pub trait SdtpClient: Send + Sync {
    /// Probes reachability and authorization without side effects.
    async fn check(&self, cancel: &CancellationToken) -> Result<(), SdtpError>;

    /// Lists available files matching every tag.
    async fn list(
        &self,
        tags: &HashMap<String, String>,
        cancel: &CancellationToken,
    ) -> Result<Vec<FileInfo>, SdtpError>;

    /// Downloads `file` into `dest_dir`, verifying its checksum before it
    /// becomes visible under its final name. Returns the final path.
    async fn download(
        &self,
        file: &FileInfo,
        dest_dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, SdtpError>;

    /// Acknowledges receipt of `file`, removing it from future listings.
    async fn ack(&self, file: &FileInfo, cancel: &CancellationToken) -> Result<(), SdtpError>;

    /// Requests activation of the client credential.
    async fn register(&self, cancel: &CancellationToken) -> Result<(), SdtpError>;
}

/// Runs `future` unless `cancel` fires first.
pub(crate) async fn cancellable<T>(
    operation: Operation,
    cancel: &CancellationToken,
    future: impl Future<Output = Result<T, SdtpError>>,
) -> Result<T, SdtpError> {
    tokio::select! {
        biased;
        () = cancel.cancelled() => Err(SdtpError::Cancelled { operation }),
        result = future => result,
    }
}
