//! reqwest-backed [`SdtpClient`] using a client-certificate identity.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use futures_util::StreamExt;
use reqwest::{Client, Identity, RequestBuilder, Response};
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};
use url::Url;

use super::error::{Operation, SdtpError};
use super::status::classify_status;
use super::{SdtpClient, cancellable};
use crate::checksum::{ChecksumDescriptor, ChecksumVerdict, ChecksumWriter};
use crate::config::ClientConfig;
use crate::file::{FileInfo, final_path, is_safe_file_name, staging_path};

/// Listing response body.
#[derive(Debug, Deserialize)]
struct Listing {
    #[serde(default, deserialize_with = "crate::file::null_as_default")]
    files: Vec<FileInfo>,
}

/// HTTP client for an SDTP server.
///
/// Stateless per call, so one instance is shared by every ingest worker and
/// reuses the underlying connection pool.
#[derive(Debug, Clone)]
pub struct HttpSdtpClient {
    client: Client,
    api_url: Url,
}

impl HttpSdtpClient {
    /// Builds a client presenting the certificate and key from `config`.
    ///
    /// The TLS profile is fixed at TLS 1.2 or lower.
    ///
    /// # Errors
    ///
    /// Returns [`SdtpError::Filesystem`] if either PEM file cannot be read and
    /// [`SdtpError::Identity`] if they do not form a usable identity.
    pub fn new(config: &ClientConfig) -> Result<Self, SdtpError> {
        let cert = std::fs::read(config.cert_path())
            .map_err(|e| SdtpError::filesystem(config.cert_path(), e))?;
        let mut pem = std::fs::read(config.key_path())
            .map_err(|e| SdtpError::filesystem(config.key_path(), e))?;
        pem.push(b'\n');
        pem.extend_from_slice(&cert);

        let identity = Identity::from_pem(&pem).map_err(|e| SdtpError::Identity {
            reason: e.to_string(),
        })?;

        let client = Client::builder()
            .identity(identity)
            .max_tls_version(reqwest::tls::Version::TLS_1_2)
            .connect_timeout(config.connect_timeout())
            .timeout(config.request_timeout())
            .user_agent(concat!("sdtp-client/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| SdtpError::Identity {
                reason: e.to_string(),
            })?;

        debug!(api_url = %config.api_url(), "created SDTP client");
        Ok(Self::with_client(client, config.api_url().clone()))
    }

    /// Wraps an already configured reqwest client.
    #[must_use]
    pub fn with_client(client: Client, api_url: Url) -> Self {
        Self { client, api_url }
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn send(
        &self,
        operation: Operation,
        request: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<Response, SdtpError> {
        let response = cancellable(operation, cancel, async {
            request
                .send()
                .await
                .map_err(|e| SdtpError::transport(operation, e))
        })
        .await?;

        let status = response.status().as_u16();
        debug!(%operation, status, "received response");
        classify_status(operation, status)?;
        Ok(response)
    }
}

#[async_trait]
impl SdtpClient for HttpSdtpClient {
    #[instrument(skip(self, cancel))]
    async fn check(&self, cancel: &CancellationToken) -> Result<(), SdtpError> {
        let url = self.endpoint(&["files"]);
        self.send(Operation::Check, self.client.head(url), cancel)
            .await?;
        Ok(())
    }

    #[instrument(skip(self, cancel))]
    async fn list(
        &self,
        tags: &HashMap<String, String>,
        cancel: &CancellationToken,
    ) -> Result<Vec<FileInfo>, SdtpError> {
        let mut url = self.endpoint(&["files"]);
        if !tags.is_empty() {
            let mut query = url.query_pairs_mut();
            for (key, value) in tags {
                query.append_pair(key, value);
            }
        }

        let response = self
            .send(Operation::List, self.client.get(url), cancel)
            .await?;
        let listing = cancellable(Operation::List, cancel, async {
            response
                .json::<Listing>()
                .await
                .map_err(|e| SdtpError::transport(Operation::List, e))
        })
        .await?;

        debug!(count = listing.files.len(), "decoded listing");
        Ok(listing.files)
    }

    #[instrument(skip(self, file, cancel), fields(file_id = file.id, name = %file.name, dest_dir = %dest_dir.display()))]
    async fn download(
        &self,
        file: &FileInfo,
        dest_dir: &Path,
        cancel: &CancellationToken,
    ) -> Result<PathBuf, SdtpError> {
        if !is_safe_file_name(&file.name) {
            return Err(SdtpError::InvalidFileName {
                name: file.name.clone(),
            });
        }
        let descriptor: ChecksumDescriptor =
            file.checksum
                .parse()
                .map_err(|source| SdtpError::InvalidChecksum {
                    name: file.name.clone(),
                    source,
                })?;

        let url = self.endpoint(&["files", &file.id.to_string()]);
        let response = self
            .send(Operation::Download, self.client.get(url), cancel)
            .await?;

        let staging = staging_path(dest_dir, &file.name);
        let target = final_path(dest_dir, &file.name);

        let streamed = cancellable(
            Operation::Download,
            cancel,
            stream_verified(response, &staging, &descriptor),
        )
        .await;
        let verdict = match streamed {
            Ok(verdict) => verdict,
            Err(e) => {
                debug!(path = %staging.display(), "cleaning up staging file after error");
                remove_staging(&staging).await;
                return Err(e);
            }
        };

        if !verdict.is_match() {
            remove_staging(&staging).await;
            return Err(SdtpError::ChecksumMismatch {
                name: file.name.clone(),
                expected: verdict.expected,
                computed: verdict.computed,
            });
        }

        if let Err(source) = tokio::fs::rename(&staging, &target).await {
            remove_staging(&staging).await;
            return Err(SdtpError::filesystem(&target, source));
        }

        info!(path = %target.display(), "download complete");
        Ok(target)
    }

    #[instrument(skip(self, file, cancel), fields(file_id = file.id, name = %file.name))]
    async fn ack(&self, file: &FileInfo, cancel: &CancellationToken) -> Result<(), SdtpError> {
        let url = self.endpoint(&["files", &file.id.to_string()]);
        self.send(Operation::Ack, self.client.delete(url), cancel)
            .await?;
        debug!("acknowledged");
        Ok(())
    }

    #[instrument(skip(self, cancel))]
    async fn register(&self, cancel: &CancellationToken) -> Result<(), SdtpError> {
        let url = self.endpoint(&["register"]);
        self.send(Operation::Register, self.client.put(url), cancel)
            .await?;
        Ok(())
    }
}

/// Streams the response body through a [`ChecksumWriter`] at `staging`.
///
/// Extracted so the caller can remove the staging file on any error.
async fn stream_verified(
    response: Response,
    staging: &Path,
    descriptor: &ChecksumDescriptor,
) -> Result<ChecksumVerdict, SdtpError> {
    let mut writer = ChecksumWriter::create(staging, descriptor)
        .await
        .map_err(|e| SdtpError::filesystem(staging, e))?;
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| SdtpError::transport(Operation::Download, e))?;
        writer
            .write(&chunk)
            .await
            .map_err(|e| SdtpError::filesystem(staging, e))?;
    }

    let bytes = writer.bytes_written();
    let verdict = writer
        .finish()
        .await
        .map_err(|e| SdtpError::filesystem(staging, e))?;
    debug!(bytes, matched = verdict.is_match(), "staging file written");
    Ok(verdict)
}

async fn remove_staging(path: &Path) {
    if let Err(e) = tokio::fs::remove_file(path).await
        && e.kind() != std::io::ErrorKind::NotFound
    {
        warn!(path = %path.display(), error = %e, "failed to remove staging file");
    }
}
