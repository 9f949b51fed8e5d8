//! SDTP Core Library
//!
//! Client side of the Science Data Transfer Protocol: an authenticated file
//! distribution service where a client lists files by tag, downloads each one
//! with integrity verification, and acknowledges receipt so the server stops
//! offering it.
//!
//! # Architecture
//!
//! - [`transport`] - mTLS HTTP client behind the [`SdtpClient`] trait
//! - [`checksum`] - checksum descriptors and the verifying file writer
//! - [`ingest`] - bounded worker pool that downloads and acknowledges listings
//! - [`cert`] - client certificate expiration inspection
//! - [`file`] - file records and on-disk naming
//! - [`config`] - explicit configuration values

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod cert;
pub mod checksum;
pub mod config;
pub mod constants;
pub mod file;
pub mod ingest;
#[cfg(test)]
pub mod test_support;
pub mod transport;

// Re-export commonly used types
pub use cert::{CertError, CertHealth, CertificateInfo, classify, inspect_credentials};
pub use checksum::{ChecksumDescriptor, ChecksumError, ChecksumVerdict, ChecksumWriter, HashAlgorithm};
pub use config::{CertPolicy, ClientConfig, ConfigError};
pub use file::{FileInfo, final_path, is_safe_file_name, staging_path};
pub use ingest::{DEFAULT_CONCURRENCY, EngineError, IngestEngine, IngestStats};
pub use transport::{HttpSdtpClient, Operation, SdtpClient, SdtpError, classify_status};
