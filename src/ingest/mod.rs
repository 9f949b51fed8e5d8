//! Concurrent ingest of every file matching a tag set.
//!
//! A pass lists the matching files, feeds them through a bounded queue to a
//! fixed pool of workers, and has each worker download and then (optionally)
//! acknowledge its file. Per-file failures are logged and counted; only a
//! failed listing fails the pass.
//!
//! # Example
//!
//! ```no_run
//! use std::collections::HashMap;
//! use std::path::Path;
//! use std::sync::Arc;
//! use sdtp_core::{ClientConfig, HttpSdtpClient, IngestEngine};
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ClientConfig::new("https://sdtp.example.org/api/v1", "client.pem", "client.key")?;
//! let client = Arc::new(HttpSdtpClient::new(&config)?);
//! let engine = IngestEngine::new(4, true)?;
//! let tags = HashMap::from([("stream".to_string(), "raw".to_string())]);
//! let stats = engine
//!     .run(client, &tags, Path::new("./incoming"), &CancellationToken::new())
//!     .await?;
//! println!("downloaded {} of {}", stats.downloaded(), stats.listed());
//! # Ok(())
//! # }
//! ```

mod engine;
mod queue;

pub use engine::{DEFAULT_CONCURRENCY, EngineError, IngestEngine, IngestStats};
