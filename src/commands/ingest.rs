//! Ingest command handler: download, verify and acknowledge matching files.

use std::sync::Arc;

use anyhow::{Context, Result};
use sdtp_core::{IngestEngine, SdtpClient};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::ProcessExit;
use crate::app::exit_handler::{exit_for_error, exit_for_ingest};
use crate::cli::IngestArgs;

pub async fn run_ingest_command(
    client: Arc<dyn SdtpClient>,
    args: &IngestArgs,
    cancel: &CancellationToken,
) -> Result<ProcessExit> {
    if !args.dest_dir.exists() {
        tokio::fs::create_dir_all(&args.dest_dir)
            .await
            .with_context(|| format!("failed to create {}", args.dest_dir.display()))?;
        info!(dir = %args.dest_dir.display(), "created destination directory");
    }

    let engine = IngestEngine::new(usize::from(args.concurrency), !args.no_ack)
        .context("invalid ingest configuration")?;
    let tags = args.filter.to_tags();

    let stats = match engine.run(client, &tags, &args.dest_dir, cancel).await {
        Ok(stats) => stats,
        Err(e) => {
            error!(error = %e, "failed to list files");
            return Ok(exit_for_error(&e));
        }
    };

    if stats.was_cancelled() {
        warn!(
            downloaded = stats.downloaded(),
            listed = stats.listed(),
            "interrupted; remaining files will be listed again on the next run"
        );
    } else if stats.download_failed() > 0 || stats.ack_failed() > 0 {
        warn!(
            download_failed = stats.download_failed(),
            ack_failed = stats.ack_failed(),
            "some files were not ingested; they will be listed again on the next run"
        );
    }

    Ok(exit_for_ingest(&stats))
}
