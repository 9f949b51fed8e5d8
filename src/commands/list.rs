//! List command handler: print available files as JSON lines.

use std::collections::HashMap;
use std::io::Write;

use anyhow::{Context, Result};
use sdtp_core::SdtpClient;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::ProcessExit;
use crate::app::exit_handler::exit_for_error;

/// Writes one JSON object per listed file to `out`. Logs go to stderr.
pub async fn run_list_command(
    client: &dyn SdtpClient,
    tags: &HashMap<String, String>,
    cancel: &CancellationToken,
    out: &mut impl Write,
) -> Result<ProcessExit> {
    let files = match client.list(tags, cancel).await {
        Ok(files) => files,
        Err(e) => {
            error!(error = %e, "failed to list files");
            return Ok(exit_for_error(&e));
        }
    };

    if files.is_empty() {
        info!("no files found");
        return Ok(ProcessExit::Success);
    }

    info!(count = files.len(), "found files");
    for file in &files {
        serde_json::to_writer(&mut *out, file)
            .with_context(|| format!("failed to encode file record {}", file.id))?;
        writeln!(out).context("failed to write listing")?;
    }
    out.flush().context("failed to write listing")?;

    Ok(ProcessExit::Success)
}
