//! Exit code logic for the sdtp process.
//!
//! Single responsibility: map command results to the process exit outcome.

use sdtp_core::{CertHealth, IngestStats, SdtpError};

use crate::ProcessExit;

/// Exit outcome for a fatal command error.
pub(crate) fn exit_for_error(error: &SdtpError) -> ProcessExit {
    if error.is_cancelled() {
        ProcessExit::Interrupted
    } else {
        ProcessExit::Failure
    }
}

/// Exit outcome of a completed ingest pass. Per-file failures are reported in
/// the logs but do not fail the pass.
pub(crate) fn exit_for_ingest(stats: &IngestStats) -> ProcessExit {
    if stats.was_cancelled() {
        ProcessExit::Interrupted
    } else {
        ProcessExit::Success
    }
}

/// Exit outcome that stops a command before any network call, if any.
pub(crate) fn exit_for_health(health: CertHealth) -> Option<ProcessExit> {
    match health {
        CertHealth::Expired => Some(ProcessExit::CertExpired),
        CertHealth::Healthy | CertHealth::ExpiringSoon => None,
    }
}
