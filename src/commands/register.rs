//! Register command handler.

use sdtp_core::{SdtpClient, SdtpError};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::ProcessExit;
use crate::app::exit_handler::exit_for_error;

pub async fn run_register_command(client: &dyn SdtpClient, cancel: &CancellationToken) -> ProcessExit {
    match client.register(cancel).await {
        Ok(()) => {
            info!(
                "Registration successful. Contact your SDTP administrator to activate your account."
            );
            ProcessExit::Success
        }
        Err(SdtpError::AlreadyExists) => {
            warn!(
                "certificate is already registered; contact your SDTP administrator if your account is not yet active"
            );
            ProcessExit::Pending
        }
        Err(e) => {
            error!(error = %e, "registration failed");
            exit_for_error(&e)
        }
    }
}
