//! Check command handler: verify the credential works against `/files`.

use sdtp_core::{SdtpClient, SdtpError};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use crate::ProcessExit;
use crate::app::exit_handler::exit_for_error;

pub async fn run_check_command(client: &dyn SdtpClient, cancel: &CancellationToken) -> ProcessExit {
    match client.check(cancel).await {
        Ok(()) => {
            info!("successfully connected to server and performed a HEAD request to the /files endpoint");
            ProcessExit::Success
        }
        Err(SdtpError::NotAuthorized) => {
            error!("failed to authenticate using provided cert and key");
            ProcessExit::Failure
        }
        Err(SdtpError::Forbidden) => {
            warn!(
                "authenticated successfully (certificate works); not authorized to access /files endpoint yet"
            );
            ProcessExit::Pending
        }
        Err(e) => {
            error!(error = %e, "check failed for a non-auth related reason");
            exit_for_error(&e)
        }
    }
}
