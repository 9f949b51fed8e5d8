//! Shared HTTP status classification for every SDTP operation.

use super::error::{Operation, SdtpError};

impl Operation {
    /// Returns true if `status` counts as success for this operation.
    #[must_use]
    pub fn accepts(self, status: u16) -> bool {
        match self {
            Self::Check => (200..300).contains(&status),
            Self::List | Self::Download => status == 200,
            Self::Ack => matches!(status, 200 | 204),
            Self::Register => matches!(status, 200 | 201),
        }
    }
}

/// Maps a response status for `operation` onto the error taxonomy.
///
/// 401/403/404 map identically for every operation; 409 is `AlreadyExists`
/// only for register.
///
/// # Errors
///
/// Returns the classified [`SdtpError`] for any status the operation does not accept.
pub fn classify_status(operation: Operation, status: u16) -> Result<(), SdtpError> {
    if operation.accepts(status) {
        return Ok(());
    }
    Err(match status {
        401 => SdtpError::NotAuthorized,
        403 => SdtpError::Forbidden,
        404 => SdtpError::NotFound,
        409 if operation == Operation::Register => SdtpError::AlreadyExists,
        _ => SdtpError::UnexpectedStatus { operation, status },
    })
}
