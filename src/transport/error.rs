//! Error taxonomy for SDTP operations.
//!
//! Callers match on the variant kind: authentication (`NotAuthorized`) and
//! authorization (`Forbidden`) failures stay distinguishable all the way up to
//! the command layer.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::checksum::ChecksumError;

/// The protocol operation a request belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Check,
    List,
    Download,
    Ack,
    Register,
}

impl Operation {
    /// Lowercase operation name used in logs and error messages.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Check => "check",
            Self::List => "list",
            Self::Download => "download",
            Self::Ack => "ack",
            Self::Register => "register",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur while talking to an SDTP server or persisting a download.
#[derive(Debug, Error)]
pub enum SdtpError {
    /// The server rejected the client certificate (HTTP 401).
    #[error("unable to authenticate with the provided certificate")]
    NotAuthorized,

    /// Authenticated, but without permission for the resource (HTTP 403).
    #[error("authenticated, but no permissions to the resource")]
    Forbidden,

    /// Unknown resource (HTTP 404).
    #[error("not found")]
    NotFound,

    /// Registration conflict (HTTP 409 on register).
    #[error("already exists")]
    AlreadyExists,

    /// Downloaded bytes do not match the declared checksum.
    #[error("checksum mismatch for {name}: got {computed}, wanted {expected}")]
    ChecksumMismatch {
        /// Name of the file that failed verification.
        name: String,
        /// Expected digest.
        expected: String,
        /// Digest of the received bytes.
        computed: String,
    },

    /// Any other status the operation does not accept.
    #[error("{operation} request failed: HTTP {status}")]
    UnexpectedStatus {
        /// Operation that received the status.
        operation: Operation,
        /// The HTTP status code.
        status: u16,
    },

    /// Network or protocol-level failure, including undecodable response bodies.
    #[error("{operation} request failed: {source}")]
    Transport {
        /// Operation that failed.
        operation: Operation,
        /// The underlying client error.
        #[source]
        source: reqwest::Error,
    },

    /// Local IO failure while writing, committing or cleaning up a download.
    #[error("IO error at {path}: {source}")]
    Filesystem {
        /// Path the error occurred at.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The server-reported file name is not a plain relative filename.
    #[error("refusing unsafe file name {name:?}")]
    InvalidFileName {
        /// The rejected name.
        name: String,
    },

    /// The server-reported checksum descriptor cannot be used.
    #[error("invalid checksum for {name}: {source}")]
    InvalidChecksum {
        /// Name of the file carrying the descriptor.
        name: String,
        /// Parse failure.
        #[source]
        source: ChecksumError,
    },

    /// The client identity (certificate/key) could not be loaded.
    #[error("failed to load client identity: {reason}")]
    Identity {
        /// Human readable cause.
        reason: String,
    },

    /// The operation was abandoned because cancellation was requested.
    #[error("{operation} cancelled")]
    Cancelled {
        /// Operation that was in flight.
        operation: Operation,
    },
}

impl SdtpError {
    /// Creates a transport error for `operation`.
    pub fn transport(operation: Operation, source: reqwest::Error) -> Self {
        Self::Transport { operation, source }
    }

    /// Creates a filesystem error.
    pub fn filesystem(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Filesystem {
            path: path.into(),
            source,
        }
    }

    /// Returns true if this error was caused by cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}
