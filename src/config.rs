//! Explicit configuration values passed into client constructors.

use std::path::{Path, PathBuf};
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::constants::{CONNECT_TIMEOUT_SECS, DEFAULT_CERT_WARNING_DAYS, REQUEST_TIMEOUT_SECS};

/// Errors from validating configuration values.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The API URL does not parse.
    #[error("invalid api-url {url:?}: {reason}")]
    InvalidApiUrl {
        /// The rejected URL text.
        url: String,
        /// Why it was rejected.
        reason: String,
    },

    /// A timeout of zero would fail every request.
    #[error("http timeout must be greater than zero")]
    ZeroTimeout,
}

/// Connection settings for [`HttpSdtpClient`](crate::transport::HttpSdtpClient).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    api_url: Url,
    cert_path: PathBuf,
    key_path: PathBuf,
    request_timeout: Duration,
    connect_timeout: Duration,
}

impl ClientConfig {
    /// Validates the API URL and builds a configuration with default timeouts.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiUrl`] if the URL does not parse, is not
    /// http/https, or carries a query string or fragment.
    pub fn new(
        api_url: &str,
        cert_path: impl Into<PathBuf>,
        key_path: impl Into<PathBuf>,
    ) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidApiUrl {
            url: api_url.to_string(),
            reason: reason.to_string(),
        };
        let parsed = Url::parse(api_url).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }
        if parsed.query().is_some() || parsed.fragment().is_some() {
            return Err(invalid("api-url must not contain query or fragment"));
        }

        Ok(Self {
            api_url: parsed,
            cert_path: cert_path.into(),
            key_path: key_path.into(),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(CONNECT_TIMEOUT_SECS),
        })
    }

    /// Overrides the overall per-request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroTimeout`] for a zero duration.
    pub fn with_request_timeout(mut self, timeout: Duration) -> Result<Self, ConfigError> {
        if timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        self.request_timeout = timeout;
        Ok(self)
    }

    #[must_use]
    pub fn api_url(&self) -> &Url {
        &self.api_url
    }

    #[must_use]
    pub fn cert_path(&self) -> &Path {
        &self.cert_path
    }

    #[must_use]
    pub fn key_path(&self) -> &Path {
        &self.key_path
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    #[must_use]
    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

/// Certificate expiration gating applied before network commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CertPolicy {
    /// Whether to inspect the certificate at all.
    pub enabled: bool,
    /// Days-remaining threshold (inclusive) for the expiring-soon warning.
    pub warning_days: u32,
}

impl Default for CertPolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            warning_days: DEFAULT_CERT_WARNING_DAYS,
        }
    }
}
