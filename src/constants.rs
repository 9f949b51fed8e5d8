//! Constants shared by the transport client and ingest engine.

/// Default SDTP API base URL.
pub const DEFAULT_API_URL: &str = "https://sips-data.ssec.wisc.edu/rivet/api/v1";

/// Default HTTP connect timeout (30 seconds).
pub const CONNECT_TIMEOUT_SECS: u64 = 30;

/// Default overall HTTP request timeout (5 minutes for large files).
pub const REQUEST_TIMEOUT_SECS: u64 = 300;

/// Default number of days before certificate expiration that triggers a warning.
pub const DEFAULT_CERT_WARNING_DAYS: u32 = 30;

/// Prefix marking an unverified download in the destination directory.
pub const STAGING_PREFIX: &str = ".";
