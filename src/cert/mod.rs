//! Client credential inspection.
//!
//! Loads the PEM certificate presented to the server, extracts its expiration
//! and identity, and classifies how close it is to expiring. Parsing uses
//! `x509-parser`; all times are UTC.

mod health;

pub use health::{CertHealth, classify};

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::debug;
use x509_parser::pem::Pem;

const SECONDS_PER_DAY: i64 = 86_400;
const CERTIFICATE_LABEL: &str = "CERTIFICATE";

/// Errors from loading or parsing client credentials.
#[derive(Debug, Error)]
pub enum CertError {
    /// A credential file could not be read.
    #[error("failed to read {path}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The input is not valid PEM.
    #[error("invalid PEM data: {reason}")]
    Pem {
        /// Decoder message.
        reason: String,
    },

    /// No `CERTIFICATE` block was found.
    #[error("no certificate found")]
    NoCertificate,

    /// More than one certificate was found; only a single leaf is accepted.
    #[error("expected exactly one certificate, found {count}; certificate chains are not supported")]
    Chain {
        /// Number of certificate blocks found.
        count: usize,
    },

    /// The key file holds no PEM private key.
    #[error("no private key found in {path}")]
    NoPrivateKey {
        /// The key file.
        path: PathBuf,
    },

    /// The certificate block does not decode as X.509.
    #[error("failed to parse certificate: {reason}")]
    Parse {
        /// Parser message.
        reason: String,
    },
}

/// Identity and expiration details of a client certificate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CertificateInfo {
    /// Subject distinguished name.
    pub subject: String,
    /// Issuer distinguished name.
    pub issuer: String,
    /// The certificate's not-after time.
    pub expiration: DateTime<Utc>,
    /// Whole days until expiration, rounded down; negative once expired.
    pub days_remaining: i64,
    /// True when `now` is after the not-after time.
    pub expired: bool,
}

impl CertificateInfo {
    /// Parses a single PEM certificate and evaluates it at `now`.
    ///
    /// # Errors
    ///
    /// Returns [`CertError::NoCertificate`] or [`CertError::Chain`] unless the
    /// input holds exactly one `CERTIFICATE` block, and [`CertError::Pem`] /
    /// [`CertError::Parse`] for malformed input.
    pub fn from_pem(pem: &[u8], now: DateTime<Utc>) -> Result<Self, CertError> {
        let mut certificates = Vec::new();
        for block in Pem::iter_from_buffer(pem) {
            let block = block.map_err(|e| CertError::Pem {
                reason: e.to_string(),
            })?;
            if block.label == CERTIFICATE_LABEL {
                certificates.push(block);
            }
        }

        let leaf = match certificates.as_slice() {
            [] => return Err(CertError::NoCertificate),
            [leaf] => leaf,
            chain => return Err(CertError::Chain { count: chain.len() }),
        };

        let certificate = leaf.parse_x509().map_err(|e| CertError::Parse {
            reason: e.to_string(),
        })?;
        let not_after = certificate.validity().not_after.timestamp();
        let expiration = DateTime::from_timestamp(not_after, 0).ok_or_else(|| CertError::Parse {
            reason: format!("expiration timestamp {not_after} out of range"),
        })?;

        let remaining = not_after - now.timestamp();
        Ok(Self {
            subject: certificate.subject().to_string(),
            issuer: certificate.issuer().to_string(),
            expiration,
            days_remaining: remaining.div_euclid(SECONDS_PER_DAY),
            expired: now > expiration,
        })
    }
}

/// Reads the certificate/key pair from disk and inspects the certificate at
/// the current time.
///
/// # Errors
///
/// Returns [`CertError::Read`] if either file cannot be read,
/// [`CertError::NoPrivateKey`] if the key file holds no PEM private key, and
/// any error of [`CertificateInfo::from_pem`].
pub fn inspect_credentials(cert_path: &Path, key_path: &Path) -> Result<CertificateInfo, CertError> {
    let cert = read(cert_path)?;
    let key = read(key_path)?;
    if !contains_private_key(&key) {
        return Err(CertError::NoPrivateKey {
            path: key_path.to_path_buf(),
        });
    }

    let info = CertificateInfo::from_pem(&cert, Utc::now())?;
    debug!(
        subject = %info.subject,
        expiration = %info.expiration.to_rfc3339(),
        days_remaining = info.days_remaining,
        "inspected client certificate"
    );
    Ok(info)
}

fn read(path: &Path) -> Result<Vec<u8>, CertError> {
    std::fs::read(path).map_err(|source| CertError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn contains_private_key(pem: &[u8]) -> bool {
    Pem::iter_from_buffer(pem)
        .filter_map(Result::ok)
        .any(|block| block.label.ends_with("PRIVATE KEY"))
}
