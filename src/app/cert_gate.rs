//! Certificate expiration gate run before network commands.

use std::path::Path;

use anyhow::{Context, Result};
use sdtp_core::{CertHealth, CertPolicy, CertificateInfo, classify, inspect_credentials};
use tracing::{debug, error, info, warn};

/// Inspects the credentials and logs their status.
pub(crate) fn inspect(cert: &Path, key: &Path, warning_days: u32) -> Result<(CertificateInfo, CertHealth)> {
    let info = inspect_credentials(cert, key)
        .with_context(|| format!("failed to load client certificate {}", cert.display()))?;
    let health = classify(&info, warning_days);
    report(&info, health);
    Ok((info, health))
}

/// Applies `policy` before a network command. Returns `None` when the
/// certificate is not checked.
pub(crate) fn enforce(cert: &Path, key: &Path, policy: CertPolicy) -> Result<Option<CertHealth>> {
    if !policy.enabled {
        debug!("certificate expiration check disabled");
        return Ok(None);
    }
    let (_, health) = inspect(cert, key, policy.warning_days)?;
    Ok(Some(health))
}

fn report(info: &CertificateInfo, health: CertHealth) {
    let expiration = info.expiration.to_rfc3339();
    match health {
        CertHealth::Expired => error!(
            dn = %info.subject,
            expiration = %expiration,
            issuer = %info.issuer,
            "certificate expired"
        ),
        CertHealth::ExpiringSoon => warn!(
            dn = %info.subject,
            expiration = %expiration,
            days_left = info.days_remaining,
            issuer = %info.issuer,
            "certificate expires soon"
        ),
        CertHealth::Healthy => info!(
            dn = %info.subject,
            expiration = %expiration,
            days_left = info.days_remaining,
            issuer = %info.issuer,
            "certificate ok"
        ),
    }
}
