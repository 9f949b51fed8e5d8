use std::fmt;

use super::CertificateInfo;

/// Expiration classification of a client certificate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertHealth {
    Healthy,
    /// Still valid, but within the warning window.
    ExpiringSoon,
    /// Past its not-after time; network commands must not proceed.
    Expired,
}

impl fmt::Display for CertHealth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Healthy => "healthy",
            Self::ExpiringSoon => "expiring soon",
            Self::Expired => "expired",
        })
    }
}

/// Classifies `info` against a warning window of `warning_days` (inclusive).
#[must_use]
pub fn classify(info: &CertificateInfo, warning_days: u32) -> CertHealth {
    if info.expired {
        CertHealth::Expired
    } else if (0..=i64::from(warning_days)).contains(&info.days_remaining) {
        CertHealth::ExpiringSoon
    } else {
        CertHealth::Healthy
    }
}
