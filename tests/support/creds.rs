//! Throwaway client credentials with chosen validity windows.

use std::path::PathBuf;

use rcgen::{CertificateParams, DnType, KeyPair};
use tempfile::TempDir;
use time::{Duration, OffsetDateTime};

/// A certificate/key pair written to a temp directory.
pub struct Credentials {
    pub dir: TempDir,
    pub cert: PathBuf,
    pub key: PathBuf,
}

fn certificate_pem(not_before: OffsetDateTime, not_after: OffsetDateTime) -> (String, String) {
    let mut params = CertificateParams::new(vec!["client.sdtp.test".to_string()])
        .expect("valid certificate params");
    params
        .distinguished_name
        .push(DnType::CommonName, "sdtp-integration-client");
    params.not_before = not_before;
    params.not_after = not_after;
    let key = KeyPair::generate().expect("generate key pair");
    let cert = params.self_signed(&key).expect("self-sign certificate");
    (cert.pem(), key.serialize_pem())
}

fn write(cert_pem: &str, key_pem: &str) -> Credentials {
    let dir = TempDir::new().expect("failed to create temp dir");
    let cert = dir.path().join("client.pem");
    let key = dir.path().join("client.key");
    std::fs::write(&cert, cert_pem).expect("write certificate");
    std::fs::write(&key, key_pem).expect("write key");
    Credentials { dir, cert, key }
}

/// Credentials expiring `days` days from now (negative for already expired).
pub fn expiring_in(days: i64) -> Credentials {
    let now = OffsetDateTime::now_utc();
    let (cert, key) = certificate_pem(now - Duration::days(400), now + Duration::days(days));
    write(&cert, &key)
}

/// A certificate file holding a two-certificate chain.
pub fn chain() -> Credentials {
    let now = OffsetDateTime::now_utc();
    let (first, key) = certificate_pem(now - Duration::days(1), now + Duration::days(365));
    let (second, _) = certificate_pem(now - Duration::days(1), now + Duration::days(365));
    write(&format!("{first}{second}"), &key)
}
