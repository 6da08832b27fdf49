//! Signer certificate validity checks
//!
//! This is a validity-window and weak-digest check on the active signer
//! certificate. It does not verify the signature over the package contents.
//! Only MD5-based algorithms are flagged as weak.

use crate::fingerprint::{format_timestamp, not_after, not_before, signature_algorithm_name};
use chrono::{DateTime, Utc};
use serde::Serialize;
use x509_cert::Certificate;

/// Outcome of checking a signer certificate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verification {
    /// Whether the certificate is acceptable
    pub is_valid: bool,
    /// Human-readable verdict
    pub message: String,
}

impl Verification {
    /// Create a successful verification result
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            is_valid: true,
            message: message.into(),
        }
    }

    /// Create a failed verification result
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }
}

/// Check a signer certificate against `now`.
///
/// Rules apply in order: missing certificate, not yet valid, expired, MD5
/// algorithm (valid with a warning), otherwise valid.
pub fn verify_certificate(cert: Option<&Certificate>, now: DateTime<Utc>) -> Verification {
    let Some(cert) = cert else {
        return Verification::failure("no certificate found");
    };

    let valid_from = not_before(cert);
    if now < valid_from {
        return Verification::failure(format!(
            "certificate is not yet valid (valid from: {})",
            format_timestamp(valid_from)
        ));
    }

    let valid_to = not_after(cert);
    if now > valid_to {
        return Verification::failure(format!(
            "certificate has expired (expired at: {})",
            format_timestamp(valid_to)
        ));
    }

    let algorithm = signature_algorithm_name(cert);
    if algorithm.to_lowercase().contains("md5") {
        return Verification::success(format!(
            "warning: certificate uses the insecure MD5 signature algorithm ({algorithm})"
        ));
    }

    Verification::success("signature is valid")
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use der::Decode;

    const SIGNER_DER: &[u8] = include_bytes!("../tests/fixtures/signer.der");
    const EXPIRED_DER: &[u8] = include_bytes!("../tests/fixtures/expired.der");
    const FUTURE_DER: &[u8] = include_bytes!("../tests/fixtures/future.der");
    const MD5_DER: &[u8] = include_bytes!("../tests/fixtures/md5.der");

    fn cert(der: &[u8]) -> Certificate {
        Certificate::from_der(der).expect("fixture should decode")
    }

    fn year(y: i32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, 1, 1, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_missing_certificate() {
        let v = verify_certificate(None, year(2030));
        assert!(!v.is_valid);
        assert_eq!(v.message, "no certificate found");
    }

    #[test]
    fn test_valid_certificate() {
        let v = verify_certificate(Some(&cert(SIGNER_DER)), year(2030));
        assert_eq!(v, Verification::success("signature is valid"));
    }

    #[test]
    fn test_expired_certificate() {
        let v = verify_certificate(Some(&cert(EXPIRED_DER)), year(2030));
        assert!(!v.is_valid);
        assert!(v.message.contains("expired"));
        assert!(v.message.contains("2010-01-01T00:00:00"));
    }

    #[test]
    fn test_not_yet_valid_certificate() {
        let v = verify_certificate(Some(&cert(FUTURE_DER)), year(2030));
        assert!(!v.is_valid);
        assert!(v.message.contains("not yet valid"));
        assert!(v.message.contains("2090-01-01T00:00:00"));
    }

    #[test]
    fn test_md5_certificate_is_valid_with_warning() {
        let v = verify_certificate(Some(&cert(MD5_DER)), year(2030));
        assert!(v.is_valid);
        assert!(v.message.contains("MD5"));
        assert!(v.message.contains("md5WithRSAEncryption"));
    }

    #[test]
    fn test_window_checks_precede_algorithm_check() {
        // Before the MD5 certificate's activation the window rule wins
        let v = verify_certificate(Some(&cert(MD5_DER)), year(2001));
        assert!(!v.is_valid);
        assert!(!v.message.contains("MD5"));
    }
}
