//! Signing identity records
//!
//! These are the structured results handed to formatting layers. Field
//! names follow the report layout (`scheme_version`, `fingerprints`,
//! `certificate`, ...), so serializing with serde yields the documented
//! document shape directly.

use serde::Serialize;
use std::fmt;

/// Placeholder for a distinguished-name attribute absent from the name
pub const NOT_AVAILABLE: &str = "N/A";

/// Signature generation the identity was located through
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignatureScheme {
    /// JAR signing: signer block stored as a `META-INF/` entry
    LegacyJar,
}

impl SignatureScheme {
    /// Stable tag used in reports
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::LegacyJar => "legacy-jar",
        }
    }
}

impl fmt::Display for SignatureScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Which digest of the certificate to address
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashKind {
    /// MD5, 32 hex characters
    Md5,
    /// SHA-1, 40 hex characters
    Sha1,
    /// SHA-256, 64 hex characters
    Sha256,
}

impl HashKind {
    /// All digests in report order
    pub const ALL: [Self; 3] = [Self::Md5, Self::Sha1, Self::Sha256];

    /// Lowercase name as used in reports
    pub const fn name(self) -> &'static str {
        match self {
            Self::Md5 => "md5",
            Self::Sha1 => "sha1",
            Self::Sha256 => "sha256",
        }
    }

    /// Length of the hex rendering
    pub const fn hex_len(self) -> usize {
        match self {
            Self::Md5 => 32,
            Self::Sha1 => 40,
            Self::Sha256 => 64,
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Lowercase hex digests of one certificate's DER encoding
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Fingerprints {
    /// MD5 digest
    pub md5: String,
    /// SHA-1 digest
    pub sha1: String,
    /// SHA-256 digest
    pub sha256: String,
}

impl Fingerprints {
    /// Digest for the requested hash kind
    pub fn get(&self, kind: HashKind) -> &str {
        match kind {
            HashKind::Md5 => &self.md5,
            HashKind::Sha1 => &self.sha1,
            HashKind::Sha256 => &self.sha256,
        }
    }
}

/// Subject distinguished-name attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubjectInfo {
    /// Common name
    #[serde(rename = "CN")]
    pub common_name: String,
    /// Organization
    #[serde(rename = "O")]
    pub organization: String,
    /// Organizational unit
    #[serde(rename = "OU")]
    pub organizational_unit: String,
    /// Locality
    #[serde(rename = "L")]
    pub locality: String,
    /// State or province
    #[serde(rename = "ST")]
    pub state: String,
    /// Country
    #[serde(rename = "C")]
    pub country: String,
}

impl SubjectInfo {
    /// Attributes paired with their short labels, in report order
    pub fn attributes(&self) -> [(&'static str, &str); 6] {
        [
            ("CN", self.common_name.as_str()),
            ("O", self.organization.as_str()),
            ("OU", self.organizational_unit.as_str()),
            ("L", self.locality.as_str()),
            ("ST", self.state.as_str()),
            ("C", self.country.as_str()),
        ]
    }
}

/// Issuer distinguished-name attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IssuerInfo {
    /// Common name
    #[serde(rename = "CN")]
    pub common_name: String,
    /// Organization
    #[serde(rename = "O")]
    pub organization: String,
}

impl IssuerInfo {
    /// Attributes paired with their short labels, in report order
    pub fn attributes(&self) -> [(&'static str, &str); 2] {
        [("CN", self.common_name.as_str()), ("O", self.organization.as_str())]
    }
}

/// Canonical certificate metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CertificateDetails {
    /// Subject attributes
    pub subject: SubjectInfo,
    /// Issuer attributes
    pub issuer: IssuerInfo,
    /// Serial number, lowercase hex without zero padding
    pub serial_number: String,
    /// Start of validity, `YYYY-MM-DDTHH:MM:SS`
    pub valid_from: String,
    /// End of validity, `YYYY-MM-DDTHH:MM:SS`
    pub valid_to: String,
    /// Whether `valid_to` had passed when the identity was extracted
    pub is_expired: bool,
    /// Signature algorithm display name
    pub signature_algorithm: String,
}

/// Signing identity of one package
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SigningIdentity {
    /// Scheme the certificate was located through
    pub scheme_version: SignatureScheme,
    /// Certificate digests
    pub fingerprints: Fingerprints,
    /// Certificate metadata
    pub certificate: CertificateDetails,
    /// Whether an APK Signing Block (v2/v3) magic was also detected
    #[serde(rename = "v2_signature", serialize_with = "serialize_block_presence")]
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub signing_block_present: bool,
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn serialize_block_presence<S: serde::Serializer>(
    _present: &bool,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str("v2/v3")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scheme_tag() {
        assert_eq!(SignatureScheme::LegacyJar.to_string(), "legacy-jar");
    }

    #[test]
    fn test_hash_kind_lengths() {
        assert_eq!(HashKind::Md5.hex_len(), 32);
        assert_eq!(HashKind::Sha1.hex_len(), 40);
        assert_eq!(HashKind::Sha256.hex_len(), 64);
        assert_eq!(
            HashKind::ALL.map(HashKind::name),
            ["md5", "sha1", "sha256"]
        );
    }

    #[test]
    fn test_fingerprint_lookup() {
        let fp = Fingerprints {
            md5: "a".repeat(32),
            sha1: "b".repeat(40),
            sha256: "c".repeat(64),
        };
        assert_eq!(fp.get(HashKind::Sha1), "b".repeat(40));
        assert_eq!(fp.get(HashKind::Sha256).len(), 64);
    }
}
