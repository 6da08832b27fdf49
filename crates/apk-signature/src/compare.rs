//! Signing identity comparison across two packages

use crate::error::Result;
use crate::parser::ApkParser;
use crate::types::{Fingerprints, HashKind};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// Field-by-field comparison of two signing identities.
///
/// `identical` is derived from the three per-digest flags in
/// [`ComparisonResult::new`] and cannot be set independently.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonResult {
    apk1: String,
    apk2: String,
    md5_match: bool,
    sha1_match: bool,
    sha256_match: bool,
    identical: bool,
    fingerprints1: Fingerprints,
    fingerprints2: Fingerprints,
}

impl ComparisonResult {
    /// Compare two fingerprint sets labelled by their sources
    pub fn new(
        apk1: impl Into<String>,
        apk2: impl Into<String>,
        fingerprints1: Fingerprints,
        fingerprints2: Fingerprints,
    ) -> Self {
        let md5_match = fingerprints1.md5 == fingerprints2.md5;
        let sha1_match = fingerprints1.sha1 == fingerprints2.sha1;
        let sha256_match = fingerprints1.sha256 == fingerprints2.sha256;

        Self {
            apk1: apk1.into(),
            apk2: apk2.into(),
            md5_match,
            sha1_match,
            sha256_match,
            identical: md5_match && sha1_match && sha256_match,
            fingerprints1,
            fingerprints2,
        }
    }

    /// First source label
    pub fn apk1(&self) -> &str {
        &self.apk1
    }

    /// Second source label
    pub fn apk2(&self) -> &str {
        &self.apk2
    }

    /// Whether the given digest matches on both sides
    pub fn matches(&self, kind: HashKind) -> bool {
        match kind {
            HashKind::Md5 => self.md5_match,
            HashKind::Sha1 => self.sha1_match,
            HashKind::Sha256 => self.sha256_match,
        }
    }

    /// All three digests match
    pub fn identical(&self) -> bool {
        self.identical
    }

    /// Fingerprints of the first package
    pub fn fingerprints1(&self) -> &Fingerprints {
        &self.fingerprints1
    }

    /// Fingerprints of the second package
    pub fn fingerprints2(&self) -> &Fingerprints {
        &self.fingerprints2
    }
}

/// Parse both packages independently and compare their signer fingerprints.
///
/// A failure on either side is returned as-is; no partial comparison is
/// produced.
pub fn compare_signatures(
    apk1: impl AsRef<Path>,
    apk2: impl AsRef<Path>,
) -> Result<ComparisonResult> {
    let (apk1, apk2) = (apk1.as_ref(), apk2.as_ref());

    let identity1 = ApkParser::new(apk1).parse()?;
    let identity2 = ApkParser::new(apk2).parse()?;

    let result = ComparisonResult::new(
        apk1.display().to_string(),
        apk2.display().to_string(),
        identity1.fingerprints,
        identity2.fingerprints,
    );
    debug!(
        "Compared {} and {}: identical={}",
        result.apk1,
        result.apk2,
        result.identical
    );
    Ok(result)
}
