//! Per-package signature extraction
//!
//! An [`ApkParser`] is created for one package path. [`ApkParser::parse`]
//! re-reads the file every time it is called and keeps the recovered
//! certificates only inside the parser, so independent parsers never share
//! state.

use crate::archive::{ArchiveSource, ZipArchiveSource};
use crate::error::{ApkSignatureError, Result};
use crate::fingerprint::identity_from_certificate;
use crate::locator::{LocatedSignature, locate_signature};
use crate::signing_block::detect_signing_block_in_file;
use crate::types::{SignatureScheme, SigningIdentity};
use crate::verify::{Verification, verify_certificate};
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use x509_cert::Certificate;

/// Signature parser bound to one package path
#[derive(Debug)]
pub struct ApkParser {
    path: PathBuf,
    certificates: Vec<Certificate>,
}

impl ApkParser {
    /// Create a parser for `path`; nothing is read until [`parse`](Self::parse)
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            certificates: Vec::new(),
        }
    }

    /// Package path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Certificates recovered by the last successful parse, signer first
    pub fn certificates(&self) -> &[Certificate] {
        &self.certificates
    }

    /// Active signer certificate, if a parse found one
    pub fn signer_certificate(&self) -> Option<&Certificate> {
        self.certificates.first()
    }

    /// Extract the signing identity of the package.
    pub fn parse(&mut self) -> Result<SigningIdentity> {
        self.parse_at(Utc::now())
    }

    /// Extract the signing identity, judging expiry against `now`.
    pub fn parse_at(&mut self, now: DateTime<Utc>) -> Result<SigningIdentity> {
        self.certificates.clear();
        info!("Parsing signature of {}", self.path.display());

        let mut archive = ZipArchiveSource::open(&self.path)?;
        let located = self.locate(&mut archive)?;
        drop(archive);

        let signing_block_present = self.scan_signing_block()?;

        match located {
            LocatedSignature::Found {
                entry,
                certificates,
            } => {
                debug!(
                    "Signer certificate taken from {} ({} in envelope)",
                    entry,
                    certificates.len()
                );
                self.certificates = certificates;
            }
            LocatedSignature::Undecodable { entry } => {
                return Err(ApkSignatureError::DecodeFailure {
                    path: self.path.clone(),
                    entry,
                });
            }
            LocatedSignature::NotFound => {
                if signing_block_present {
                    warn!(
                        "{} carries only an APK Signing Block, which is not decoded",
                        self.path.display()
                    );
                }
                return Err(ApkSignatureError::NoSignatureFound {
                    path: self.path.clone(),
                });
            }
        }

        let Some(signer) = self.signer_certificate() else {
            return Err(ApkSignatureError::NoSignatureFound {
                path: self.path.clone(),
            });
        };

        let mut identity = identity_from_certificate(signer, SignatureScheme::LegacyJar, now)?;
        identity.signing_block_present = signing_block_present;
        Ok(identity)
    }

    /// Check the active signer certificate's validity window and algorithm.
    pub fn verify(&self) -> Verification {
        self.verify_at(Utc::now())
    }

    /// Like [`verify`](Self::verify) with an explicit reference time.
    pub fn verify_at(&self, now: DateTime<Utc>) -> Verification {
        verify_certificate(self.signer_certificate(), now)
    }

    fn locate<A: ArchiveSource>(&self, archive: &mut A) -> Result<LocatedSignature> {
        locate_signature(archive).map_err(|source| ApkSignatureError::Io {
            path: self.path.clone(),
            source,
        })
    }

    fn scan_signing_block(&self) -> Result<bool> {
        let present =
            detect_signing_block_in_file(&self.path).map_err(|source| ApkSignatureError::Io {
                path: self.path.clone(),
                source,
            })?;
        debug!(
            "Signing block {} in {}",
            if present { "present" } else { "absent" },
            self.path.display()
        );
        Ok(present)
    }
}

/// Parse one package with a fresh parser.
pub fn parse_apk(path: impl AsRef<Path>) -> Result<SigningIdentity> {
    ApkParser::new(path).parse()
}
