//! Signing identity extraction for Android packages
//!
//! This crate recovers the signer certificate of a JAR-signed (v1) APK,
//! derives MD5/SHA-1/SHA-256 fingerprints of its DER encoding and compares
//! signing identities across packages.
//!
//! # Pipeline
//!
//! - [`locator`]: finds `META-INF/*.RSA|*.DSA|*.EC` in the archive listing
//! - [`extractor`]: best-effort scan of the signer block for certificates
//! - [`signing_block`]: presence check for the v2+ APK Signing Block
//! - [`fingerprint`]: digests and canonical certificate metadata
//! - [`verify`]: validity window and weak-algorithm check
//! - [`compare`]: field-by-field comparison of two packages
//!
//! The v2+ signing block is detected but never decoded; packages signed only
//! with it yield [`ApkSignatureError::NoSignatureFound`].
//!
//! # Example
//!
//! ```no_run
//! use apk_signature::{ApkParser, compare_signatures};
//!
//! let mut parser = ApkParser::new("app.apk");
//! let identity = parser.parse()?;
//! println!("SHA-256: {}", identity.fingerprints.sha256);
//! println!("{}", parser.verify().message);
//!
//! let result = compare_signatures("app.apk", "app-update.apk")?;
//! println!("same signer: {}", result.identical());
//! # Ok::<(), apk_signature::ApkSignatureError>(())
//! ```

#![warn(missing_docs)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod archive;
pub mod compare;
pub mod error;
pub mod extractor;
pub mod fingerprint;
pub mod locator;
pub mod parser;
pub mod signing_block;
pub mod types;
pub mod verify;

pub use archive::{ArchiveSource, MemoryArchive, ZipArchiveSource};
pub use compare::{ComparisonResult, compare_signatures};
pub use error::{ApkSignatureError, Result};
pub use extractor::extract_certificates;
pub use locator::{LocatedSignature, locate_signature};
pub use parser::{ApkParser, parse_apk};
pub use signing_block::detect_signing_block;
pub use types::{
    CertificateDetails, Fingerprints, HashKind, IssuerInfo, SignatureScheme, SigningIdentity,
    SubjectInfo,
};
pub use verify::{Verification, verify_certificate};
