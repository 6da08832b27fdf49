//! Legacy (JAR) signer discovery
//!
//! A v1-signed package stores its signer block as `META-INF/<NAME>.RSA`,
//! `.DSA` or `.EC`. The locator picks the first such entry in archive
//! listing order, runs the certificate scanner over it and falls back to a
//! bare DER certificate decode when the scan finds nothing.
//!
//! Listing order is whatever the archive writer produced; it is not
//! re-sorted. Packages with several signer files therefore resolve to the
//! one written first.

use crate::archive::ArchiveSource;
use crate::extractor::extract_certificates;
use der::Decode;
use std::io;
use tracing::debug;
use x509_cert::Certificate;

/// Reserved metadata directory
pub const META_INF_PREFIX: &str = "META-INF/";

/// Signer file extensions for the three legacy signature algorithms
pub const SIGNER_EXTENSIONS: [&str; 3] = [".RSA", ".DSA", ".EC"];

/// Result of looking for a legacy signer entry.
#[derive(Debug)]
pub enum LocatedSignature {
    /// Signer entry decoded; the first certificate is the active signer
    Found {
        /// Archive entry the certificates came from
        entry: String,
        /// All certificates recovered, in scan order (never empty)
        certificates: Vec<Certificate>,
    },
    /// Signer entry present but no certificate could be decoded
    Undecodable {
        /// Archive entry that failed to decode
        entry: String,
    },
    /// No signer entry in the archive
    NotFound,
}

/// Whether an entry name is a legacy signer block file.
pub fn is_signer_entry(name: &str) -> bool {
    name.starts_with(META_INF_PREFIX) && SIGNER_EXTENSIONS.iter().any(|ext| name.ends_with(ext))
}

/// Locate and decode the signer certificates of a package.
///
/// Only archive read failures are errors; a missing or undecodable signer
/// entry is reported through [`LocatedSignature`].
pub fn locate_signature<A: ArchiveSource + ?Sized>(archive: &mut A) -> io::Result<LocatedSignature> {
    let Some(entry) = archive
        .entry_names()
        .iter()
        .find(|name| is_signer_entry(name))
        .cloned()
    else {
        debug!("No META-INF signer entry");
        return Ok(LocatedSignature::NotFound);
    };

    debug!("Using signer entry {}", entry);
    let data = archive.read_entry(&entry)?;

    let certificates = decode_signer_block(&data);
    if certificates.is_empty() {
        debug!("Signer entry {} yielded no certificate", entry);
        return Ok(LocatedSignature::Undecodable { entry });
    }

    debug!(
        "Recovered {} certificate(s) from {}",
        certificates.len(),
        entry
    );
    Ok(LocatedSignature::Found {
        entry,
        certificates,
    })
}

/// Envelope scan first, bare certificate second.
pub fn decode_signer_block(data: &[u8]) -> Vec<Certificate> {
    let certificates = extract_certificates(data);
    if !certificates.is_empty() {
        return certificates;
    }

    match Certificate::from_der(data) {
        Ok(cert) => {
            debug!("Signer block is a bare certificate");
            vec![cert]
        }
        Err(e) => {
            debug!("Bare certificate decode failed: {}", e);
            Vec::new()
        }
    }
}
