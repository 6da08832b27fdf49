//! Best-effort certificate scanner
//!
//! Signer files in `META-INF/` hold a PKCS#7 `SignedData` envelope. Rather
//! than parsing the envelope grammar, the scanner walks the buffer looking
//! for DER `SEQUENCE` headers with a two-byte long-form length
//! (`30 82 hi lo`) and tries to decode each such span as an X.509
//! certificate.
//!
//! Contract:
//! - results are returned in the order they were found scanning forward
//!   from offset 0;
//! - after a successful decode the cursor jumps past the certificate, so
//!   nested sequences inside it are never reported;
//! - a failed decode (including a declared length running past the end of
//!   the buffer) advances the cursor by one byte and is never reported;
//! - scanning stops when fewer than four bytes remain.
//!
//! Certificates whose encoding uses another length form (short form, or
//! `0x81`/`0x83` long forms) are not found by design.

use der::Decode;
use tracing::trace;
use x509_cert::Certificate;

/// DER tag byte for a constructed SEQUENCE
const SEQUENCE_TAG: u8 = 0x30;
/// Long-form length marker followed by two length bytes
const LONG_FORM_TWO_BYTES: u8 = 0x82;
/// Tag, length marker and two length bytes
const HEADER_LEN: usize = 4;

/// Outcome of inspecting one scan position.
#[derive(Debug)]
enum ScanStep {
    /// A certificate was decoded from `len` bytes at the current offset
    Certificate(Box<Certificate>, usize),
    /// Nothing usable at this offset
    Skip,
}

/// Scan `data` for DER-encoded certificates.
///
/// Never fails: an empty result means no candidate span decoded.
pub fn extract_certificates(data: &[u8]) -> Vec<Certificate> {
    let mut certificates = Vec::new();
    let mut offset = 0usize;

    while data.len().saturating_sub(offset) >= HEADER_LEN {
        match step_at(data, offset) {
            ScanStep::Certificate(cert, len) => {
                trace!("Certificate of {} bytes at offset {:#x}", len, offset);
                certificates.push(*cert);
                offset += len;
            }
            ScanStep::Skip => offset += 1,
        }
    }

    certificates
}

fn step_at(data: &[u8], offset: usize) -> ScanStep {
    let header = &data[offset..offset + HEADER_LEN];
    if header[0] != SEQUENCE_TAG || header[1] != LONG_FORM_TWO_BYTES {
        return ScanStep::Skip;
    }

    let body_len = usize::from(u16::from_be_bytes([header[2], header[3]]));
    let span_len = HEADER_LEN + body_len;
    let Some(span) = data.get(offset..offset + span_len) else {
        return ScanStep::Skip;
    };

    match Certificate::from_der(span) {
        Ok(cert) => ScanStep::Certificate(Box::new(cert), span_len),
        Err(e) => {
            trace!("Candidate at offset {:#x} is not a certificate: {}", offset, e);
            ScanStep::Skip
        }
    }
}
