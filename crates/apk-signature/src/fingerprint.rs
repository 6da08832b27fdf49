//! Certificate fingerprints and canonical metadata
//!
//! All three digests are taken over the certificate's own DER encoding
//! (re-serialized from the decoded object), never over envelope bytes.

use crate::error::Result;
use crate::types::{
    CertificateDetails, Fingerprints, IssuerInfo, NOT_AVAILABLE, SignatureScheme, SigningIdentity,
    SubjectInfo,
};
use chrono::{DateTime, Utc};
use der::asn1::ObjectIdentifier;
use der::{Encode, Tagged};
use md5::Md5;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use x509_cert::Certificate;
use x509_cert::name::Name;
use x509_cert::time::Time;

/// id-at-commonName
const CN: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.3");
/// id-at-countryName
const C: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.6");
/// id-at-localityName
const L: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.7");
/// id-at-stateOrProvinceName
const ST: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.8");
/// id-at-organizationName
const O: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.10");
/// id-at-organizationalUnitName
const OU: ObjectIdentifier = ObjectIdentifier::new_unwrap("2.5.4.11");

/// Compute MD5, SHA-1 and SHA-256 over the certificate's DER encoding.
pub fn fingerprints(cert: &Certificate) -> Result<Fingerprints> {
    let der = cert.to_der()?;
    Ok(fingerprints_of_der(&der))
}

/// Digests of an already-encoded certificate.
pub fn fingerprints_of_der(der: &[u8]) -> Fingerprints {
    Fingerprints {
        md5: hex::encode(Md5::digest(der)),
        sha1: hex::encode(Sha1::digest(der)),
        sha256: hex::encode(Sha256::digest(der)),
    }
}

/// Build the signing identity of `cert`, judging expiry against `now`.
pub fn identity_from_certificate(
    cert: &Certificate,
    scheme: SignatureScheme,
    now: DateTime<Utc>,
) -> Result<SigningIdentity> {
    Ok(SigningIdentity {
        scheme_version: scheme,
        fingerprints: fingerprints(cert)?,
        certificate: certificate_details(cert, now),
        signing_block_present: false,
    })
}

/// Normalize certificate metadata.
pub fn certificate_details(cert: &Certificate, now: DateTime<Utc>) -> CertificateDetails {
    let tbs = &cert.tbs_certificate;
    let subject = &tbs.subject;
    let issuer = &tbs.issuer;

    CertificateDetails {
        subject: SubjectInfo {
            common_name: name_attribute(subject, &CN),
            organization: name_attribute(subject, &O),
            organizational_unit: name_attribute(subject, &OU),
            locality: name_attribute(subject, &L),
            state: name_attribute(subject, &ST),
            country: name_attribute(subject, &C),
        },
        issuer: IssuerInfo {
            common_name: name_attribute(issuer, &CN),
            organization: name_attribute(issuer, &O),
        },
        serial_number: serial_hex(tbs.serial_number.as_bytes()),
        valid_from: format_timestamp(not_before(cert)),
        valid_to: format_timestamp(not_after(cert)),
        is_expired: now > not_after(cert),
        signature_algorithm: signature_algorithm_name(cert),
    }
}

/// Start of the validity window as a UTC instant
pub fn not_before(cert: &Certificate) -> DateTime<Utc> {
    to_datetime(&cert.tbs_certificate.validity.not_before)
}

/// End of the validity window as a UTC instant
pub fn not_after(cert: &Certificate) -> DateTime<Utc> {
    to_datetime(&cert.tbs_certificate.validity.not_after)
}

fn to_datetime(time: &Time) -> DateTime<Utc> {
    DateTime::<Utc>::from(time.to_system_time())
}

/// ISO-8601 rendering without zone suffix, as stored on the certificate.
pub fn format_timestamp(time: DateTime<Utc>) -> String {
    time.naive_utc().format("%Y-%m-%dT%H:%M:%S").to_string()
}

/// First value of `oid` in `name`, or `"N/A"`.
pub fn name_attribute(name: &Name, oid: &ObjectIdentifier) -> String {
    name.0
        .iter()
        .flat_map(|rdn| rdn.0.iter())
        .find(|atv| atv.oid == *oid)
        .and_then(|atv| decode_directory_string(u8::from(atv.value.tag()), atv.value.value()))
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

// Universal tag numbers of the DirectoryString choices
const UTF8_STRING: u8 = 0x0c;
const PRINTABLE_STRING: u8 = 0x13;
const TELETEX_STRING: u8 = 0x14;
const IA5_STRING: u8 = 0x16;
const VISIBLE_STRING: u8 = 0x1a;
const UNIVERSAL_STRING: u8 = 0x1c;
const BMP_STRING: u8 = 0x1e;

fn decode_directory_string(tag: u8, bytes: &[u8]) -> Option<String> {
    match tag {
        UTF8_STRING | PRINTABLE_STRING | IA5_STRING | VISIBLE_STRING => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
        // T61 in practice carries Latin-1
        TELETEX_STRING => Some(bytes.iter().copied().map(char::from).collect()),
        BMP_STRING => {
            let units: Vec<u16> = bytes
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            Some(String::from_utf16_lossy(&units))
        }
        UNIVERSAL_STRING => Some(
            bytes
                .chunks_exact(4)
                .map(|quad| {
                    char::from_u32(u32::from_be_bytes([quad[0], quad[1], quad[2], quad[3]]))
                        .unwrap_or(char::REPLACEMENT_CHARACTER)
                })
                .collect(),
        ),
        _ => None,
    }
}

/// Lowercase hex of a DER INTEGER without leading zeros.
///
/// `bytes` is the two's-complement content; negative values render as `-`
/// followed by the magnitude.
pub fn serial_hex(bytes: &[u8]) -> String {
    match bytes.first() {
        Some(first) if first & 0x80 != 0 => format!("-{}", trimmed_hex(&negate(bytes))),
        _ => trimmed_hex(bytes),
    }
}

fn trimmed_hex(bytes: &[u8]) -> String {
    let digits = hex::encode(bytes);
    let trimmed = digits.trim_start_matches('0');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Magnitude of a negative two's-complement integer: invert, then add one.
fn negate(bytes: &[u8]) -> Vec<u8> {
    let mut magnitude: Vec<u8> = bytes.iter().map(|b| !b).collect();
    for byte in magnitude.iter_mut().rev() {
        let (sum, carry) = byte.overflowing_add(1);
        *byte = sum;
        if !carry {
            break;
        }
    }
    magnitude
}

/// Display name of the certificate's signature algorithm.
pub fn signature_algorithm_name(cert: &Certificate) -> String {
    oid_to_signature_algorithm(&cert.signature_algorithm.oid)
}

/// Convert a signature algorithm OID to its conventional name
fn oid_to_signature_algorithm(oid: &ObjectIdentifier) -> String {
    match oid.to_string().as_str() {
        "1.2.840.113549.1.1.2" => "md2WithRSAEncryption".to_string(),
        "1.2.840.113549.1.1.4" => "md5WithRSAEncryption".to_string(),
        "1.2.840.113549.1.1.5" => "sha1WithRSAEncryption".to_string(),
        "1.2.840.113549.1.1.10" => "RSASSA-PSS".to_string(),
        "1.2.840.113549.1.1.11" => "sha256WithRSAEncryption".to_string(),
        "1.2.840.113549.1.1.12" => "sha384WithRSAEncryption".to_string(),
        "1.2.840.113549.1.1.13" => "sha512WithRSAEncryption".to_string(),
        "1.2.840.113549.1.1.14" => "sha224WithRSAEncryption".to_string(),
        "1.2.840.10040.4.3" => "dsa-with-sha1".to_string(),
        "2.16.840.1.101.3.4.3.1" => "dsa-with-sha224".to_string(),
        "2.16.840.1.101.3.4.3.2" => "dsa-with-sha256".to_string(),
        "1.2.840.10045.4.1" => "ecdsa-with-SHA1".to_string(),
        "1.2.840.10045.4.3.1" => "ecdsa-with-SHA224".to_string(),
        "1.2.840.10045.4.3.2" => "ecdsa-with-SHA256".to_string(),
        "1.2.840.10045.4.3.3" => "ecdsa-with-SHA384".to_string(),
        "1.2.840.10045.4.3.4" => "ecdsa-with-SHA512".to_string(),
        "1.3.101.112" => "ed25519".to_string(),
        "1.3.101.113" => "ed448".to_string(),
        _ => oid.to_string(),
    }
}
