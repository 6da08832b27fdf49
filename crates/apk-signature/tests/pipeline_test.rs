//! End-to-end tests over packages written to disk.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use apk_signature::signing_block::SIGNING_BLOCK_MAGIC;
use apk_signature::{ApkParser, ApkSignatureError, SignatureScheme, compare_signatures, parse_apk};
use chrono::{TimeZone, Utc};
use pretty_assertions::assert_eq;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use zip::write::SimpleFileOptions;

const SIGNER_DER: &[u8] = include_bytes!("fixtures/signer.der");
const CERT_RSA: &[u8] = include_bytes!("fixtures/CERT.RSA");
const OTHER_RSA: &[u8] = include_bytes!("fixtures/OTHER.RSA");
const CERT_EC: &[u8] = include_bytes!("fixtures/CERT.EC");
const EXPIRED_DER: &[u8] = include_bytes!("fixtures/expired.der");
const NEGATIVE_SERIAL_DER: &[u8] = include_bytes!("fixtures/negative_serial.der");

const SIGNER_SHA256: &str = "a6e2efbebbed8b9880c08bb5dc14f59fdf463ef28415aee5d6708645f39ed7bc";
const OTHER_SHA256: &str = "ecfa3213ffac4c1a9bcddec6935732483b8f9423ed0e6ab85e74b022c516521f";

/// Write a package with the given entries, optionally ending in the
/// signing block magic.
fn write_apk(dir: &TempDir, name: &str, entries: &[(&str, &[u8])], signing_block: bool) -> PathBuf {
    let path = dir.path().join(name);
    let file = std::fs::File::create(&path).expect("Failed to create package file");
    let mut writer = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

    writer
        .start_file("AndroidManifest.xml", options)
        .expect("Failed to start manifest entry");
    writer.write_all(b"<manifest/>").unwrap();
    for (entry, data) in entries {
        writer
            .start_file(*entry, options)
            .expect("Failed to start entry");
        writer.write_all(data).unwrap();
    }
    if signing_block {
        let magic = std::str::from_utf8(SIGNING_BLOCK_MAGIC).unwrap();
        writer.set_comment(magic);
    }
    writer.finish().expect("Failed to finish package");
    path
}

fn signed_apk(dir: &TempDir, name: &str, signer: &[u8]) -> PathBuf {
    write_apk(
        dir,
        name,
        &[
            ("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\r\n"),
            ("META-INF/CERT.SF", b"Signature-Version: 1.0\r\n"),
            ("META-INF/CERT.RSA", signer),
        ],
        false,
    )
}

fn assert_kind(path: &Path, expected: &str) {
    let err = parse_apk(path).expect_err("parse should fail");
    assert_eq!(err.kind(), expected, "unexpected error: {err}");
    assert!(err.to_string().contains(&path.display().to_string()));
}

#[test]
fn test_parse_v1_signed_package() {
    let dir = TempDir::new().unwrap();
    let apk = signed_apk(&dir, "app.apk", CERT_RSA);

    let mut parser = ApkParser::new(&apk);
    let identity = parser.parse().unwrap();

    assert_eq!(identity.scheme_version, SignatureScheme::LegacyJar);
    assert_eq!(identity.fingerprints.sha256, SIGNER_SHA256);
    assert_eq!(identity.fingerprints.md5, "1fbbc40f2ef1e6d8b6707251eb2f5a3d");
    assert_eq!(identity.certificate.subject.common_name, "Test Signer");
    assert_eq!(identity.certificate.serial_number, "5eed1234abcd");
    assert!(!identity.signing_block_present);
    assert_eq!(parser.certificates().len(), 1);

    let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    assert!(parser.verify_at(now).is_valid);
}

#[test]
fn test_parse_is_repeatable() {
    let dir = TempDir::new().unwrap();
    let apk = signed_apk(&dir, "app.apk", CERT_RSA);

    let mut parser = ApkParser::new(&apk);
    let now = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    let first = parser.parse_at(now).unwrap();
    let second = parser.parse_at(now).unwrap();
    assert_eq!(first, second);
    assert_eq!(parser.certificates().len(), 1);
}

#[test]
fn test_bare_certificate_signer_file() {
    let dir = TempDir::new().unwrap();
    let apk = write_apk(&dir, "bare.apk", &[("META-INF/KEY.DSA", SIGNER_DER)], false);
    assert_eq!(parse_apk(&apk).unwrap().fingerprints.sha256, SIGNER_SHA256);
}

#[test]
fn test_ec_signer_file() {
    let dir = TempDir::new().unwrap();
    let apk = write_apk(&dir, "ec.apk", &[("META-INF/CERT.EC", CERT_EC)], false);
    let identity = parse_apk(&apk).unwrap();
    assert_eq!(identity.certificate.signature_algorithm, "ecdsa-with-SHA256");
    assert_eq!(identity.certificate.subject.common_name, "EC Signer");
}

#[test]
fn test_negative_serial_is_signed_hex() {
    let dir = TempDir::new().unwrap();
    let apk = write_apk(&dir, "legacy.apk", &[("META-INF/OLD.RSA", NEGATIVE_SERIAL_DER)], false);

    let identity = parse_apk(&apk).unwrap();
    assert_eq!(identity.certificate.serial_number, "-5");
    assert_eq!(identity.certificate.subject.common_name, "Negative Serial");
}

#[test]
fn test_expired_signer_is_reported() {
    let dir = TempDir::new().unwrap();
    let apk = write_apk(&dir, "old.apk", &[("META-INF/OLD.RSA", EXPIRED_DER)], false);

    let mut parser = ApkParser::new(&apk);
    let identity = parser.parse().unwrap();
    assert!(identity.certificate.is_expired);

    let verification = parser.verify();
    assert!(!verification.is_valid);
    assert!(verification.message.contains("2010-01-01T00:00:00"));
}

#[test]
fn test_first_signer_file_in_archive_order_wins() {
    let dir = TempDir::new().unwrap();
    let apk = write_apk(
        &dir,
        "two-signers.apk",
        &[("META-INF/ZED.RSA", OTHER_RSA), ("META-INF/ALPHA.RSA", CERT_RSA)],
        false,
    );
    assert_eq!(parse_apk(&apk).unwrap().fingerprints.sha256, OTHER_SHA256);
}

#[test]
fn test_signing_block_annotation() {
    let dir = TempDir::new().unwrap();
    let apk = write_apk(&dir, "v1v2.apk", &[("META-INF/CERT.RSA", CERT_RSA)], true);

    let identity = parse_apk(&apk).unwrap();
    assert!(identity.signing_block_present);
    assert_eq!(identity.fingerprints.sha256, SIGNER_SHA256);
}

#[test]
fn test_unsigned_package() {
    let dir = TempDir::new().unwrap();
    let apk = write_apk(
        &dir,
        "unsigned.apk",
        &[("META-INF/MANIFEST.MF", b"Manifest-Version: 1.0\r\n")],
        false,
    );
    assert_kind(&apk, "no-signature-found");
}

#[test]
fn test_signing_block_only_package_has_no_identity() {
    let dir = TempDir::new().unwrap();
    let apk = write_apk(&dir, "v2only.apk", &[("classes.dex", b"dex\n035\0")], true);
    assert_kind(&apk, "no-signature-found");
}

#[test]
fn test_undecodable_signer_file() {
    let dir = TempDir::new().unwrap();
    let apk = write_apk(
        &dir,
        "broken.apk",
        &[("META-INF/CERT.RSA", b"not a pkcs7 envelope")],
        false,
    );
    assert_kind(&apk, "decode-failure");

    match parse_apk(&apk) {
        Err(ApkSignatureError::DecodeFailure { entry, .. }) => {
            assert_eq!(entry, "META-INF/CERT.RSA");
        }
        other => panic!("expected decode failure, got {other:?}"),
    }
}

#[test]
fn test_not_an_archive() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fake.apk");
    std::fs::write(&path, b"this is not a zip file at all").unwrap();
    assert_kind(&path, "invalid-container");
}

#[test]
fn test_missing_file() {
    let dir = TempDir::new().unwrap();
    assert_kind(&dir.path().join("missing.apk"), "io");
}

#[test]
fn test_compare_same_package() {
    let dir = TempDir::new().unwrap();
    let apk = signed_apk(&dir, "app.apk", CERT_RSA);

    let result = compare_signatures(&apk, &apk).unwrap();
    assert!(result.identical());
    assert_eq!(result.fingerprints1(), result.fingerprints2());
    assert_eq!(result.apk1(), apk.display().to_string());
}

#[test]
fn test_compare_same_signer_different_packages() {
    let dir = TempDir::new().unwrap();
    let a = signed_apk(&dir, "a.apk", CERT_RSA);
    let b = write_apk(&dir, "b.apk", &[("META-INF/KEY.DSA", SIGNER_DER)], true);
    assert!(compare_signatures(&a, &b).unwrap().identical());
}

#[test]
fn test_compare_bit_flipped_signer() {
    let dir = TempDir::new().unwrap();
    let original = signed_apk(&dir, "original.apk", CERT_RSA);

    // Flip one bit in the last byte of the embedded certificate, which lies
    // inside its signature value, so the certificate still decodes.
    let cert_offset = CERT_RSA
        .windows(SIGNER_DER.len())
        .position(|w| w == SIGNER_DER)
        .expect("signer certificate should be embedded in the envelope");
    let mut tampered = CERT_RSA.to_vec();
    tampered[cert_offset + SIGNER_DER.len() - 1] ^= 0x01;
    let tampered_apk = signed_apk(&dir, "tampered.apk", &tampered);

    let result = compare_signatures(&original, &tampered_apk).unwrap();
    assert!(!result.identical());
    assert_ne!(result.fingerprints1().sha256, result.fingerprints2().sha256);
}

#[test]
fn test_compare_different_signers() {
    let dir = TempDir::new().unwrap();
    let a = signed_apk(&dir, "a.apk", CERT_RSA);
    let b = signed_apk(&dir, "b.apk", OTHER_RSA);

    let result = compare_signatures(&a, &b).unwrap();
    assert!(!result.identical());
    assert_eq!(result.fingerprints2().sha256, OTHER_SHA256);
}

#[test]
fn test_compare_propagates_failure() {
    let dir = TempDir::new().unwrap();
    let a = signed_apk(&dir, "a.apk", CERT_RSA);
    let unsigned = write_apk(&dir, "unsigned.apk", &[], false);

    let err = compare_signatures(&a, &unsigned).expect_err("comparison should fail");
    assert!(matches!(err, ApkSignatureError::NoSignatureFound { .. }));

    let err = compare_signatures(&unsigned, &a).expect_err("comparison should fail");
    assert!(matches!(err, ApkSignatureError::NoSignatureFound { .. }));
}
