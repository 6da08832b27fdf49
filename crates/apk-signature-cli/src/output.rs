//! Output formatting for signature reports
//!
//! Renders [`SigningIdentity`], [`ComparisonResult`] and [`Verification`]
//! values as text, JSON or a bare digest. Colors are applied only to labels
//! and verdicts, never to JSON or simple output.

use apk_signature::types::NOT_AVAILABLE;
use apk_signature::{ComparisonResult, Fingerprints, HashKind, SigningIdentity, Verification};
use owo_colors::OwoColorize;

/// Style configuration for output formatting
#[derive(Debug, Clone, Copy)]
pub struct OutputStyle {
    /// Whether to use colors in output
    pub use_color: bool,
}

impl Default for OutputStyle {
    fn default() -> Self {
        Self {
            use_color: std::env::var_os("NO_COLOR").is_none(),
        }
    }
}

impl OutputStyle {
    /// Create a new output style
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colors in output
    #[must_use]
    pub const fn no_color(mut self) -> Self {
        self.use_color = false;
        self
    }
}

/// Rendering of a hex fingerprint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FingerprintStyle {
    /// `AB:CD:EF`
    ColonUpper,
    /// `ab:cd:ef`
    ColonLower,
    /// `ABCDEF`
    Upper,
    /// `abcdef`
    Lower,
}

/// Render a hex fingerprint in the given style
pub fn format_fingerprint(fingerprint: &str, style: FingerprintStyle) -> String {
    match style {
        FingerprintStyle::ColonUpper => colon_separated(&fingerprint.to_uppercase()),
        FingerprintStyle::ColonLower => colon_separated(&fingerprint.to_lowercase()),
        FingerprintStyle::Upper => fingerprint.to_uppercase(),
        FingerprintStyle::Lower => fingerprint.to_lowercase(),
    }
}

fn colon_separated(hex: &str) -> String {
    hex.as_bytes()
        .chunks(2)
        .map(String::from_utf8_lossy)
        .collect::<Vec<_>>()
        .join(":")
}

fn paint(text: &str, style: &OutputStyle, colorize: impl FnOnce(&str) -> String) -> String {
    if style.use_color {
        colorize(text)
    } else {
        text.to_string()
    }
}

/// `=== ... ===` section banner of the text and comparison reports
pub fn format_header(text: &str, style: &OutputStyle) -> String {
    paint(text, style, |t| t.bold().bright_blue().to_string())
}

/// Passing verdicts: matching digests, valid certificates
pub fn format_success(text: &str, style: &OutputStyle) -> String {
    paint(text, style, |t| t.green().to_string())
}

/// Flags worth attention that do not fail the run, such as an expired signer
pub fn format_warning(text: &str, style: &OutputStyle) -> String {
    paint(text, style, |t| t.yellow().to_string())
}

/// Failing verdicts and the `error: ...` line on stderr
pub fn format_error(text: &str, style: &OutputStyle) -> String {
    paint(text, style, |t| t.red().to_string())
}

/// `Label: value` report line; only the label is colored
pub fn format_key_value(key: &str, value: &str, style: &OutputStyle) -> String {
    format!("{}: {value}", paint(key, style, |k| k.cyan().to_string()))
}

const fn digest_label(kind: HashKind) -> &'static str {
    match kind {
        HashKind::Md5 => "MD5",
        HashKind::Sha1 => "SHA1",
        HashKind::Sha256 => "SHA256",
    }
}

/// `MD5:    value` with the value column aligned across digests
fn digest_line(kind: HashKind, value: &str, style: &OutputStyle) -> String {
    let label = format!("{}:", digest_label(kind));
    let padding = " ".repeat(8usize.saturating_sub(label.len()));
    if style.use_color {
        format!("{}{padding}{value}", label.cyan())
    } else {
        format!("{label}{padding}{value}")
    }
}

fn match_mark(matched: bool, yes: &str, no: &str, style: &OutputStyle) -> String {
    if matched {
        format_success(&format!("✓ {yes}"), style)
    } else {
        format_error(&format!("✗ {no}"), style)
    }
}

/// Text report of a signing identity.
///
/// Fingerprints are listed three times: colon-separated uppercase, uppercase
/// and lowercase. With `verbose`, certificate details follow; subject and
/// issuer attributes equal to `N/A` are omitted.
pub fn format_text(identity: &SigningIdentity, verbose: bool, style: &OutputStyle) -> String {
    let mut lines = vec![format_key_value(
        "Signature scheme",
        identity.scheme_version.as_str(),
        style,
    )];
    if identity.signing_block_present {
        lines.push(format_key_value("APK Signing Block", "v2/v3", style));
    }

    let sections = [
        ("colon-separated, uppercase", FingerprintStyle::ColonUpper),
        ("uppercase", FingerprintStyle::Upper),
        ("lowercase", FingerprintStyle::Lower),
    ];
    for (title, fp_style) in sections {
        lines.push(String::new());
        lines.push(format_header(
            &format!("=== Signature fingerprints ({title}) ==="),
            style,
        ));
        for kind in HashKind::ALL {
            let value = format_fingerprint(identity.fingerprints.get(kind), fp_style);
            lines.push(digest_line(kind, &value, style));
        }
    }

    if verbose {
        let cert = &identity.certificate;
        lines.push(String::new());
        lines.push(format_header("=== Certificate details ===", style));

        lines.push("Subject:".to_string());
        for (key, value) in cert.subject.attributes() {
            if value != NOT_AVAILABLE {
                lines.push(format!("  {}", format_key_value(key, value, style)));
            }
        }
        lines.push("Issuer:".to_string());
        for (key, value) in cert.issuer.attributes() {
            if value != NOT_AVAILABLE {
                lines.push(format!("  {}", format_key_value(key, value, style)));
            }
        }

        lines.push(format_key_value("Serial number", &cert.serial_number, style));
        lines.push(format_key_value("Valid from", &cert.valid_from, style));
        lines.push(format_key_value("Valid to", &cert.valid_to, style));
        let expired = if cert.is_expired {
            format_warning("yes", style)
        } else {
            "no".to_string()
        };
        lines.push(format_key_value("Expired", &expired, style));
        lines.push(format_key_value(
            "Signature algorithm",
            &cert.signature_algorithm,
            style,
        ));
    }

    lines.join("\n")
}

/// Pretty-printed JSON document of a signing identity
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn format_json(identity: &SigningIdentity) -> serde_json::Result<String> {
    serde_json::to_string_pretty(identity)
}

/// The requested digest alone, lowercase
pub fn format_simple(identity: &SigningIdentity, kind: HashKind) -> String {
    identity.fingerprints.get(kind).to_string()
}

/// One-line verdict of a certificate check
pub fn format_verification(verification: &Verification, style: &OutputStyle) -> String {
    let verdict = if verification.is_valid {
        format_success(&format!("✓ {}", verification.message), style)
    } else {
        format_error(&format!("✗ {}", verification.message), style)
    };
    format!("Signature verification: {verdict}")
}

fn push_fingerprints(lines: &mut Vec<String>, title: &str, fingerprints: &Fingerprints) {
    lines.push(format!("{title}:"));
    for kind in HashKind::ALL {
        let label = format!("{}:", digest_label(kind));
        lines.push(format!("  {label:<8}{}", fingerprints.get(kind)));
    }
}

/// Text report of a signer comparison
pub fn format_comparison(result: &ComparisonResult, style: &OutputStyle) -> String {
    let mut lines = vec![
        format_header("=== APK signature comparison ===", style),
        format_key_value("APK 1", result.apk1(), style),
        format_key_value("APK 2", result.apk2(), style),
        String::new(),
        format!(
            "Same signer: {}",
            match_mark(result.identical(), "yes", "no", style)
        ),
        String::new(),
        "Fingerprint comparison:".to_string(),
    ];
    for kind in HashKind::ALL {
        let mark = match_mark(result.matches(kind), "match", "differ", style);
        lines.push(format!("  {}", digest_line(kind, &mark, &style.no_color())));
    }

    lines.push(String::new());
    push_fingerprints(&mut lines, "APK 1 fingerprints", result.fingerprints1());
    lines.push(String::new());
    push_fingerprints(&mut lines, "APK 2 fingerprints", result.fingerprints2());

    lines.join("\n")
}
