//! Command handlers
//!
//! Each handler produces a [`Report`]: the text to print on stdout and
//! whether the run counts as a success for the process exit code.

use crate::config::{CliConfig, ReportFormat};
use crate::error::CliError;
use crate::output::{
    OutputStyle, format_comparison, format_json, format_simple, format_text, format_verification,
};
use apk_signature::{ApkParser, compare_signatures};
use std::path::Path;
use tracing::debug;

/// Rendered result of one command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    /// Text for stdout
    pub output: String,
    /// Whether the process should exit with status 0
    pub success: bool,
}

fn ensure_exists(path: &Path) -> Result<(), CliError> {
    if path.exists() {
        Ok(())
    } else {
        Err(CliError::FileNotFound {
            path: path.to_path_buf(),
        })
    }
}

/// Report on the signer of one package.
///
/// With `--verify` the verdict line comes first, followed by a blank line.
/// The verdict never changes the exit status.
///
/// # Errors
///
/// Returns `CliError` if the file is missing, extraction fails or the JSON
/// report cannot be produced.
pub fn inspect(path: &Path, config: &CliConfig, style: &OutputStyle) -> Result<Report, CliError> {
    ensure_exists(path)?;

    let mut parser = ApkParser::new(path);
    let identity = parser.parse()?;

    let mut output = String::new();
    if config.verify {
        let verification = parser.verify();
        debug!("Verification of {}: {:?}", path.display(), verification);
        output.push_str(&format_verification(&verification, style));
        output.push_str("\n\n");
    }

    let report = match config.report_format() {
        ReportFormat::Text => format_text(&identity, config.verbose, style),
        ReportFormat::Json => format_json(&identity)?,
        ReportFormat::Simple(kind) => format_simple(&identity, kind),
    };
    output.push_str(&report);

    Ok(Report {
        output,
        success: true,
    })
}

/// Compare the signers of two packages; succeeds only when identical.
///
/// # Errors
///
/// Returns `CliError` if either file is missing or either extraction fails.
pub fn compare(first: &Path, second: &Path, style: &OutputStyle) -> Result<Report, CliError> {
    ensure_exists(first)?;
    ensure_exists(second)?;

    let result = compare_signatures(first, second)?;
    Ok(Report {
        output: format_comparison(&result, style),
        success: result.identical(),
    })
}
