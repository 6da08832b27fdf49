//! Command-line configuration.
//!
//! Options come from CLI arguments with environment fallbacks:
//! - `APK_SIGNATURE_FORMAT`: default output format
//! - `APK_SIGNATURE_LOG_LEVEL`: default log level (`RUST_LOG` still wins)
//! - `NO_COLOR`: disables colored output, see [`crate::output::OutputStyle`]
//!
//! # Example
//!
//! ```no_run
//! use apk_signature_cli::CliConfig;
//!
//! let config = CliConfig::from_args();
//! config.validate().expect("Invalid configuration");
//! ```

use crate::error::ConfigError;
use apk_signature::HashKind;
use clap::{Parser, ValueEnum};
use std::path::{Path, PathBuf};
use tracing::Level;

/// Output format of the single-package report
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report
    Text,
    /// Pretty-printed JSON document
    Json,
    /// A single bare fingerprint
    Simple,
}

/// Digest selectable with `--only`
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HashArg {
    /// MD5
    Md5,
    /// SHA-1
    Sha1,
    /// SHA-256
    Sha256,
}

impl From<HashArg> for HashKind {
    fn from(arg: HashArg) -> Self {
        match arg {
            HashArg::Md5 => Self::Md5,
            HashArg::Sha1 => Self::Sha1,
            HashArg::Sha256 => Self::Sha256,
        }
    }
}

/// Log verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// Everything, including per-offset scan results
    Trace,
    /// Pipeline decisions
    Debug,
    /// Progress messages
    Info,
    /// Only warnings and errors
    Warn,
    /// Only errors
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}

/// What a run should do, derived from the parsed options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action<'a> {
    /// Report on one package
    Inspect(&'a Path),
    /// Compare the signers of two packages
    Compare(&'a Path, &'a Path),
    /// Nothing to do; print usage
    Help,
}

/// How the single-package report is rendered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    /// Human-readable report
    Text,
    /// JSON document
    Json,
    /// One bare digest
    Simple(HashKind),
}

/// Command-line configuration
#[derive(Debug, Clone, Parser)]
#[command(
    name = "apk-signature",
    about = "Extract and compare signing certificate fingerprints of Android packages",
    version,
    after_help = "Examples:\n  \
        apk-signature app.apk                      Show signer fingerprints\n  \
        apk-signature app.apk --verbose            Include certificate details\n  \
        apk-signature app.apk --format json        JSON output\n  \
        apk-signature app.apk --only sha256        Print only the SHA-256 digest\n  \
        apk-signature app.apk --verify             Check the certificate validity\n  \
        apk-signature --compare a.apk b.apk        Compare two signers"
)]
pub struct CliConfig {
    /// APK file to inspect
    #[arg(value_name = "APK")]
    pub apk: Option<PathBuf>,

    /// Show certificate details
    #[arg(long)]
    pub verbose: bool,

    /// Output format
    #[arg(
        long,
        value_enum,
        env = "APK_SIGNATURE_FORMAT",
        default_value = "text"
    )]
    pub format: OutputFormat,

    /// Print only the given fingerprint
    #[arg(long, value_enum)]
    pub only: Option<HashArg>,

    /// Compare the signers of two APK files (exit code 0 when identical)
    #[arg(long, num_args = 2, value_names = ["APK1", "APK2"])]
    pub compare: Option<Vec<PathBuf>>,

    /// Check the signer certificate's validity before the report
    #[arg(long)]
    pub verify: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Log level
    #[arg(
        long,
        value_enum,
        env = "APK_SIGNATURE_LOG_LEVEL",
        default_value = "warn"
    )]
    pub log_level: LogLevel,
}

impl CliConfig {
    /// Parse configuration from command-line arguments.
    #[must_use]
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Validate option combinations.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if `--compare` is combined with a positional
    /// package or with `--verify`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.compare.is_some() {
            if let Some(path) = &self.apk {
                return Err(ConfigError::CompareWithApk { path: path.clone() });
            }
            if self.verify {
                return Err(ConfigError::CompareWithVerify);
            }
        }
        Ok(())
    }

    /// Resolve what this run should do.
    #[must_use]
    pub fn action(&self) -> Action<'_> {
        match (self.compare.as_deref(), self.apk.as_deref()) {
            (Some([first, second]), _) => Action::Compare(first, second),
            (_, Some(apk)) => Action::Inspect(apk),
            _ => Action::Help,
        }
    }

    /// Resolve the report rendering; JSON wins over `--only`.
    #[must_use]
    pub fn report_format(&self) -> ReportFormat {
        match (self.format, self.only) {
            (OutputFormat::Json, _) => ReportFormat::Json,
            (_, Some(only)) => ReportFormat::Simple(only.into()),
            (OutputFormat::Simple, None) => ReportFormat::Simple(HashKind::Md5),
            (OutputFormat::Text, None) => ReportFormat::Text,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn parse(args: &[&str]) -> CliConfig {
        CliConfig::try_parse_from(std::iter::once("apk-signature").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_command_definition() {
        CliConfig::command().debug_assert();
    }

    #[test]
    fn test_inspect_defaults() {
        let config = parse(&["app.apk"]);
        assert_eq!(config.action(), Action::Inspect(Path::new("app.apk")));
        assert_eq!(config.report_format(), ReportFormat::Text);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_only_implies_simple() {
        let config = parse(&["app.apk", "--only", "sha256"]);
        assert_eq!(
            config.report_format(),
            ReportFormat::Simple(HashKind::Sha256)
        );
    }

    #[test]
    fn test_simple_defaults_to_md5() {
        let config = parse(&["app.apk", "--format", "simple"]);
        assert_eq!(config.report_format(), ReportFormat::Simple(HashKind::Md5));
    }

    #[test]
    fn test_json_wins_over_only() {
        let config = parse(&["app.apk", "--format", "json", "--only", "sha1"]);
        assert_eq!(config.report_format(), ReportFormat::Json);
    }

    #[test]
    fn test_compare_action() {
        let config = parse(&["--compare", "a.apk", "b.apk"]);
        assert_eq!(
            config.action(),
            Action::Compare(Path::new("a.apk"), Path::new("b.apk"))
        );
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_compare_requires_two_paths() {
        let result = CliConfig::try_parse_from(["apk-signature", "--compare", "a.apk"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_compare_with_positional_is_rejected() {
        let config = parse(&["app.apk", "--compare", "a.apk", "b.apk"]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CompareWithApk { .. })
        ));
    }

    #[test]
    fn test_compare_with_verify_is_rejected() {
        let config = parse(&["--verify", "--compare", "a.apk", "b.apk"]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::CompareWithVerify)
        ));
    }

    #[test]
    fn test_no_input_is_help() {
        assert_eq!(parse(&[]).action(), Action::Help);
    }

    #[test]
    fn test_log_level_mapping() {
        assert_eq!(Level::from(LogLevel::Warn), Level::WARN);
        assert_eq!(Level::from(LogLevel::Trace), Level::TRACE);
    }
}
