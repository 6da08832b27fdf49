//! Error types for the command-line front end.

use apk_signature::ApkSignatureError;
use std::path::PathBuf;
use thiserror::Error;

/// Invalid combinations of command-line options.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `--compare` given together with a positional package
    #[error("--compare cannot be combined with a positional APK ({path})")]
    CompareWithApk {
        /// The positional package path
        path: PathBuf,
    },

    /// `--compare` given together with `--verify`
    #[error("--verify cannot be combined with --compare")]
    CompareWithVerify,
}

/// Errors that end a command run.
#[derive(Debug, Error)]
pub enum CliError {
    /// An input package does not exist
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path as given on the command line
        path: PathBuf,
    },

    /// Rejected option combination
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Signature extraction failed
    #[error(transparent)]
    Signature(#[from] ApkSignatureError),

    /// The JSON report could not be produced
    #[error("failed to serialize report: {0}")]
    Json(#[from] serde_json::Error),
}
