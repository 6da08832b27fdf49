//! Error types for signature extraction.
//!
//! All errors use thiserror. Variants that concern an input file carry its
//! path so callers can report which package failed.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by the extraction pipeline.
#[derive(Debug, Error)]
pub enum ApkSignatureError {
    /// The input is not a readable ZIP archive
    #[error("invalid APK file: {path}: {source}")]
    InvalidContainer {
        /// Path of the offending package
        path: PathBuf,
        /// Underlying archive error
        #[source]
        source: zip::result::ZipError,
    },

    /// Neither a legacy signer entry nor a usable signing block was found
    #[error("no signature found in {path}")]
    NoSignatureFound {
        /// Path of the package
        path: PathBuf,
    },

    /// A signer entry was located but no certificate could be decoded from it
    #[error("failed to decode signer certificate from {entry} in {path}")]
    DecodeFailure {
        /// Path of the package
        path: PathBuf,
        /// Archive entry that failed to decode
        entry: String,
    },

    /// The package could not be opened or read
    #[error("failed to read {path}: {source}")]
    Io {
        /// Path of the package
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A decoded certificate could not be re-encoded as DER
    #[error("certificate encoding error: {0}")]
    Encoding(#[from] der::Error),
}

impl ApkSignatureError {
    /// Short machine-readable name of the error kind.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::InvalidContainer { .. } => "invalid-container",
            Self::NoSignatureFound { .. } => "no-signature-found",
            Self::DecodeFailure { .. } => "decode-failure",
            Self::Io { .. } => "io",
            Self::Encoding(_) => "encoding",
        }
    }
}

/// Result type alias for signature operations
pub type Result<T> = std::result::Result<T, ApkSignatureError>;
