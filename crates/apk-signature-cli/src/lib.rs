//! Command-line front end for `apk-signature`
//!
//! The binary is a thin wrapper: [`CliConfig`] holds the parsed options,
//! [`run`] dispatches them to the [`commands`] handlers and the handlers
//! render through [`output`].

pub mod commands;
pub mod config;
pub mod error;
pub mod output;

pub use commands::Report;
pub use config::{Action, CliConfig, HashArg, LogLevel, OutputFormat, ReportFormat};
pub use error::{CliError, ConfigError};
pub use output::{FingerprintStyle, OutputStyle, format_fingerprint};

/// Execute a validated configuration.
///
/// Returns `None` when there is nothing to do and usage should be shown.
///
/// # Errors
///
/// Returns `CliError` for invalid option combinations, missing files and
/// extraction failures.
pub fn run(config: &CliConfig, style: &OutputStyle) -> Result<Option<Report>, CliError> {
    config.validate()?;

    match config.action() {
        Action::Inspect(path) => commands::inspect(path, config, style).map(Some),
        Action::Compare(first, second) => commands::compare(first, second, style).map(Some),
        Action::Help => Ok(None),
    }
}
