use apk_signature_cli::output::format_error;
use apk_signature_cli::{CliConfig, OutputStyle, run};
use clap::CommandFactory;
use std::process::ExitCode;
use tracing::Level;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

fn init_tracing(config: &CliConfig) {
    // RUST_LOG overrides --log-level
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::default().add_directive(LevelFilter::from(Level::from(config.log_level)).into())
    });

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn execute(config: &CliConfig, style: &OutputStyle) -> anyhow::Result<ExitCode> {
    let Some(report) = run(config, style)? else {
        CliConfig::command().print_help()?;
        return Ok(ExitCode::FAILURE);
    };

    println!("{}", report.output);
    Ok(if report.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn main() -> ExitCode {
    let config = CliConfig::from_args();
    init_tracing(&config);

    let style = if config.no_color {
        OutputStyle::new().no_color()
    } else {
        OutputStyle::new()
    };

    match execute(&config, &style) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", format_error(&format!("error: {e}"), &style));
            ExitCode::FAILURE
        }
    }
}
