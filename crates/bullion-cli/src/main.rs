mod cli;
mod commands;
mod envelope;
mod error;
mod output;

use clap::Parser;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::envelope::Envelope;
use crate::error::CliError;

/// Exit code when a command completed but served fallback values.
const EXIT_PARTIAL: u8 = 3;

#[tokio::main]
async fn main() -> ExitCode {
    init_logging();

    match run().await {
        Ok(code) => ExitCode::from(code),
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<u8, CliError> {
    let cli = Cli::parse();

    let output = commands::run(&cli).await?;
    output::render(&output.envelope, &output.table, cli.format, cli.pretty)?;

    completion_code(&output.envelope, cli.strict)
}

/// Maps a rendered envelope to the process exit code.
fn completion_code<T>(envelope: &Envelope<T>, strict: bool) -> Result<u8, CliError> {
    if strict && (!envelope.meta.warnings.is_empty() || !envelope.errors.is_empty()) {
        return Err(CliError::StrictModeViolation {
            warning_count: envelope.meta.warnings.len(),
            error_count: envelope.errors.len(),
        });
    }

    if !envelope.errors.is_empty() {
        return Ok(EXIT_PARTIAL);
    }

    Ok(0)
}

#[cfg(test)]
mod tests {
    use bullion_core::{FetchFailure, MetalKind};

    use super::*;
    use crate::envelope::EnvelopeMeta;

    fn envelope(warnings: &[&str], errors: Vec<FetchFailure>) -> Envelope<()> {
        let mut meta = EnvelopeMeta::new(None, 0);
        for warning in warnings {
            meta.push_warning(*warning);
        }
        Envelope::new(meta, (), errors)
    }

    #[test]
    fn clean_envelope_exits_zero_in_any_mode() {
        let clean = envelope(&[], Vec::new());
        assert_eq!(completion_code(&clean, false).expect("succeeds"), 0);
        assert_eq!(completion_code(&clean, true).expect("succeeds"), 0);
    }

    #[test]
    fn fallback_errors_exit_three() {
        let partial = envelope(
            &["gold quote served from baseline"],
            vec![FetchFailure::unavailable(MetalKind::Gold, "outage")],
        );
        assert_eq!(completion_code(&partial, false).expect("succeeds"), EXIT_PARTIAL);
    }

    #[test]
    fn strict_mode_fails_on_warnings_alone() {
        let warned = envelope(&["slow source"], Vec::new());

        let err = completion_code(&warned, true).expect_err("must fail");

        assert!(matches!(
            err,
            CliError::StrictModeViolation {
                warning_count: 1,
                error_count: 0
            }
        ));
        assert_eq!(err.exit_code(), 5);
    }

    #[test]
    fn strict_mode_counts_errors() {
        let partial = envelope(
            &[],
            vec![
                FetchFailure::unavailable(MetalKind::Silver, "outage"),
                FetchFailure::rate_limited(MetalKind::Platinum, "budget"),
            ],
        );

        let err = completion_code(&partial, true).expect_err("must fail");
        assert!(matches!(
            err,
            CliError::StrictModeViolation { error_count: 2, .. }
        ));
    }
}
