//! gym CLI - Main entry point.
//!
//! Exit codes:
//! - 0: Success
//! - 1: General error
//! - 2: Invalid configuration or arguments
//! - 3: Quote rejected or cancelled

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use gym_pricing::{PricingError, Rejection};

mod commands;

use commands::interactive::PromptError;
use commands::{Cli, Commands};

/// CI-friendly exit codes
pub struct ExitCodes;

impl ExitCodes {
    pub const SUCCESS: u8 = 0;
    pub const GENERAL_ERROR: u8 = 1;
    pub const INVALID_CONFIG: u8 = 2;
    pub const QUOTE_REJECTED: u8 = 3;
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "gym_pricing=debug,gym_cli=debug,warn"
    } else if cli.quiet {
        "warn"
    } else {
        "gym_pricing=info,gym_cli=info,warn"
    };

    // Logging may already be initialized; continue either way.
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
        .try_init();

    let result = match cli.command {
        Commands::Quote(args) => commands::quote::execute(args, &cli.profile).await,
        Commands::Interactive(args) => commands::interactive::execute(args, &cli.profile).await,
        Commands::Catalog(args) => commands::catalog::execute(args, &cli.profile).await,
        Commands::Profiles(args) => commands::profiles::execute(args).await,
    };

    match result {
        Ok(()) => ExitCode::from(ExitCodes::SUCCESS),
        Err(e) => {
            let exit_code = categorize_error(&e);
            if exit_code == ExitCodes::QUOTE_REJECTED {
                report_rejection(&e);
            } else {
                eprintln!("❌ Error: {:#}", e);
            }
            ExitCode::from(exit_code)
        }
    }
}

/// Categorize error to determine exit code
fn categorize_error(e: &anyhow::Error) -> u8 {
    if e.downcast_ref::<Rejection>().is_some() || e.downcast_ref::<PromptError>().is_some() {
        ExitCodes::QUOTE_REJECTED
    } else if e.downcast_ref::<PricingError>().is_some() {
        ExitCodes::INVALID_CONFIG
    } else {
        ExitCodes::GENERAL_ERROR
    }
}

fn report_rejection(e: &anyhow::Error) {
    match e.downcast_ref::<Rejection>() {
        Some(Rejection::NotConfirmed) => println!("Operation cancelled by user."),
        _ => eprintln!("Error: {}", e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_categorize_rejections() {
        let rejected = anyhow::Error::new(Rejection::InvalidPlan("gold".into()));
        assert_eq!(categorize_error(&rejected), ExitCodes::QUOTE_REJECTED);

        let prompt = anyhow::Error::new(PromptError::InputClosed);
        assert_eq!(categorize_error(&prompt), ExitCodes::QUOTE_REJECTED);
    }

    #[test]
    fn test_categorize_config_errors_through_context() {
        let err: anyhow::Result<()> = Err(PricingError::ProfileNotFound("gold".into()))
            .context("Available profiles: standard");
        assert_eq!(categorize_error(&err.unwrap_err()), ExitCodes::INVALID_CONFIG);

        let other = anyhow::anyhow!("something else");
        assert_eq!(categorize_error(&other), ExitCodes::GENERAL_ERROR);
    }
}
