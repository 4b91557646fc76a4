//! CLI command definitions.
//!
//! This module defines the command structure for the gym pricing CLI and the
//! pieces shared between subcommands: profile selection, name normalization
//! and console notifications.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tracing::debug;

use gym_pricing::{Adjustment, PricingObserver, PricingProfile, ProfileSet, DEFAULT_PROFILE};

pub mod catalog;
pub mod interactive;
pub mod profiles;
pub mod quote;

/// gym - membership price calculator
#[derive(Parser)]
#[command(name = "gym")]
#[command(version, about = "gym - membership price calculator")]
#[command(long_about = r#"
Quote gym membership prices from a plan, add-on features and a member count.

COMMANDS:
  quote        → Price a single request from command-line options
  interactive  → Walk through plan, features, members and confirmation
  catalog      → Show plans, features and pricing rules
  profiles     → List available pricing profiles

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid configuration or arguments
  3 - Quote rejected or cancelled
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(flatten)]
    pub profile: ProfileOpts,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Price a membership request
    Quote(quote::QuoteArgs),

    /// Price a membership request step by step
    Interactive(interactive::InteractiveArgs),

    /// Show the active catalog and rules
    Catalog(catalog::CatalogArgs),

    /// List pricing profiles
    Profiles(profiles::ProfilesArgs),
}

/// Which pricing profile to use.
#[derive(Args, Debug, Clone)]
pub struct ProfileOpts {
    /// Built-in profile id
    #[arg(long = "profile", global = true, env = "GYM_PROFILE", default_value = DEFAULT_PROFILE)]
    pub id: String,

    /// Profile file (YAML or TOML); takes precedence over --profile
    #[arg(long, global = true, env = "GYM_PROFILE_FILE")]
    pub profile_file: Option<PathBuf>,
}

impl ProfileOpts {
    pub fn load(&self) -> Result<PricingProfile> {
        if let Some(path) = &self.profile_file {
            debug!("Loading profile from {}", path.display());
            return PricingProfile::from_file(path)
                .with_context(|| format!("Failed to load profile {}", path.display()));
        }

        let builtins = ProfileSet::with_builtins();
        let profile = builtins
            .get(&self.id)
            .with_context(|| format!("Available profiles: {}", builtins.ids().join(", ")))?;
        Ok(profile.clone())
    }
}

/// Normalize a user-entered plan or feature name.
pub fn normalize_name(input: &str) -> String {
    input.trim().to_lowercase()
}

/// Format a signed amount as `+$1.5` / `-$20`.
pub fn format_amount(amount: Decimal) -> String {
    let sign = if amount.is_sign_negative() { "-" } else { "+" };
    format!("{}${}", sign, amount.abs().normalize())
}

/// Prints each applied adjustment as it happens.
pub struct ConsoleObserver<W: Write> {
    out: W,
}

impl<W: Write> ConsoleObserver<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> PricingObserver for ConsoleObserver<W> {
    fn adjustment_applied(&mut self, adjustment: &Adjustment) {
        // Write errors never change the quote.
        let _ = writeln!(
            self.out,
            "   ✓ {} applied: {}",
            adjustment.kind.label(),
            format_amount(adjustment.amount)
        );
    }
}
