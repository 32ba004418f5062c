//! CLI interface for stakebook
//!
//! Provides subcommands for:
//! - `price`: Price a candidate without storing it
//! - `add`, `odds`, `status`, `remove`: Edit the betslip (each recomputes the event)
//! - `recompute`, `list`: Re-derive and show stakes
//! - `settle`, `unsettle`, `grade`: Resolve results
//! - `archive`, `finalize`: Move played events into history and lock them
//! - `summary`: Realized performance
//! - `config`: Show configuration

mod archive;
mod bets;
mod price;
mod settle;
mod summary;

pub use archive::{ArchiveArgs, FinalizeArgs};
pub use bets::{AddArgs, ListArgs, OddsArgs, RecomputeArgs, RemoveArgs, StatusArgs};
pub use price::PriceArgs;
pub use settle::{GradeArgs, SettleArgs, UnsettleArgs};
pub use summary::SummaryArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "stakebook")]
#[command(about = "Fractional-Kelly stake sizing, exposure caps and settlement for golf wagers")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml", global = true)]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Price a candidate bet without storing it
    Price(PriceArgs),
    /// Add a bet to the slip
    Add(AddArgs),
    /// Set a bet's best odds and book
    Odds(OddsArgs),
    /// Mark a bet pending or placed
    Status(StatusArgs),
    /// Remove a bet from the slip
    Remove(RemoveArgs),
    /// Recompute every pending stake of an event
    Recompute(RecomputeArgs),
    /// List bets
    List(ListArgs),
    /// Settle a placed bet manually
    Settle(SettleArgs),
    /// Clear a bet's result
    Unsettle(UnsettleArgs),
    /// Settle placed bets from final results
    Grade(GradeArgs),
    /// Move an event's placed bets off the slip into its history
    Archive(ArchiveArgs),
    /// Lock an archived event's results, or reopen them
    Finalize(FinalizeArgs),
    /// Show realized performance
    Summary(SummaryArgs),
    /// Show configuration
    Config,
}

/// Parse a dead heat fraction written as `a/b` or a decimal, in (0, 1]
pub fn parse_fraction(raw: &str) -> Result<f64, String> {
    let number = |s: &str| {
        s.trim()
            .parse::<f64>()
            .map_err(|_| format!("invalid number '{}' in '{}'", s.trim(), raw))
    };

    let value = match raw.split_once('/') {
        Some((num, den)) => {
            let den = number(den)?;
            if den == 0.0 {
                return Err(format!("zero denominator in '{}'", raw));
            }
            number(num)? / den
        }
        None => number(raw)?,
    };

    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(value)
    } else {
        Err(format!("dead heat fraction must be in (0, 1], got '{}'", raw))
    }
}

/// Parse a model probability, which must be a fraction in [0, 1]
pub fn parse_probability(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|_| format!("invalid probability '{}'", raw.trim()))?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("probability must be in [0, 1], got '{}'", raw.trim()))
    }
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value
        .map(|v| format!("{:.*}", precision, v))
        .unwrap_or_else(|| "-".to_string())
}
