//! Settlement commands

use super::{fmt_opt, parse_fraction};
use crate::bet::BetId;
use crate::betslip::{Betslip, GradeReport};
use crate::config::FeedConfig;
use crate::feed::{DataGolfFeed, FileFeed, ResultsFeed};
use clap::{Args, ValueEnum};
use std::path::PathBuf;

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeArg {
    Win,
    Loss,
}

#[derive(Args, Debug)]
pub struct SettleArgs {
    /// Bet id
    pub id: BetId,

    /// Outcome to record
    #[arg(value_enum)]
    pub outcome: OutcomeArg,

    /// Dead heat fraction for Top-N wins, e.g. "3/6" or 0.5
    #[arg(long, value_parser = parse_fraction)]
    pub dead_heat: Option<f64>,
}

impl SettleArgs {
    pub async fn execute(&self, betslip: &Betslip) -> anyhow::Result<()> {
        let bet = betslip
            .settle_manual(self.id, self.outcome == OutcomeArg::Win, self.dead_heat)
            .await?;
        if let Some(result) = bet.result {
            println!(
                "{} settled: {} ({} units)",
                bet.id,
                result.label(),
                fmt_opt(result.return_units, 2)
            );
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct UnsettleArgs {
    /// Bet id
    pub id: BetId,
}

impl UnsettleArgs {
    pub async fn execute(&self, betslip: &Betslip) -> anyhow::Result<()> {
        let bet = betslip.unsettle(self.id).await?;
        println!("{} unsettled", bet.id);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct GradeArgs {
    /// Event id; omit to grade every archived event with open bets
    #[arg(long)]
    pub event: Option<String>,

    /// Read results from a JSON export instead of DataGolf
    #[arg(long, requires = "event")]
    pub results: Option<PathBuf>,

    /// Event year; defaults to the year stored when the event was archived
    #[arg(long)]
    pub year: Option<i32>,
}

fn print_report(label: &str, report: &GradeReport) {
    for (id, result) in &report.settled {
        println!("{}  {:<7}  {}", id, result.label(), fmt_opt(result.return_units, 2));
    }
    println!(
        "Graded {}: {} settled, {} left open",
        label,
        report.settled.len(),
        report.skipped.len()
    );
}

impl GradeArgs {
    pub async fn execute(&self, betslip: &Betslip, feed_config: &FeedConfig) -> anyhow::Result<()> {
        let feed: Box<dyn ResultsFeed> = match &self.results {
            Some(path) => Box::new(FileFeed::new(path)),
            None => Box::new(DataGolfFeed::from_env(feed_config)?),
        };

        let Some(event_id) = &self.event else {
            let reports = betslip.grade_archived(feed.as_ref()).await?;
            if reports.is_empty() {
                println!("No archived events with open bets");
            }
            for (event_id, report) in &reports {
                print_report(event_id, report);
            }
            return Ok(());
        };

        let event = betslip.event_ref(event_id, self.year).await?;
        let report = betslip.grade_from_feed(&event, feed.as_ref()).await?;
        print_report(event_id, &report);
        Ok(())
    }
}
