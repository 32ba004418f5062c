//! Event history commands

use crate::betslip::Betslip;
use clap::Args;

#[derive(Args, Debug)]
pub struct ArchiveArgs {
    /// Event id
    #[arg(long)]
    pub event: String,

    /// Event name, e.g. "The Masters"
    #[arg(long)]
    pub name: Option<String>,

    /// Event year, used when grading from DataGolf
    #[arg(long)]
    pub year: Option<i32>,
}

impl ArchiveArgs {
    pub async fn execute(&self, betslip: &Betslip) -> anyhow::Result<()> {
        let report = betslip
            .archive(&self.event, self.name.clone(), self.year)
            .await?;
        println!(
            "Archived {} placed bets to {} ({} pending left on the slip)",
            report.archived, report.label, report.left_pending
        );
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct FinalizeArgs {
    /// Event id
    #[arg(long)]
    pub event: String,

    /// Unlock a finalized event for editing
    #[arg(long)]
    pub reopen: bool,
}

impl FinalizeArgs {
    pub async fn execute(&self, betslip: &Betslip) -> anyhow::Result<()> {
        let bets = betslip.finalize(&self.event, !self.reopen).await?;
        let state = if self.reopen { "reopened" } else { "finalized" };
        println!("{} {} ({} bets)", self.event, state, bets);
        Ok(())
    }
}
