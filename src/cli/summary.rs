//! Summary command implementation

use crate::betslip::Betslip;
use crate::performance::PerformanceSummary;
use clap::Args;

#[derive(Args, Debug)]
pub struct SummaryArgs {
    /// Only bets of this event
    #[arg(long)]
    pub event: Option<String>,
}

impl SummaryArgs {
    pub async fn execute(&self, betslip: &Betslip) -> anyhow::Result<()> {
        let bets = betslip.list(self.event.as_deref()).await?;
        let summary = PerformanceSummary::from_bets(&bets);
        println!("{}", summary.format_table());
        Ok(())
    }
}
