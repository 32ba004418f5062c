//! Betslip editing commands

use super::{fmt_opt, parse_probability};
use crate::bet::{parse_opponents, BetId, BetRecord, BetStatus, BetUpdate, NewBet};
use crate::betslip::Betslip;
use crate::market::Market;
use clap::{Args, ValueEnum};

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Event id
    #[arg(long)]
    pub event: String,

    /// Market label, e.g. "Top 20", "make_cut", "matchup_2"
    #[arg(long)]
    pub market: String,

    /// Player name
    #[arg(long)]
    pub player: String,

    /// DataGolf player id
    #[arg(long)]
    pub dg_id: Option<String>,

    /// Opponents for matchups, separated by commas, semicolons or "vs"
    #[arg(long)]
    pub opponents: Option<String>,

    /// Model win probability, a fraction in [0, 1]
    #[arg(long, value_parser = parse_probability)]
    pub prob: f64,

    /// Best decimal odds
    #[arg(long)]
    pub odds: Option<f64>,

    /// Book offering the best odds
    #[arg(long)]
    pub book: Option<String>,
}

impl AddArgs {
    fn to_new_bet(&self) -> NewBet {
        let mut bet = NewBet::new(
            self.event.as_str(),
            Market::classify(&self.market),
            self.player.as_str(),
            self.prob,
        );
        if let Some(dg_id) = &self.dg_id {
            bet = bet.with_dg_id(dg_id.as_str());
        }
        if let Some(opponents) = &self.opponents {
            bet = bet.with_opponents(parse_opponents(opponents));
        }
        if let Some(odds) = self.odds {
            bet = bet.with_odds(odds);
        }
        if let Some(book) = &self.book {
            bet = bet.with_book(book.as_str());
        }
        bet
    }

    pub async fn execute(&self, betslip: &Betslip) -> anyhow::Result<()> {
        let bet = betslip.add(self.to_new_bet()).await?;
        println!("Added {}", bet.id);
        print_bets(&betslip.slip(Some(&bet.event_id)).await?);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct OddsArgs {
    /// Bet id
    pub id: BetId,

    /// Best decimal odds
    #[arg(long)]
    pub odds: f64,

    /// Book offering the odds
    #[arg(long)]
    pub book: Option<String>,
}

impl OddsArgs {
    pub async fn execute(&self, betslip: &Betslip) -> anyhow::Result<()> {
        let update = BetUpdate {
            odds_dec: Some(self.odds),
            book: self.book.clone(),
            status: None,
        };
        let bet = betslip.update(self.id, &update).await?;
        print_bets(&betslip.slip(Some(&bet.event_id)).await?);
        Ok(())
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusArg {
    Pending,
    Placed,
}

impl From<StatusArg> for BetStatus {
    fn from(value: StatusArg) -> Self {
        match value {
            StatusArg::Pending => BetStatus::Pending,
            StatusArg::Placed => BetStatus::Placed,
        }
    }
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Bet id
    pub id: BetId,

    /// New status
    #[arg(value_enum)]
    pub status: StatusArg,
}

impl StatusArgs {
    pub async fn execute(&self, betslip: &Betslip) -> anyhow::Result<()> {
        let bet = betslip
            .update(self.id, &BetUpdate::status(self.status.into()))
            .await?;
        print_bets(&betslip.slip(Some(&bet.event_id)).await?);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct RemoveArgs {
    /// Bet id
    pub id: BetId,
}

impl RemoveArgs {
    pub async fn execute(&self, betslip: &Betslip) -> anyhow::Result<()> {
        match betslip.remove(self.id).await? {
            Some(bet) => {
                println!("Removed {}", bet.id);
                print_bets(&betslip.slip(Some(&bet.event_id)).await?);
            }
            None => println!("No bet {}", self.id),
        }
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct RecomputeArgs {
    /// Event id
    #[arg(long)]
    pub event: String,
}

impl RecomputeArgs {
    pub async fn execute(&self, betslip: &Betslip) -> anyhow::Result<()> {
        let plans = betslip.recompute(&self.event).await?;
        println!("Recomputed {} pending bets", plans.len());
        print_bets(&betslip.slip(Some(&self.event)).await?);
        Ok(())
    }
}

#[derive(Args, Debug)]
pub struct ListArgs {
    /// Only bets of this event
    #[arg(long)]
    pub event: Option<String>,

    /// Show archived bets instead of the slip
    #[arg(long)]
    pub archived: bool,

    /// Output format: json or table
    #[arg(long, default_value = "table")]
    pub format: String,
}

impl ListArgs {
    pub async fn execute(&self, betslip: &Betslip) -> anyhow::Result<()> {
        let bets = if self.archived {
            betslip.history(self.event.as_deref()).await?
        } else {
            betslip.slip(self.event.as_deref()).await?
        };
        if self.format == "json" {
            println!("{}", serde_json::to_string_pretty(&bets)?);
        } else {
            print_bets(&bets);
        }
        Ok(())
    }
}

fn result_label(bet: &BetRecord) -> String {
    match bet.result {
        Some(result) => format!("{} {}", result.label(), fmt_opt(result.return_units, 2)),
        None => "-".to_string(),
    }
}

/// Print bets as a table
pub fn print_bets(bets: &[BetRecord]) {
    if bets.is_empty() {
        println!("(no bets)");
        return;
    }

    println!(
        "{:<36}  {:<10} {:<15} {:<22} {:>6} {:>6} {:>7} {:>7}  {:<7}  {}",
        "ID", "EVENT", "MARKET", "PLAYER", "ODDS", "P", "EDGE%", "STAKE", "STATUS", "RESULT"
    );
    for bet in bets {
        let plan = bet.plan.unwrap_or_default();
        let player = if bet.opponents.is_empty() {
            bet.player_name.clone()
        } else {
            format!("{} v {}", bet.player_name, bet.opponents.join("/"))
        };
        println!(
            "{:<36}  {:<10} {:<15} {:<22} {:>6} {:>6} {:>7.2} {:>7.2}  {:<7}  {}",
            bet.id,
            bet.event_id,
            bet.market.label(),
            player,
            fmt_opt(bet.market_odds_best_dec, 2),
            fmt_opt(bet.p_model, 3),
            plan.edge_prob * 100.0,
            plan.stake_units,
            format!("{:?}", bet.status).to_uppercase(),
            result_label(bet),
        );
    }
}
