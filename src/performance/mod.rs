//! Realized performance over settled bets

use crate::bet::{BetRecord, BetStatus};
use crate::settlement::Outcome;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

fn to_decimal(value: f64) -> Decimal {
    Decimal::try_from(value).unwrap_or_default().round_dp(4)
}

fn ratio(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        Decimal::ZERO
    } else {
        (numerator / denominator).round_dp(4)
    }
}

/// Totals for one market label
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketLine {
    pub settled: usize,
    pub wins: usize,
    /// Stake on settled bets with a known return
    pub staked: Decimal,
    /// Sum of realized returns
    pub net_units: Decimal,
}

impl MarketLine {
    pub fn roi(&self) -> Decimal {
        ratio(self.net_units, self.staked)
    }
}

/// Totals for one event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLine {
    /// Archive label, or the event id for bets still on the slip
    pub label: String,
    pub bets: usize,
    pub settled: usize,
    pub wins: usize,
    pub staked: Decimal,
    pub net_units: Decimal,
    /// Results locked by finalizing the event
    pub finalized: bool,
}

impl EventLine {
    pub fn roi(&self) -> Decimal {
        ratio(self.net_units, self.staked)
    }
}

/// Summary statistics over a set of bets
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceSummary {
    pub total_bets: usize,
    pub pending: usize,
    /// Placed bets without a result
    pub open: usize,
    pub settled: usize,
    pub wins: usize,
    pub losses: usize,
    /// Top-N wins paid at a dead heat fraction below 1
    pub dead_heat_wins: usize,
    /// Wins whose return could not be computed (odds missing)
    pub unpriced_wins: usize,
    /// Stake on settled bets with a known return
    pub staked: Decimal,
    /// Sum of realized returns
    pub net_units: Decimal,
    /// Stake currently on pending bets
    pub pending_stake: Decimal,
    pub by_market: BTreeMap<String, MarketLine>,
    /// Keyed by event id
    pub by_event: BTreeMap<String, EventLine>,
}

impl PerformanceSummary {
    pub fn from_bets(bets: &[BetRecord]) -> Self {
        let mut summary = Self {
            total_bets: bets.len(),
            ..Default::default()
        };

        for bet in bets {
            let stake = to_decimal(bet.stake_units().unwrap_or(0.0));

            let event = summary.by_event.entry(bet.event_id.clone()).or_default();
            event.bets += 1;
            event.finalized |= bet.is_final();
            if let Some(stamp) = &bet.archive {
                event.label = stamp.label(&bet.event_id);
            } else if event.label.is_empty() {
                event.label = bet.event_id.clone();
            }

            let Some(result) = bet.result else {
                match bet.status {
                    BetStatus::Pending => {
                        summary.pending += 1;
                        summary.pending_stake += stake;
                    }
                    BetStatus::Placed => summary.open += 1,
                }
                continue;
            };

            summary.settled += 1;
            event.settled += 1;
            let line = summary.by_market.entry(bet.market.label()).or_default();
            line.settled += 1;

            match result.outcome {
                Outcome::Win => {
                    summary.wins += 1;
                    line.wins += 1;
                    event.wins += 1;
                    if result.is_dead_heat() {
                        summary.dead_heat_wins += 1;
                    }
                }
                Outcome::Loss => summary.losses += 1,
            }

            match result.return_units {
                Some(ret) => {
                    let ret = to_decimal(ret);
                    summary.staked += stake;
                    summary.net_units += ret;
                    line.staked += stake;
                    line.net_units += ret;
                    event.staked += stake;
                    event.net_units += ret;
                }
                None => summary.unpriced_wins += 1,
            }
        }

        summary
    }

    /// Net return per unit staked
    pub fn roi(&self) -> Decimal {
        ratio(self.net_units, self.staked)
    }

    pub fn win_rate(&self) -> Decimal {
        ratio(Decimal::from(self.wins), Decimal::from(self.settled))
    }

    /// Format as table for CLI output
    pub fn format_table(&self) -> String {
        let mut markets = String::new();
        for (label, line) in &self.by_market {
            markets.push_str(&format!(
                "{:<17} {:>4} settled  {:>4} won  {:>+10.2}u  ROI {:>+7.2}%\n",
                label,
                line.settled,
                line.wins,
                line.net_units,
                line.roi() * dec!(100),
            ));
        }
        if markets.is_empty() {
            markets.push_str("(no settled bets)\n");
        }

        let mut events = String::new();
        for line in self.by_event.values() {
            events.push_str(&format!(
                "{:<24} {:>4} settled  {:>+10.2}u  ROI {:>+7.2}%{}\n",
                line.label,
                line.settled,
                line.net_units,
                line.roi() * dec!(100),
                if line.finalized { "  FINAL" } else { "" },
            ));
        }
        if events.is_empty() {
            events.push_str("(no bets)\n");
        }

        format!(
            r#"
══════════════════════════════════════════════════════
               BETTING PERFORMANCE
══════════════════════════════════════════════════════

RESULTS
───────────────────────────────────────────────────────
Net Units:        {:+.2}
Staked:           {:.2}
ROI:              {:+.2}%
Win Rate:         {:.1}%
Wins / Losses:    {} / {}
Dead Heat Wins:   {}
Unpriced Wins:    {}

BY MARKET
───────────────────────────────────────────────────────
{}
BY EVENT
───────────────────────────────────────────────────────
{}
ACTIVITY
───────────────────────────────────────────────────────
Total Bets:       {}
Pending:          {} ({:.2}u)
Placed, Open:     {}
══════════════════════════════════════════════════════
"#,
            self.net_units,
            self.staked,
            self.roi() * dec!(100),
            self.win_rate() * dec!(100),
            self.wins,
            self.losses,
            self.dead_heat_wins,
            self.unpriced_wins,
            markets,
            events,
            self.total_bets,
            self.pending,
            self.pending_stake,
            self.open,
        )
    }
}
