//! Settlement types

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Resolved outcome of a bet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    Loss,
}

/// Outcome data for one player in a finished event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SettlementInput {
    /// Finishing rank, 1 = winner
    pub finish_position: Option<u32>,
    /// Number of players sharing that rank
    pub tie_count_at_position: u32,
    /// Cut status
    pub made_cut: Option<bool>,
}

/// Settled result written back to a bet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettlementResult {
    pub outcome: Outcome,
    /// Realized profit in units; `None` when a win has no odds to price it
    pub return_units: Option<f64>,
    /// Fraction of the full payout for Top-N wins
    #[serde(default)]
    pub dead_heat_fraction: Option<f64>,
}

impl SettlementResult {
    /// A losing result
    pub fn loss(stake: f64) -> Self {
        Self {
            outcome: Outcome::Loss,
            return_units: Some(-stake),
            dead_heat_fraction: None,
        }
    }

    /// A winning result paid at `fraction` of full odds
    pub fn win(stake: f64, odds_dec: Option<f64>, fraction: Option<f64>) -> Self {
        let paid = fraction.unwrap_or(1.0);
        Self {
            outcome: Outcome::Win,
            return_units: odds_dec.map(|odds| stake * (odds - 1.0) * paid),
            dead_heat_fraction: fraction,
        }
    }

    /// 1 for a win, 0 for a loss
    pub fn win_flag(&self) -> u8 {
        match self.outcome {
            Outcome::Win => 1,
            Outcome::Loss => 0,
        }
    }

    /// Win paid at less than full odds
    pub fn is_dead_heat(&self) -> bool {
        self.outcome == Outcome::Win && self.dead_heat_fraction.is_some_and(|f| f < 1.0)
    }

    /// Short label for listings
    pub fn label(&self) -> &'static str {
        match self.outcome {
            Outcome::Loss => "Loss",
            Outcome::Win if self.is_dead_heat() => "W - DHR",
            Outcome::Win => "Win",
        }
    }
}

/// Settlement errors
#[derive(Debug, Error, PartialEq)]
pub enum SettlementError {
    /// Manual dead heat fraction outside (0, 1]
    #[error("Dead heat fraction must be in (0, 1]: {0}")]
    InvalidDeadHeatFraction(f64),
}
