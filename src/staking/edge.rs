//! Edge and fractional Kelly pricing for decimal-odds bets

use super::Pricing;
use crate::config::{MarketMultipliers, StakingConfig};
use crate::market::Market;

/// Prices a model probability against decimal odds
///
/// For decimal odds `d` with net odds `b = d - 1`:
/// - implied probability = 1 / d
/// - EV per unit = p*b - q
/// - full Kelly f* = (p*(b+1) - 1) / b
#[derive(Debug, Clone)]
pub struct EdgeCalculator {
    /// Kelly fraction (e.g., 0.25 for quarter Kelly)
    pub kelly_fraction: f64,
    /// Bankroll in units
    pub bankroll_units: f64,
    /// Per-market stake multipliers
    pub multipliers: MarketMultipliers,
}

impl EdgeCalculator {
    /// Create a new calculator
    pub fn new(kelly_fraction: f64, bankroll_units: f64, multipliers: MarketMultipliers) -> Self {
        Self {
            kelly_fraction,
            bankroll_units,
            multipliers,
        }
    }

    /// Create from StakingConfig
    pub fn from_config(config: &StakingConfig) -> Self {
        Self::new(config.kelly_fraction, config.bankroll_units, config.multipliers)
    }

    /// Stake multiplier for a market
    pub fn multiplier(&self, market: &Market) -> f64 {
        match market {
            Market::Matchup2 => self.multipliers.matchup2,
            Market::Matchup3 => self.multipliers.matchup3,
            _ => self.multipliers.default,
        }
    }

    /// Price a bet
    ///
    /// Missing probability counts as zero and probability is held to [0, 1].
    /// Odds at or below 1.0 never stake.
    pub fn price(&self, probability: Option<f64>, odds_dec: Option<f64>, market: &Market) -> Pricing {
        let p = probability
            .filter(|p| p.is_finite())
            .unwrap_or(0.0)
            .clamp(0.0, 1.0);
        let q = 1.0 - p;

        let Some(odds) = odds_dec.filter(|o| o.is_finite() && *o > 0.0) else {
            return Pricing {
                edge_prob: 0.0,
                ev_per_unit: 0.0,
                kelly_full: 0.0,
                kelly_frac: 0.0,
                raw_stake: 0.0,
            };
        };

        let b = odds - 1.0;
        let implied = 1.0 / odds;
        let edge_prob = p - implied;
        let ev_per_unit = p * b - q;
        let kelly_full = if b > 0.0 { (p * (b + 1.0) - 1.0) / b } else { 0.0 };
        let kelly_frac = (kelly_full * self.kelly_fraction).clamp(0.0, 1.0);
        let raw_stake = kelly_frac * self.bankroll_units * self.multiplier(market);

        Pricing {
            edge_prob,
            ev_per_unit,
            kelly_full,
            kelly_frac,
            raw_stake,
        }
    }
}

impl Default for EdgeCalculator {
    fn default() -> Self {
        Self::from_config(&StakingConfig::default())
    }
}
