//! Staking types

use crate::bet::BetId;
use serde::{Deserialize, Serialize};

/// Coerce NaN and infinities to zero
pub fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Output of pricing a single bet, before exposure caps
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pricing {
    /// Model probability minus implied probability
    pub edge_prob: f64,
    /// Expected profit per unit staked
    pub ev_per_unit: f64,
    /// Full Kelly fraction (may be negative)
    pub kelly_full: f64,
    /// Fractional Kelly, clamped to [0, 1]
    pub kelly_frac: f64,
    /// Stake in units after the market multiplier, before caps
    pub raw_stake: f64,
}

impl Pricing {
    /// Finalize into a plan carrying the given capped stake
    pub fn into_plan(self, stake_units: f64) -> StakePlan {
        StakePlan {
            edge_prob: self.edge_prob,
            ev_per_unit: self.ev_per_unit,
            kelly_full: self.kelly_full,
            kelly_frac: self.kelly_frac,
            stake_units,
        }
        .sanitized()
    }
}

/// Engine-owned sizing for a bet. Recomputed in full, never hand-edited.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakePlan {
    pub edge_prob: f64,
    pub ev_per_unit: f64,
    pub kelly_full: f64,
    pub kelly_frac: f64,
    pub stake_units: f64,
}

impl StakePlan {
    /// Copy with every non-finite field zeroed and a non-negative stake
    pub fn sanitized(self) -> Self {
        Self {
            edge_prob: finite_or_zero(self.edge_prob),
            ev_per_unit: finite_or_zero(self.ev_per_unit),
            kelly_full: finite_or_zero(self.kelly_full),
            kelly_frac: finite_or_zero(self.kelly_frac),
            stake_units: finite_or_zero(self.stake_units).max(0.0),
        }
    }

    /// Whether the edge clears the display threshold
    pub fn is_value(&self, min_edge: f64) -> bool {
        self.edge_prob >= min_edge
    }
}

/// Recomputed plan for one pending bet
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecomputedStake {
    pub bet_id: BetId,
    pub plan: StakePlan,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finite_or_zero() {
        assert_eq!(finite_or_zero(1.5), 1.5);
        assert_eq!(finite_or_zero(f64::NAN), 0.0);
        assert_eq!(finite_or_zero(f64::INFINITY), 0.0);
        assert_eq!(finite_or_zero(f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_sanitized_plan() {
        let plan = StakePlan {
            edge_prob: f64::NEG_INFINITY,
            ev_per_unit: f64::NAN,
            kelly_full: 0.1,
            kelly_frac: 0.025,
            stake_units: -3.0,
        }
        .sanitized();

        assert_eq!(plan.edge_prob, 0.0);
        assert_eq!(plan.ev_per_unit, 0.0);
        assert_eq!(plan.kelly_full, 0.1);
        assert_eq!(plan.stake_units, 0.0);
    }

    #[test]
    fn test_is_value_threshold() {
        let plan = StakePlan {
            edge_prob: 0.05,
            ..Default::default()
        };
        assert!(plan.is_value(0.04));
        assert!(!plan.is_value(0.06));
    }
}
