//! Automatic and manual settlement

use super::{SettlementError, SettlementInput, SettlementResult};
use crate::bet::BetRecord;
use crate::market::Market;
use crate::staking::finite_or_zero;

/// Fraction of a Top-N payout earned by a tied finish
///
/// Paid places remaining (`n - pos + 1`) shared among everyone tied at `pos`.
/// Example: Top 20, T18 with six tied: 3 / 6 = 0.5.
pub fn dead_heat_fraction(top_n: u32, finish_position: u32, tie_count: u32) -> f64 {
    if tie_count == 0 {
        return 0.0;
    }
    let paid_places = i64::from(top_n) - i64::from(finish_position) + 1;
    (paid_places as f64 / f64::from(tie_count)).clamp(0.0, 1.0)
}

/// Resolves bets into win/loss and realized return
///
/// Only ever produces a [`SettlementResult`]; stake plans are left alone.
#[derive(Debug, Clone, Default)]
pub struct SettlementEngine;

impl SettlementEngine {
    pub fn new() -> Self {
        Self
    }

    /// Settle a bet from finish data
    ///
    /// Returns `None` when the bet cannot be settled yet: unclassified or
    /// matchup market, missing cut status, or no positive stake. The bet then
    /// stays open for a later pass.
    pub fn settle(&self, bet: &BetRecord, input: &SettlementInput) -> Option<SettlementResult> {
        let stake = bet.stake_units().filter(|s| s.is_finite() && *s > 0.0)?;
        let odds = bet.market_odds_best_dec.filter(|o| o.is_finite());

        match &bet.market {
            Market::TopN(n) => match input.finish_position {
                Some(pos) if pos <= *n => {
                    let fraction = dead_heat_fraction(*n, pos, input.tie_count_at_position);
                    Some(SettlementResult::win(stake, odds, Some(fraction)))
                }
                _ => Some(SettlementResult::loss(stake)),
            },
            Market::MakeCut => input.made_cut.map(|made| {
                if made {
                    SettlementResult::win(stake, odds, None)
                } else {
                    SettlementResult::loss(stake)
                }
            }),
            Market::MissCut => input.made_cut.map(|made| {
                if made {
                    SettlementResult::loss(stake)
                } else {
                    SettlementResult::win(stake, odds, None)
                }
            }),
            Market::Matchup2 | Market::Matchup3 | Market::Unclassified(_) => None,
        }
    }

    /// Settle on an operator's call, bypassing finish lookup
    ///
    /// A dead heat fraction only applies to Top-N markets and is ignored elsewhere.
    pub fn settle_manual(
        &self,
        bet: &BetRecord,
        is_win: bool,
        dead_heat: Option<f64>,
    ) -> Result<SettlementResult, SettlementError> {
        if let Some(fraction) = dead_heat {
            if !(fraction.is_finite() && fraction > 0.0 && fraction <= 1.0) {
                return Err(SettlementError::InvalidDeadHeatFraction(fraction));
            }
        }

        let stake = finite_or_zero(bet.stake_units().unwrap_or(0.0));
        if !is_win {
            return Ok(SettlementResult::loss(stake));
        }

        let odds = bet.market_odds_best_dec.filter(|o| o.is_finite());
        let fraction = match bet.market {
            Market::TopN(_) => dead_heat,
            _ => None,
        };
        Ok(SettlementResult::win(stake, odds, fraction))
    }

    /// Return a bet to the unsettled state
    pub fn unsettle(&self, bet: &mut BetRecord) {
        bet.result = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bet::{BetStatus, NewBet};
    use crate::settlement::Outcome;
    use crate::staking::StakePlan;

    fn bet(market: Market, stake: f64, odds: Option<f64>) -> BetRecord {
        let mut bet = NewBet::new("evt-1", market, "A", 0.3).into_record();
        bet.market_odds_best_dec = odds;
        bet.status = BetStatus::Placed;
        bet.plan = Some(StakePlan {
            stake_units: stake,
            ..Default::default()
        });
        bet
    }

    fn finish(pos: Option<u32>, ties: u32) -> SettlementInput {
        SettlementInput {
            finish_position: pos,
            tie_count_at_position: ties,
            made_cut: Some(true),
        }
    }

    fn cut(made_cut: Option<bool>) -> SettlementInput {
        SettlementInput {
            made_cut,
            ..Default::default()
        }
    }

    #[test]
    fn test_dead_heat_fraction() {
        assert_eq!(dead_heat_fraction(20, 18, 6), 0.5);
        assert_eq!(dead_heat_fraction(20, 20, 4), 0.25);
        assert_eq!(dead_heat_fraction(20, 5, 2), 1.0);
        assert_eq!(dead_heat_fraction(20, 18, 0), 0.0);
        assert_eq!(dead_heat_fraction(20, 25, 1), 0.0);
    }

    #[test]
    fn test_top20_dead_heat_example() {
        let engine = SettlementEngine::new();
        let bet = bet(Market::TopN(20), 10.0, Some(5.0));

        let result = engine.settle(&bet, &finish(Some(18), 6)).unwrap();

        assert_eq!(result.outcome, Outcome::Win);
        assert_eq!(result.dead_heat_fraction, Some(0.5));
        assert_eq!(result.return_units, Some(20.0));
        assert_eq!(result.label(), "W - DHR");
    }

    #[test]
    fn test_top20_outside_places_is_loss() {
        let engine = SettlementEngine::new();
        let bet = bet(Market::TopN(20), 10.0, Some(5.0));

        for ties in [0, 1, 7] {
            let result = engine.settle(&bet, &finish(Some(25), ties)).unwrap();
            assert_eq!(result.outcome, Outcome::Loss);
            assert_eq!(result.return_units, Some(-10.0));
        }
    }

    #[test]
    fn test_top20_missing_finish_is_loss() {
        let engine = SettlementEngine::new();
        let bet = bet(Market::TopN(20), 8.0, Some(5.0));

        let result = engine.settle(&bet, &finish(None, 1)).unwrap();

        assert_eq!(result.outcome, Outcome::Loss);
        assert_eq!(result.return_units, Some(-8.0));
    }

    #[test]
    fn test_top20_win_without_odds() {
        let engine = SettlementEngine::new();
        let bet = bet(Market::TopN(20), 10.0, None);

        let result = engine.settle(&bet, &finish(Some(3), 1)).unwrap();

        assert_eq!(result.outcome, Outcome::Win);
        assert!(result.return_units.is_none());
    }

    #[test]
    fn test_top20_zero_ties_pays_nothing() {
        let engine = SettlementEngine::new();
        let bet = bet(Market::TopN(20), 10.0, Some(5.0));

        let result = engine.settle(&bet, &finish(Some(10), 0)).unwrap();

        assert_eq!(result.outcome, Outcome::Win);
        assert_eq!(result.return_units, Some(0.0));
    }

    #[test]
    fn test_make_cut() {
        let engine = SettlementEngine::new();
        let bet = bet(Market::MakeCut, 10.0, Some(1.5));

        let won = engine.settle(&bet, &cut(Some(true))).unwrap();
        assert_eq!(won.outcome, Outcome::Win);
        assert_eq!(won.return_units, Some(5.0));
        assert!(won.dead_heat_fraction.is_none());

        let lost = engine.settle(&bet, &cut(Some(false))).unwrap();
        assert_eq!(lost.return_units, Some(-10.0));

        assert!(engine.settle(&bet, &cut(None)).is_none());
    }

    #[test]
    fn test_miss_cut() {
        let engine = SettlementEngine::new();
        let bet = bet(Market::MissCut, 10.0, Some(3.0));

        let won = engine.settle(&bet, &cut(Some(false))).unwrap();
        assert_eq!(won.outcome, Outcome::Win);
        assert_eq!(won.return_units, Some(20.0));

        let lost = engine.settle(&bet, &cut(Some(true))).unwrap();
        assert_eq!(lost.outcome, Outcome::Loss);

        assert!(engine.settle(&bet, &cut(None)).is_none());
    }

    #[test]
    fn test_unclassified_and_matchups_skipped() {
        let engine = SettlementEngine::new();
        let input = finish(Some(1), 1);

        for market in [
            Market::Matchup2,
            Market::Matchup3,
            Market::Unclassified("Outright".to_string()),
        ] {
            assert!(engine.settle(&bet(market, 10.0, Some(3.0)), &input).is_none());
        }
    }

    #[test]
    fn test_zero_stake_skipped() {
        let engine = SettlementEngine::new();
        let bet = bet(Market::MakeCut, 0.0, Some(1.5));
        assert!(engine.settle(&bet, &cut(Some(true))).is_none());
    }

    #[test]
    fn test_manual_settle() {
        let engine = SettlementEngine::new();
        let top = bet(Market::TopN(20), 10.0, Some(5.0));

        let full = engine.settle_manual(&top, true, None).unwrap();
        assert_eq!(full.return_units, Some(40.0));

        let split = engine.settle_manual(&top, true, Some(0.5)).unwrap();
        assert_eq!(split.return_units, Some(20.0));
        assert_eq!(split.label(), "W - DHR");

        let lost = engine.settle_manual(&top, false, Some(0.5)).unwrap();
        assert_eq!(lost.return_units, Some(-10.0));
    }

    #[test]
    fn test_manual_fraction_ignored_outside_top_n() {
        let engine = SettlementEngine::new();
        let make_cut = bet(Market::MakeCut, 10.0, Some(2.0));

        let result = engine.settle_manual(&make_cut, true, Some(0.5)).unwrap();

        assert_eq!(result.return_units, Some(10.0));
        assert!(result.dead_heat_fraction.is_none());
    }

    #[test]
    fn test_manual_rejects_bad_fraction() {
        let engine = SettlementEngine::new();
        let top = bet(Market::TopN(20), 10.0, Some(5.0));

        for bad in [0.0, -0.5, 1.5, f64::NAN] {
            assert!(matches!(
                engine.settle_manual(&top, true, Some(bad)),
                Err(SettlementError::InvalidDeadHeatFraction(_))
            ));
        }
    }

    #[test]
    fn test_unsettle_round_trip() {
        let engine = SettlementEngine::new();
        let original = bet(Market::TopN(20), 10.0, Some(5.0));

        let mut settled = original.clone();
        settled.result = engine.settle(&settled, &finish(Some(18), 6));
        assert!(settled.is_settled());

        engine.unsettle(&mut settled);

        assert!(settled.result.is_none());
        assert_eq!(settled, original);
    }
}
