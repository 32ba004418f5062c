//! Exposure caps across an event's bets
//!
//! Pending stakes are re-derived as a whole for one event: every pending bet is
//! priced, pending and placed stakes are grouped by player and by opponent, and
//! each bet is scaled by the tightest cap it touches before the per-bet cap.
//! Names that the event's own bets tie to a DataGolf id are keyed by that id,
//! so a name-listed opponent and a dg-keyed player share one exposure.

use super::{finite_or_zero, EdgeCalculator, Pricing, RecomputedStake};
use crate::bet::{BetRecord, Identity, IdentityAliases};
use crate::config::StakingConfig;
use crate::market::OpponentExposure;
use std::collections::HashMap;

/// Opponent keys a bet creates liability against
fn opponent_keys(bet: &BetRecord, aliases: &IdentityAliases) -> Vec<Identity> {
    let keys = match bet.market.opponent_exposure() {
        OpponentExposure::Listed => bet.opponent_identities(),
        OpponentExposure::SelfKeyed => vec![bet.identity()],
        OpponentExposure::None => vec![],
    };
    keys.into_iter().map(|key| aliases.resolve(key)).collect()
}

/// Aliases from every bet of the event that carries a dg id
fn event_aliases(event_id: &str, bets: &[BetRecord]) -> IdentityAliases {
    let mut aliases = IdentityAliases::new();
    for bet in bets.iter().filter(|b| b.event_id == event_id) {
        if let Some(dg_id) = &bet.dg_id {
            aliases.insert(&bet.player_name, dg_id);
        }
    }
    aliases
}

fn accumulate(map: &mut HashMap<Identity, f64>, key: Identity, stake: f64) {
    *map.entry(key).or_insert(0.0) += stake;
}

/// Scale factor for one key
///
/// `remaining / pending`, clamped to [0, 1]. Keys with nothing pending are unconstrained.
pub fn cap_factor(cap: f64, pending_sum: f64, placed_used: f64) -> f64 {
    if pending_sum > 0.0 {
        ((cap - placed_used) / pending_sum).clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Stake totals for one event, split by pending/placed and player/opponent key
#[derive(Debug, Clone, Default)]
pub struct ExposureLedger {
    pub player_pending: HashMap<Identity, f64>,
    pub player_placed: HashMap<Identity, f64>,
    pub opponent_pending: HashMap<Identity, f64>,
    pub opponent_placed: HashMap<Identity, f64>,
    aliases: IdentityAliases,
}

impl ExposureLedger {
    /// Empty ledger keying names through `aliases`
    pub fn with_aliases(aliases: IdentityAliases) -> Self {
        Self {
            aliases,
            ..Default::default()
        }
    }

    /// Ledger of persisted stakes for an event, pending and placed alike
    pub fn committed(event_id: &str, bets: &[BetRecord]) -> Self {
        let mut ledger = Self::with_aliases(event_aliases(event_id, bets));
        for bet in bets.iter().filter(|b| b.event_id == event_id) {
            let stake = finite_or_zero(bet.stake_units().unwrap_or(0.0)).max(0.0);
            if bet.is_pending() {
                ledger.add_pending(bet, stake);
            } else {
                ledger.add_placed(bet, stake);
            }
        }
        ledger
    }

    /// Canonical player key of a bet
    pub fn player_key(&self, bet: &BetRecord) -> Identity {
        self.aliases.resolve(bet.identity())
    }

    /// Record a pending bet's raw stake
    pub fn add_pending(&mut self, bet: &BetRecord, stake: f64) {
        let player = self.player_key(bet);
        accumulate(&mut self.player_pending, player, stake);
        for key in opponent_keys(bet, &self.aliases) {
            accumulate(&mut self.opponent_pending, key, stake);
        }
    }

    /// Record a placed bet's locked-in stake
    pub fn add_placed(&mut self, bet: &BetRecord, stake: f64) {
        let player = self.player_key(bet);
        accumulate(&mut self.player_placed, player, stake);
        for key in opponent_keys(bet, &self.aliases) {
            accumulate(&mut self.opponent_placed, key, stake);
        }
    }

    /// Pending plus placed stake on a player
    pub fn player_total(&self, key: &Identity) -> f64 {
        self.player_pending.get(key).copied().unwrap_or(0.0)
            + self.player_placed.get(key).copied().unwrap_or(0.0)
    }

    /// Pending plus placed stake against an opponent key
    pub fn opponent_total(&self, key: &Identity) -> f64 {
        self.opponent_pending.get(key).copied().unwrap_or(0.0)
            + self.opponent_placed.get(key).copied().unwrap_or(0.0)
    }

    /// Derive per-key scale factors under a cap
    pub fn factors(&self, cap: f64) -> CapFactors {
        let derive = |pending: &HashMap<Identity, f64>, placed: &HashMap<Identity, f64>| {
            pending
                .iter()
                .map(|(key, sum)| {
                    let used = placed.get(key).copied().unwrap_or(0.0);
                    (key.clone(), cap_factor(cap, *sum, used))
                })
                .collect::<HashMap<_, _>>()
        };

        CapFactors {
            player: derive(&self.player_pending, &self.player_placed),
            opponent: derive(&self.opponent_pending, &self.opponent_placed),
            aliases: self.aliases.clone(),
        }
    }
}

/// Per-key scale factors
#[derive(Debug, Clone, Default)]
pub struct CapFactors {
    pub player: HashMap<Identity, f64>,
    pub opponent: HashMap<Identity, f64>,
    aliases: IdentityAliases,
}

impl CapFactors {
    /// Final factor for a bet: the tighter of its player factor and its
    /// most constrained opponent factor
    pub fn for_bet(&self, bet: &BetRecord) -> f64 {
        let player_key = self.aliases.resolve(bet.identity());
        let player = self.player.get(&player_key).copied().unwrap_or(1.0);
        let opponent = opponent_keys(bet, &self.aliases)
            .iter()
            .map(|key| self.opponent.get(key).copied().unwrap_or(1.0))
            .fold(1.0, f64::min);
        player.min(opponent)
    }
}

/// Re-derives every pending stake of an event under exposure caps
#[derive(Debug, Clone)]
pub struct ExposureCapEngine {
    calculator: EdgeCalculator,
    /// Cap per player and per opponent key, in units
    pub exposure_cap: f64,
    /// Cap per bet, in units
    pub max_bet: f64,
}

impl ExposureCapEngine {
    /// Create a new engine
    pub fn new(calculator: EdgeCalculator, exposure_cap: f64, max_bet: f64) -> Self {
        Self {
            calculator,
            exposure_cap,
            max_bet,
        }
    }

    /// Create from StakingConfig
    pub fn from_config(config: &StakingConfig) -> Self {
        Self::new(
            EdgeCalculator::from_config(config),
            config.exposure_cap_units(),
            config.max_bet_units(),
        )
    }

    pub fn calculator(&self) -> &EdgeCalculator {
        &self.calculator
    }

    fn price_pending<'a>(&self, event_id: &str, bets: &'a [BetRecord]) -> Vec<(&'a BetRecord, Pricing)> {
        bets.iter()
            .filter(|b| b.event_id == event_id && b.is_pending())
            .map(|b| {
                let pricing = self.calculator.price(b.p_model, b.market_odds_best_dec, &b.market);
                (b, pricing)
            })
            .collect()
    }

    fn build_ledger(&self, event_id: &str, bets: &[BetRecord], priced: &[(&BetRecord, Pricing)]) -> ExposureLedger {
        let mut ledger = ExposureLedger::with_aliases(event_aliases(event_id, bets));
        for (bet, pricing) in priced {
            ledger.add_pending(bet, finite_or_zero(pricing.raw_stake));
        }
        for bet in bets.iter().filter(|b| b.event_id == event_id && !b.is_pending()) {
            let used = finite_or_zero(bet.stake_units().unwrap_or(0.0)).max(0.0);
            ledger.add_placed(bet, used);
        }
        ledger
    }

    /// Raw-stake exposure ledger for an event snapshot
    pub fn ledger(&self, event_id: &str, bets: &[BetRecord]) -> ExposureLedger {
        let priced = self.price_pending(event_id, bets);
        self.build_ledger(event_id, bets, &priced)
    }

    /// Recompute plans for every PENDING bet of `event_id` in the snapshot
    ///
    /// Pure over the snapshot: the same bets always yield the same plans.
    /// Bets of other events are ignored.
    pub fn recompute(&self, event_id: &str, bets: &[BetRecord]) -> Vec<RecomputedStake> {
        let priced = self.price_pending(event_id, bets);
        let ledger = self.build_ledger(event_id, bets, &priced);
        let factors = ledger.factors(self.exposure_cap);

        priced
            .into_iter()
            .map(|(bet, pricing)| {
                let factor = factors.for_bet(bet);
                let scaled = finite_or_zero(pricing.raw_stake * factor);
                let stake = scaled.min(self.max_bet);

                if factor < 1.0 {
                    tracing::debug!(
                        bet_id = %bet.id,
                        player = %bet.identity(),
                        raw_stake = pricing.raw_stake,
                        factor,
                        "Stake scaled by exposure cap"
                    );
                }

                RecomputedStake {
                    bet_id: bet.id,
                    plan: pricing.into_plan(stake),
                }
            })
            .collect()
    }
}

impl Default for ExposureCapEngine {
    fn default() -> Self {
        Self::from_config(&StakingConfig::default())
    }
}
