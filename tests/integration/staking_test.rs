//! Exposure cap properties over whole-event recompute

use stakebook::bet::{BetRecord, BetStatus, Identity, NewBet};
use stakebook::config::StakingConfig;
use stakebook::market::Market;
use stakebook::staking::{ExposureCapEngine, ExposureLedger};

const EVENT: &str = "evt-cap";
const CAP: f64 = 75.0;
const MAX_BET: f64 = 50.0;
const EPS: f64 = 1e-9;

/// Small deterministic generator so the scenarios are reproducible
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
        self.0 >> 33
    }

    fn unit(&mut self) -> f64 {
        (self.next() % 10_000) as f64 / 10_000.0
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next() as usize) % items.len()]
    }
}

const PLAYERS: &[&str] = &["A", "B", "C", "D"];

fn random_bet(rng: &mut Lcg) -> BetRecord {
    let markets = [
        Market::TopN(20),
        Market::TopN(10),
        Market::MakeCut,
        Market::MissCut,
        Market::Matchup2,
        Market::Matchup3,
    ];
    let market = rng.pick(&markets).clone();
    let player = *rng.pick(PLAYERS);
    let p = 0.2 + rng.unit() * 0.75;
    let odds = 1.5 + rng.unit() * 8.0;

    let mut bet = NewBet::new(EVENT, market.clone(), player, p).with_odds(odds);
    if market.is_matchup() {
        let opponents: Vec<&str> = PLAYERS.iter().copied().filter(|o| *o != player).take(2).collect();
        bet = bet.with_opponents(opponents);
    }
    bet.into_record()
}

fn apply(engine: &ExposureCapEngine, bets: &mut [BetRecord]) {
    let plans = engine.recompute(EVENT, bets);
    for recomputed in plans {
        if let Some(bet) = bets.iter_mut().find(|b| b.id == recomputed.bet_id) {
            bet.plan = Some(recomputed.plan);
        }
    }
}

fn assert_within_caps(bets: &[BetRecord]) {
    let ledger = ExposureLedger::committed(EVENT, bets);
    for player in PLAYERS {
        let key = Identity::Name(player.to_string());
        assert!(ledger.player_total(&key) <= CAP + EPS, "player {} over cap", player);
        assert!(ledger.opponent_total(&key) <= CAP + EPS, "opponent {} over cap", player);
    }
    for bet in bets {
        let stake = bet.stake_units().unwrap_or(0.0);
        assert!(stake.is_finite() && (0.0..=MAX_BET + EPS).contains(&stake));
    }
}

#[test]
fn test_caps_hold_as_bets_are_added_and_placed() {
    let engine = ExposureCapEngine::from_config(&StakingConfig::default());

    for seed in 1..=25 {
        let mut rng = Lcg(seed);
        let mut bets: Vec<BetRecord> = Vec::new();

        for step in 0..30 {
            bets.push(random_bet(&mut rng));
            apply(&engine, &mut bets);
            assert_within_caps(&bets);

            // Place a bet now and then so later recomputes see used exposure
            if step % 4 == 3 {
                let idx = (rng.next() as usize) % bets.len();
                bets[idx].status = BetStatus::Placed;
                apply(&engine, &mut bets);
                assert_within_caps(&bets);
            }
        }
    }
}

#[test]
fn test_recompute_is_idempotent() {
    let engine = ExposureCapEngine::from_config(&StakingConfig::default());
    let mut rng = Lcg(42);
    let mut bets: Vec<BetRecord> = (0..20).map(|_| random_bet(&mut rng)).collect();
    bets[3].status = BetStatus::Placed;
    bets[7].status = BetStatus::Placed;

    apply(&engine, &mut bets);
    let first = engine.recompute(EVENT, &bets);
    apply(&engine, &mut bets);
    let second = engine.recompute(EVENT, &bets);

    assert_eq!(first.len(), second.len());
    for (a, b) in first.iter().zip(&second) {
        assert_eq!(a.bet_id, b.bet_id);
        assert_eq!(a.plan.stake_units.to_bits(), b.plan.stake_units.to_bits());
    }
}

#[test]
fn test_worked_example_through_engine() {
    let engine = ExposureCapEngine::from_config(&StakingConfig::default());
    let bets = vec![NewBet::new(EVENT, Market::TopN(20), "A", 0.30)
        .with_odds(4.0)
        .into_record()];

    let plans = engine.recompute(EVENT, &bets);
    let plan = plans[0].plan;

    assert!((plan.edge_prob - 0.05).abs() < 1e-12);
    assert!((plan.ev_per_unit - 0.20).abs() < 1e-12);
    assert!((plan.kelly_full - 0.0666666667).abs() < 1e-9);
    assert!((plan.kelly_frac - 0.0166666667).abs() < 1e-9);
    assert!((plan.stake_units - 8.3333333333).abs() < 1e-9);
}
