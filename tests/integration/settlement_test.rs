//! Settlement scenarios

use stakebook::bet::{BetRecord, BetStatus, NewBet};
use stakebook::market::Market;
use stakebook::settlement::{
    EventResults, FinishRow, Outcome, SettlementEngine, SettlementInput,
};
use stakebook::staking::StakePlan;

fn placed(market: Market, dg_id: &str, stake: f64, odds: Option<f64>) -> BetRecord {
    let mut bet = NewBet::new("evt", market, format!("Player {}", dg_id), 0.3)
        .with_dg_id(dg_id)
        .into_record();
    bet.market_odds_best_dec = odds;
    bet.plan = Some(StakePlan {
        stake_units: stake,
        ..Default::default()
    });
    bet.status = BetStatus::Placed;
    bet
}

fn finish(dg_id: &str, pos: Option<u32>, made_cut: Option<bool>) -> FinishRow {
    FinishRow {
        dg_id: Some(dg_id.to_string()),
        player_name: None,
        finish_position: pos,
        made_cut,
    }
}

#[test]
fn test_top20_dead_heat_from_leaderboard() {
    // Six players tied for 18th: three paid places remain for six players.
    let mut rows: Vec<FinishRow> = (1..=6).map(|i| finish(&i.to_string(), Some(18), Some(true))).collect();
    rows.push(finish("7", Some(25), Some(true)));
    let results = EventResults::from_rows(rows);
    let engine = SettlementEngine::new();

    let bet = placed(Market::TopN(20), "1", 10.0, Some(5.0));
    let input = results.input_for(&bet).unwrap();
    assert_eq!(input.tie_count_at_position, 6);

    let result = engine.settle(&bet, &input).unwrap();
    assert_eq!(result.outcome, Outcome::Win);
    assert!((result.return_units.unwrap() - 20.0).abs() < 1e-9);
    assert_eq!(result.label(), "W - DHR");

    let outside = placed(Market::TopN(20), "7", 10.0, Some(5.0));
    let result = engine.settle(&outside, &results.input_for(&outside).unwrap()).unwrap();
    assert_eq!(result.outcome, Outcome::Loss);
    assert_eq!(result.return_units, Some(-10.0));
}

#[test]
fn test_cut_markets_and_unknown_cut() {
    let engine = SettlementEngine::new();
    let made = SettlementInput {
        finish_position: Some(40),
        tie_count_at_position: 1,
        made_cut: Some(true),
    };
    let unknown = SettlementInput {
        made_cut: None,
        ..made
    };

    let make_cut = placed(Market::MakeCut, "1", 4.0, Some(1.5));
    let miss_cut = placed(Market::MissCut, "1", 4.0, Some(3.0));

    let won = engine.settle(&make_cut, &made).unwrap();
    assert!((won.return_units.unwrap() - 2.0).abs() < 1e-9);
    assert_eq!(engine.settle(&miss_cut, &made).unwrap().return_units, Some(-4.0));
    assert!(engine.settle(&make_cut, &unknown).is_none());
    assert!(engine.settle(&miss_cut, &unknown).is_none());
}

#[test]
fn test_matchups_are_never_auto_settled() {
    let engine = SettlementEngine::new();
    let mut bet = placed(Market::Matchup2, "1", 5.0, Some(1.9));
    bet.opponents = vec!["dg:2".to_string()];
    let input = SettlementInput {
        finish_position: Some(1),
        tie_count_at_position: 1,
        made_cut: Some(true),
    };
    assert!(engine.settle(&bet, &input).is_none());
}

#[test]
fn test_manual_override_then_unsettle() {
    let engine = SettlementEngine::new();
    let mut bet = placed(Market::TopN(20), "1", 10.0, Some(5.0));
    let before = bet.clone();

    bet.result = Some(engine.settle_manual(&bet, true, Some(3.0 / 6.0)).unwrap());
    assert!((bet.result.unwrap().return_units.unwrap() - 20.0).abs() < 1e-9);

    engine.unsettle(&mut bet);
    assert_eq!(bet, before);
}
