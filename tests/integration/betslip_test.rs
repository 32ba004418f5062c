//! Betslip end to end over the JSON file store

use stakebook::bet::{parse_opponents, BetStatus, BetUpdate, Identity, NewBet};
use stakebook::betslip::Betslip;
use stakebook::config::StakingConfig;
use stakebook::feed::{EventRef, FileFeed};
use stakebook::market::Market;
use stakebook::performance::PerformanceSummary;
use stakebook::settlement::Outcome;
use stakebook::store::{BetStore, JsonFileStore, MemoryStore};
use std::sync::Arc;

fn file_betslip(dir: &tempfile::TempDir) -> Betslip {
    let store: Arc<dyn BetStore> = Arc::new(JsonFileStore::new(dir.path().join("bets.json")));
    Betslip::new(store, &StakingConfig::default())
}

#[tokio::test]
async fn test_add_place_grade_summary() {
    let dir = tempfile::tempdir().unwrap();
    let slip = file_betslip(&dir);

    let top20 = slip
        .add(
            NewBet::new("ev-14", Market::classify("Top 20"), "Scheffler, Scottie", 0.30)
                .with_dg_id("18417")
                .with_odds(4.0)
                .with_book("fanduel"),
        )
        .await
        .unwrap();
    let make_cut = slip
        .add(
            NewBet::new("ev-14", Market::classify("make_cut"), "Doe, Jane", 0.85)
                .with_dg_id("100")
                .with_odds(1.4),
        )
        .await
        .unwrap();

    slip.update(top20.id, &BetUpdate::status(BetStatus::Placed)).await.unwrap();
    slip.update(make_cut.id, &BetUpdate::status(BetStatus::Placed)).await.unwrap();

    let results_path = dir.path().join("results.json");
    std::fs::write(
        &results_path,
        r#"{"results": [
            {"dg_id": 18417, "fin_text": "T18", "made_cut": 1},
            {"dg_id": 1, "fin_text": "T18", "made_cut": 1},
            {"dg_id": 2, "fin_text": "T18", "made_cut": 1},
            {"dg_id": 3, "fin_text": "T18", "made_cut": 1},
            {"dg_id": 4, "fin_text": "T18", "made_cut": 1},
            {"dg_id": 5, "fin_text": "T18", "made_cut": 1},
            {"dg_id": 100, "fin_text": "CUT", "made_cut": 0}
        ]}"#,
    )
    .unwrap();

    let report = slip
        .grade_from_feed(&EventRef::new("ev-14", Some(2025)), &FileFeed::new(&results_path))
        .await
        .unwrap();
    assert_eq!(report.settled.len(), 2);
    assert!(report.skipped.is_empty());

    let stored = slip.store().get(top20.id).await.unwrap().unwrap();
    let result = stored.result.unwrap();
    let stake = stored.stake_units().unwrap();
    assert_eq!(result.outcome, Outcome::Win);
    assert_eq!(result.dead_heat_fraction, Some(0.5));
    assert!((result.return_units.unwrap() - stake * 3.0 * 0.5).abs() < 1e-9);

    let stored = slip.store().get(make_cut.id).await.unwrap().unwrap();
    assert_eq!(stored.result.unwrap().outcome, Outcome::Loss);

    let summary = PerformanceSummary::from_bets(&slip.list(Some("ev-14")).await.unwrap());
    assert_eq!(summary.settled, 2);
    assert_eq!(summary.dead_heat_wins, 1);
}

#[tokio::test]
async fn test_plans_survive_reopen_and_unsettle_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let id = {
        let slip = file_betslip(&dir);
        let bet = slip
            .add(NewBet::new("ev-2", Market::TopN(20), "A", 0.30).with_odds(4.0))
            .await
            .unwrap();
        slip.update(bet.id, &BetUpdate::status(BetStatus::Placed)).await.unwrap();
        bet.id
    };

    let slip = file_betslip(&dir);
    let before = slip.store().get(id).await.unwrap().unwrap();
    assert!((before.stake_units().unwrap() - 8.333333333333334).abs() < 1e-9);

    let settled = slip.settle_manual(id, false, None).await.unwrap();
    assert_eq!(settled.result.unwrap().outcome, Outcome::Loss);

    let after = slip.unsettle(id).await.unwrap();
    assert!(after.result.is_none());
    assert_eq!(after.status, BetStatus::Placed);
    assert_eq!(after.market_odds_best_dec, before.market_odds_best_dec);
    assert!((after.stake_units().unwrap() - before.stake_units().unwrap()).abs() < 1e-12);
}

#[tokio::test]
async fn test_concurrent_adds_respect_player_cap() {
    let store: Arc<dyn BetStore> = Arc::new(MemoryStore::new());
    let slip = Arc::new(Betslip::new(store, &StakingConfig::default()));

    let mut handles = Vec::new();
    for n in [5u32, 10, 15, 20, 25, 30] {
        let slip = Arc::clone(&slip);
        handles.push(tokio::spawn(async move {
            slip.add(NewBet::new("ev-3", Market::TopN(n), "A", 0.9).with_odds(2.0))
                .await
                .unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let exposure = slip.exposure("ev-3").await.unwrap();
    let total = exposure.player_total(&Identity::Name("A".to_string()));
    assert!((total - 75.0).abs() < 1e-9);
}

#[test]
fn test_removal_frees_exposure() {
    tokio_test::block_on(async {
        let slip = Betslip::new(Arc::new(MemoryStore::new()), &StakingConfig::default());
        let a = slip
            .add(NewBet::new("ev-4", Market::TopN(20), "A", 0.9).with_odds(2.0))
            .await
            .unwrap();
        let b = slip
            .add(NewBet::new("ev-4", Market::TopN(10), "A", 0.9).with_odds(2.0))
            .await
            .unwrap();
        let b_before = slip.store().get(b.id).await.unwrap().unwrap();
        assert!((b_before.stake_units().unwrap() - 37.5).abs() < 1e-9);

        slip.remove(a.id).await.unwrap();
        let b_after = slip.store().get(b.id).await.unwrap().unwrap();
        assert!((b_after.stake_units().unwrap() - 50.0).abs() < 1e-9);
    });
}

#[tokio::test]
async fn test_name_listed_fades_cap_miss_cut_on_same_player() {
    let dir = tempfile::tempdir().unwrap();
    let slip = file_betslip(&dir);

    // Two matchups fade Scheffler, entered by name as the CLI does
    for (player, dg_id) in [("Rory McIlroy", "28237"), ("Jon Rahm", "19195")] {
        let bet = slip
            .add(
                NewBet::new("ev-5", Market::Matchup2, player, 0.9)
                    .with_dg_id(dg_id)
                    .with_opponents(parse_opponents("Scottie Scheffler"))
                    .with_odds(2.0),
            )
            .await
            .unwrap();
        slip.update(bet.id, &BetUpdate::status(BetStatus::Placed)).await.unwrap();
    }

    let miss = slip
        .add(
            NewBet::new("ev-5", Market::MissCut, "Scottie Scheffler", 0.6)
                .with_dg_id("18417")
                .with_odds(3.0),
        )
        .await
        .unwrap();
    assert_eq!(miss.stake_units(), Some(0.0));

    let exposure = slip.exposure("ev-5").await.unwrap();
    let scheffler = Identity::Dg("18417".to_string());
    assert!((exposure.opponent_total(&scheffler) - 75.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_archive_grade_with_stored_year_and_finalize() {
    let dir = tempfile::tempdir().unwrap();
    let slip = file_betslip(&dir);

    let bet = slip
        .add(NewBet::new("ev-6", Market::MakeCut, "Jon Rahm", 0.85).with_dg_id("19195").with_odds(1.5))
        .await
        .unwrap();
    slip.update(bet.id, &BetUpdate::status(BetStatus::Placed)).await.unwrap();
    let report = slip
        .archive("ev-6", Some("The Open".to_string()), Some(2025))
        .await
        .unwrap();
    assert_eq!(report.archived, 1);
    assert!(slip.slip(Some("ev-6")).await.unwrap().is_empty());

    // A fresh service over the same file sees the archived year
    let slip = file_betslip(&dir);
    let event = slip.event_ref("ev-6", None).await.unwrap();
    assert_eq!(event, EventRef::new("ev-6", Some(2025)));

    let results_path = dir.path().join("open.json");
    std::fs::write(&results_path, r#"[{"dg_id": 19195, "finish_position": 40, "made_cut": true}]"#).unwrap();
    let graded = slip
        .grade_from_feed(&event, &FileFeed::new(&results_path))
        .await
        .unwrap();
    assert_eq!(graded.settled.len(), 1);

    slip.finalize("ev-6", true).await.unwrap();
    let summary = PerformanceSummary::from_bets(&slip.history(None).await.unwrap());
    let line = &summary.by_event["ev-6"];
    assert_eq!(line.label, "The Open 2025");
    assert_eq!(line.wins, 1);
    assert!(line.finalized);
    assert!(line.net_units > rust_decimal::Decimal::ZERO);
}
