//! Betslip service
//!
//! Drives the staking and settlement engines against a bet store. Every
//! mutation of an event's bets is followed by a whole-event recompute of the
//! pending stakes, with the event's lock held from mutation to write.
//!
//! Once an event is played its placed bets are archived off the slip into the
//! event's history, stamped with the event name and year used for grading.
//! Finalizing an archived event locks its results.

mod locks;

pub use locks::EventLocks;

use crate::bet::{ArchiveStamp, BetId, BetRecord, BetStatus, BetUpdate, NewBet};
use crate::config::StakingConfig;
use crate::feed::{EventRef, FeedError, ResultsFeed};
use crate::settlement::{EventResults, SettlementEngine, SettlementError, SettlementResult};
use crate::staking::{ExposureCapEngine, ExposureLedger, RecomputedStake};
use crate::store::{BetStore, StoreError};
use crate::telemetry::{increment_counter, set_gauge, CounterMetric, GaugeMetric};
use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;

/// Betslip errors
#[derive(Debug, Error)]
pub enum BetslipError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Settlement(#[from] SettlementError),
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error("Bet not found: {0}")]
    NotFound(BetId),
    #[error("Bet {0} has not been placed")]
    NotPlaced(BetId),
    #[error("Model probability must be in [0, 1], got {0}")]
    InvalidProbability(f64),
    #[error("Bet {0} is archived")]
    Archived(BetId),
    #[error("Event {0} has no archived bets")]
    NotArchived(String),
    #[error("Event {0} is finalized")]
    Finalized(String),
}

/// Outcome of grading one event
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GradeReport {
    /// Bets given a result, with that result
    pub settled: Vec<(BetId, SettlementResult)>,
    /// Placed, unsettled bets the results could not resolve
    pub skipped: Vec<BetId>,
}

/// Outcome of archiving one event's placed bets
#[derive(Debug, Clone, PartialEq)]
pub struct ArchiveReport {
    pub event_id: String,
    /// Event label, e.g. "The Masters 2025"
    pub label: String,
    /// Bets moved off the slip by this call
    pub archived: usize,
    /// Pending bets left on the slip
    pub left_pending: usize,
}

/// Stake-sizing and settlement service over a bet store
pub struct Betslip {
    store: Arc<dyn BetStore>,
    engine: ExposureCapEngine,
    settlement: SettlementEngine,
    locks: EventLocks,
    min_edge: f64,
}

impl Betslip {
    pub fn new(store: Arc<dyn BetStore>, config: &StakingConfig) -> Self {
        Self::with_engine(store, ExposureCapEngine::from_config(config), config.min_edge)
    }

    pub fn with_engine(store: Arc<dyn BetStore>, engine: ExposureCapEngine, min_edge: f64) -> Self {
        Self {
            store,
            engine,
            settlement: SettlementEngine::new(),
            locks: EventLocks::new(),
            min_edge,
        }
    }

    pub fn engine(&self) -> &ExposureCapEngine {
        &self.engine
    }

    pub fn store(&self) -> &Arc<dyn BetStore> {
        &self.store
    }

    async fn require(&self, id: BetId) -> Result<BetRecord, BetslipError> {
        self.store.get(id).await?.ok_or(BetslipError::NotFound(id))
    }

    /// Snapshot, recompute and write plans; the caller holds the event lock
    async fn recompute_locked(&self, event_id: &str) -> Result<Vec<RecomputedStake>, BetslipError> {
        let snapshot = self.store.list_event(event_id).await?;
        let plans = self.engine.recompute(event_id, &snapshot);
        self.store.write_plans(&plans).await?;

        let pending_total: f64 = plans.iter().map(|p| p.plan.stake_units).sum();
        increment_counter(CounterMetric::Recomputes, 1);
        set_gauge(GaugeMetric::PendingStakeUnits, event_id, pending_total);

        tracing::info!(
            event_id,
            pending = plans.len(),
            pending_stake_units = pending_total,
            "Recomputed event stakes"
        );

        Ok(plans)
    }

    fn flag_low_edge(&self, bet: &BetRecord) {
        if let Some(plan) = bet.plan {
            if !plan.is_value(self.min_edge) {
                tracing::warn!(
                    bet_id = %bet.id,
                    player = %bet.player_name,
                    market = %bet.market,
                    edge = plan.edge_prob,
                    min_edge = self.min_edge,
                    "Bet edge below value threshold"
                );
            }
        }
    }

    fn require_open(bet: &BetRecord) -> Result<(), BetslipError> {
        if bet.is_final() {
            return Err(BetslipError::Finalized(bet.event_id.clone()));
        }
        Ok(())
    }

    /// Add a bet (or match an existing duplicate) and recompute its event
    ///
    /// A newly inserted bet is removed again if the recompute fails.
    pub async fn add(&self, bet: NewBet) -> Result<BetRecord, BetslipError> {
        if let Some(p) = bet.p_model.filter(|p| !(0.0..=1.0).contains(p)) {
            return Err(BetslipError::InvalidProbability(p));
        }

        let record = bet.into_record();
        let (record_id, event_id) = (record.id, record.event_id.clone());
        let _guard = self.locks.acquire(&event_id).await;

        let id = self.store.upsert(record).await?;
        if let Err(e) = self.recompute_locked(&event_id).await {
            if id == record_id {
                if let Err(cleanup) = self.store.remove(id).await {
                    tracing::error!(bet_id = %id, error = %cleanup, "Failed to roll back added bet");
                }
            }
            return Err(e);
        }

        let stored = self.require(id).await?;
        tracing::info!(bet_id = %id, event_id = %event_id, player = %stored.player_name, "Bet added");
        self.flag_low_edge(&stored);
        Ok(stored)
    }

    /// Edit odds, book or status and recompute the bet's event
    pub async fn update(&self, id: BetId, update: &BetUpdate) -> Result<BetRecord, BetslipError> {
        let event_id = self.require(id).await?.event_id;
        let _guard = self.locks.acquire(&event_id).await;

        if self.require(id).await?.is_archived() {
            return Err(BetslipError::Archived(id));
        }
        self.store.update_inputs(id, update).await?;
        self.recompute_locked(&event_id).await?;

        let stored = self.require(id).await?;
        tracing::info!(bet_id = %id, status = ?stored.status, "Bet updated");
        if stored.status == BetStatus::Pending {
            self.flag_low_edge(&stored);
        }
        Ok(stored)
    }

    /// Remove a bet and recompute its event; `None` when the id is unknown
    pub async fn remove(&self, id: BetId) -> Result<Option<BetRecord>, BetslipError> {
        let Some(existing) = self.store.get(id).await? else {
            return Ok(None);
        };
        let _guard = self.locks.acquire(&existing.event_id).await;

        if existing.is_archived() {
            return Err(BetslipError::Archived(id));
        }
        let removed = self.store.remove(id).await?;
        if removed.is_some() {
            self.recompute_locked(&existing.event_id).await?;
            tracing::info!(bet_id = %id, event_id = %existing.event_id, "Bet removed");
        }
        Ok(removed)
    }

    /// Recompute every pending stake of an event
    pub async fn recompute(&self, event_id: &str) -> Result<Vec<RecomputedStake>, BetslipError> {
        let _guard = self.locks.acquire(event_id).await;
        self.recompute_locked(event_id).await
    }

    /// Bets of one event, or all bets, oldest first
    pub async fn list(&self, event_id: Option<&str>) -> Result<Vec<BetRecord>, BetslipError> {
        let bets = match event_id {
            Some(event_id) => self.store.list_event(event_id).await?,
            None => self.store.list_all().await?,
        };
        Ok(bets)
    }

    /// Bets still on the slip: everything not yet archived
    pub async fn slip(&self, event_id: Option<&str>) -> Result<Vec<BetRecord>, BetslipError> {
        let mut bets = self.list(event_id).await?;
        bets.retain(|b| !b.is_archived());
        Ok(bets)
    }

    /// Archived bets, the event history
    pub async fn history(&self, event_id: Option<&str>) -> Result<Vec<BetRecord>, BetslipError> {
        let mut bets = self.list(event_id).await?;
        bets.retain(BetRecord::is_archived);
        Ok(bets)
    }

    /// Move an event's placed bets off the slip into its history
    ///
    /// Bets archived earlier are re-stamped with the given name and year, keeping
    /// their archive time. Pending bets stay on the slip. Archived bets still count
    /// as placed exposure for the event.
    pub async fn archive(
        &self,
        event_id: &str,
        event_name: Option<String>,
        event_year: Option<i32>,
    ) -> Result<ArchiveReport, BetslipError> {
        let _guard = self.locks.acquire(event_id).await;
        let snapshot = self.store.list_event(event_id).await?;
        if snapshot.iter().any(BetRecord::is_final) {
            return Err(BetslipError::Finalized(event_id.to_string()));
        }

        let fresh = ArchiveStamp::new(event_name, event_year);
        let mut stamps = Vec::new();
        let mut archived = 0;
        for bet in snapshot.iter().filter(|b| b.status == BetStatus::Placed) {
            let stamp = match &bet.archive {
                Some(existing) => ArchiveStamp {
                    event_name: fresh.event_name.clone().or_else(|| existing.event_name.clone()),
                    event_year: fresh.event_year.or(existing.event_year),
                    ..existing.clone()
                },
                None => {
                    archived += 1;
                    fresh.clone()
                }
            };
            stamps.push((bet.id, stamp));
        }
        self.store.write_archive(&stamps).await?;

        let label = stamps
            .first()
            .map(|(_, stamp)| stamp.label(event_id))
            .unwrap_or_else(|| fresh.label(event_id));
        let report = ArchiveReport {
            event_id: event_id.to_string(),
            label,
            archived,
            left_pending: snapshot.iter().filter(|b| b.is_pending()).count(),
        };

        tracing::info!(
            event_id,
            label = %report.label,
            archived = report.archived,
            left_pending = report.left_pending,
            "Archived placed bets"
        );

        Ok(report)
    }

    /// Lock (or with `is_final = false`, unlock) an archived event's results
    ///
    /// Returns the number of archived bets affected.
    pub async fn finalize(&self, event_id: &str, is_final: bool) -> Result<usize, BetslipError> {
        let _guard = self.locks.acquire(event_id).await;
        let stamps: Vec<_> = self
            .store
            .list_event(event_id)
            .await?
            .into_iter()
            .filter_map(|bet| {
                bet.archive
                    .map(|stamp| (bet.id, ArchiveStamp { is_final, ..stamp }))
            })
            .collect();

        if stamps.is_empty() {
            return Err(BetslipError::NotArchived(event_id.to_string()));
        }
        self.store.write_archive(&stamps).await?;

        tracing::info!(event_id, is_final, bets = stamps.len(), "Event finalization changed");
        Ok(stamps.len())
    }

    /// Results reference for an event, taking the year from its archive when not given
    pub async fn event_ref(&self, event_id: &str, year: Option<i32>) -> Result<EventRef, BetslipError> {
        let year = match year {
            Some(year) => Some(year),
            None => self
                .store
                .list_event(event_id)
                .await?
                .iter()
                .find_map(|b| b.archive.as_ref().and_then(|a| a.event_year)),
        };
        Ok(EventRef::new(event_id, year))
    }

    /// Persisted-stake exposure per identity for an event
    pub async fn exposure(&self, event_id: &str) -> Result<ExposureLedger, BetslipError> {
        let snapshot = self.store.list_event(event_id).await?;
        Ok(ExposureLedger::committed(event_id, &snapshot))
    }

    /// Settle a placed bet on the operator's call
    pub async fn settle_manual(
        &self,
        id: BetId,
        is_win: bool,
        dead_heat: Option<f64>,
    ) -> Result<BetRecord, BetslipError> {
        let event_id = self.require(id).await?.event_id;
        let _guard = self.locks.acquire(&event_id).await;

        let bet = self.require(id).await?;
        Self::require_open(&bet)?;
        if bet.status != BetStatus::Placed {
            return Err(BetslipError::NotPlaced(id));
        }

        let result = self.settlement.settle_manual(&bet, is_win, dead_heat)?;
        self.store.write_result(id, Some(result)).await?;
        increment_counter(CounterMetric::BetsSettled, 1);

        tracing::info!(
            bet_id = %id,
            outcome = result.label(),
            return_units = ?result.return_units,
            "Bet settled manually"
        );

        self.require(id).await
    }

    /// Clear a bet's result
    pub async fn unsettle(&self, id: BetId) -> Result<BetRecord, BetslipError> {
        let event_id = self.require(id).await?.event_id;
        let _guard = self.locks.acquire(&event_id).await;

        let mut bet = self.require(id).await?;
        Self::require_open(&bet)?;
        self.settlement.unsettle(&mut bet);
        self.store.write_result(id, bet.result).await?;

        tracing::info!(bet_id = %id, "Bet unsettled");
        Ok(bet)
    }

    /// Settle every placed, unsettled bet of an event from final results
    ///
    /// Bets of a finalized event are left as they are.
    pub async fn grade(&self, event_id: &str, results: &EventResults) -> Result<GradeReport, BetslipError> {
        let _guard = self.locks.acquire(event_id).await;
        let snapshot = self.store.list_event(event_id).await?;
        let mut report = GradeReport::default();

        for bet in snapshot
            .iter()
            .filter(|b| b.status == BetStatus::Placed && !b.is_settled() && !b.is_final())
        {
            let outcome = results
                .input_for(bet)
                .and_then(|input| self.settlement.settle(bet, &input));

            match outcome {
                Some(result) => {
                    self.store.write_result(bet.id, Some(result)).await?;
                    report.settled.push((bet.id, result));
                }
                None => {
                    tracing::debug!(bet_id = %bet.id, market = %bet.market, "Bet left unsettled");
                    report.skipped.push(bet.id);
                }
            }
        }

        increment_counter(CounterMetric::BetsSettled, report.settled.len() as u64);
        increment_counter(CounterMetric::SettlementsSkipped, report.skipped.len() as u64);

        tracing::info!(
            event_id,
            settled = report.settled.len(),
            skipped = report.skipped.len(),
            "Graded event"
        );

        Ok(report)
    }

    /// Fetch results from a feed and grade the event
    pub async fn grade_from_feed(
        &self,
        event: &EventRef,
        feed: &dyn ResultsFeed,
    ) -> Result<GradeReport, BetslipError> {
        let results = feed.fetch(event).await?;
        self.grade(&event.event_id, &results).await
    }

    /// Grade every archived, unfinalized event that still has open bets,
    /// fetching each with its archived year
    pub async fn grade_archived(
        &self,
        feed: &dyn ResultsFeed,
    ) -> Result<Vec<(String, GradeReport)>, BetslipError> {
        let mut open: BTreeMap<String, Option<i32>> = BTreeMap::new();
        for bet in self.history(None).await? {
            if bet.is_settled() || bet.is_final() {
                continue;
            }
            let year = bet.archive.as_ref().and_then(|a| a.event_year);
            let entry = open.entry(bet.event_id).or_insert(None);
            *entry = entry.or(year);
        }

        let mut reports = Vec::with_capacity(open.len());
        for (event_id, year) in open {
            let report = self.grade_from_feed(&EventRef::new(event_id.as_str(), year), feed).await?;
            reports.push((event_id, report));
        }
        Ok(reports)
    }
}
