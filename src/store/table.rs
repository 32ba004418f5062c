//! In-memory table of bet records shared by the store implementations

use super::StoreError;
use crate::bet::{ArchiveStamp, BetId, BetRecord, BetUpdate};
use crate::settlement::SettlementResult;
use crate::staking::RecomputedStake;
use serde::{Deserialize, Serialize};

/// Flat table of bet records, persisted as a JSON array
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BetTable {
    bets: Vec<BetRecord>,
}

fn sorted(mut bets: Vec<BetRecord>) -> Vec<BetRecord> {
    bets.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
    bets
}

impl BetTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, id: BetId) -> Result<usize, StoreError> {
        self.bets
            .iter()
            .position(|b| b.id == id)
            .ok_or(StoreError::NotFound(id))
    }

    pub fn upsert(&mut self, record: BetRecord) -> BetId {
        let key = record.unique_key();
        if let Some(existing) = self.bets.iter().find(|b| b.unique_key() == key) {
            return existing.id;
        }
        let id = record.id;
        self.bets.push(record);
        id
    }

    pub fn get(&self, id: BetId) -> Option<&BetRecord> {
        self.bets.iter().find(|b| b.id == id)
    }

    pub fn list_event(&self, event_id: &str) -> Vec<BetRecord> {
        sorted(
            self.bets
                .iter()
                .filter(|b| b.event_id == event_id)
                .cloned()
                .collect(),
        )
    }

    pub fn list_all(&self) -> Vec<BetRecord> {
        sorted(self.bets.clone())
    }

    pub fn update_inputs(&mut self, id: BetId, update: &BetUpdate) -> Result<BetRecord, StoreError> {
        let idx = self.position(id)?;
        self.bets[idx].apply(update);
        Ok(self.bets[idx].clone())
    }

    pub fn remove(&mut self, id: BetId) -> Option<BetRecord> {
        let idx = self.bets.iter().position(|b| b.id == id)?;
        Some(self.bets.remove(idx))
    }

    /// Validate every id before touching any record
    pub fn write_plans(&mut self, plans: &[RecomputedStake]) -> Result<(), StoreError> {
        let positions = plans
            .iter()
            .map(|p| self.position(p.bet_id))
            .collect::<Result<Vec<_>, _>>()?;

        for (idx, recomputed) in positions.into_iter().zip(plans) {
            self.bets[idx].plan = Some(recomputed.plan.sanitized());
        }
        Ok(())
    }

    pub fn write_result(&mut self, id: BetId, result: Option<SettlementResult>) -> Result<(), StoreError> {
        let idx = self.position(id)?;
        self.bets[idx].result = result;
        Ok(())
    }

    pub fn write_archive(&mut self, stamps: &[(BetId, ArchiveStamp)]) -> Result<(), StoreError> {
        let positions = stamps
            .iter()
            .map(|(id, _)| self.position(*id))
            .collect::<Result<Vec<_>, _>>()?;

        for (idx, (_, stamp)) in positions.into_iter().zip(stamps) {
            self.bets[idx].archive = Some(stamp.clone());
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.bets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bets.is_empty()
    }
}
