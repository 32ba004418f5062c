//! In-memory bet store

use super::{BetStore, BetTable, StoreError};
use crate::bet::{ArchiveStamp, BetId, BetRecord, BetUpdate};
use crate::settlement::SettlementResult;
use crate::staking::RecomputedStake;
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Bet store held entirely in memory
#[derive(Debug, Default)]
pub struct MemoryStore {
    table: RwLock<BetTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with existing records
    pub fn with_records(records: impl IntoIterator<Item = BetRecord>) -> Self {
        let mut table = BetTable::new();
        for record in records {
            table.upsert(record);
        }
        Self {
            table: RwLock::new(table),
        }
    }
}

#[async_trait]
impl BetStore for MemoryStore {
    async fn upsert(&self, record: BetRecord) -> Result<BetId, StoreError> {
        Ok(self.table.write().await.upsert(record))
    }

    async fn get(&self, id: BetId) -> Result<Option<BetRecord>, StoreError> {
        Ok(self.table.read().await.get(id).cloned())
    }

    async fn list_event(&self, event_id: &str) -> Result<Vec<BetRecord>, StoreError> {
        Ok(self.table.read().await.list_event(event_id))
    }

    async fn list_all(&self) -> Result<Vec<BetRecord>, StoreError> {
        Ok(self.table.read().await.list_all())
    }

    async fn update_inputs(&self, id: BetId, update: &BetUpdate) -> Result<BetRecord, StoreError> {
        self.table.write().await.update_inputs(id, update)
    }

    async fn remove(&self, id: BetId) -> Result<Option<BetRecord>, StoreError> {
        Ok(self.table.write().await.remove(id))
    }

    async fn write_plans(&self, plans: &[RecomputedStake]) -> Result<(), StoreError> {
        self.table.write().await.write_plans(plans)
    }

    async fn write_result(&self, id: BetId, result: Option<SettlementResult>) -> Result<(), StoreError> {
        self.table.write().await.write_result(id, result)
    }

    async fn write_archive(&self, stamps: &[(BetId, ArchiveStamp)]) -> Result<(), StoreError> {
        self.table.write().await.write_archive(stamps)
    }
}
