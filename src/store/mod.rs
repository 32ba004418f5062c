//! Bet record store
//!
//! The engine reads and writes plain bet records through [`BetStore`]. Every
//! method is atomic with respect to the store: a batch of stake plans is
//! applied completely or not at all.

mod json_file;
mod memory;
mod table;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use table::BetTable;

use crate::bet::{ArchiveStamp, BetId, BetRecord, BetUpdate};
use crate::settlement::SettlementResult;
use crate::staking::RecomputedStake;
use async_trait::async_trait;
use thiserror::Error;

/// Store errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// No bet with this id
    #[error("Bet not found: {0}")]
    NotFound(BetId),
    /// Underlying file could not be read or written
    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Stored data could not be (de)serialized
    #[error("Store data error: {0}")]
    Serde(#[from] serde_json::Error),
}

/// Trait for bet record stores
#[async_trait]
pub trait BetStore: Send + Sync {
    /// Insert a record, or return the id of an existing record with the same unique key
    async fn upsert(&self, record: BetRecord) -> Result<BetId, StoreError>;
    /// Fetch one record
    async fn get(&self, id: BetId) -> Result<Option<BetRecord>, StoreError>;
    /// All records of an event, oldest first
    async fn list_event(&self, event_id: &str) -> Result<Vec<BetRecord>, StoreError>;
    /// All records, oldest first
    async fn list_all(&self) -> Result<Vec<BetRecord>, StoreError>;
    /// Apply operator edits and return the updated record
    async fn update_inputs(&self, id: BetId, update: &BetUpdate) -> Result<BetRecord, StoreError>;
    /// Remove a record, returning it if it existed
    async fn remove(&self, id: BetId) -> Result<Option<BetRecord>, StoreError>;
    /// Write a batch of recomputed plans, all or nothing
    async fn write_plans(&self, plans: &[RecomputedStake]) -> Result<(), StoreError>;
    /// Write or clear a settlement result
    async fn write_result(&self, id: BetId, result: Option<SettlementResult>) -> Result<(), StoreError>;
    /// Write a batch of archive stamps, all or nothing
    async fn write_archive(&self, stamps: &[(BetId, ArchiveStamp)]) -> Result<(), StoreError>;
}
