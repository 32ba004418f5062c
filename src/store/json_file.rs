//! JSON file bet store
//!
//! The whole table is loaded, modified and rewritten per operation. Writes go
//! to a sibling temp file first and are renamed into place, so a failed write
//! leaves the previous file intact.

use super::{BetStore, BetTable, StoreError};
use crate::bet::{ArchiveStamp, BetId, BetRecord, BetUpdate};
use crate::settlement::SettlementResult;
use crate::staking::RecomputedStake;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// Bet store backed by a single JSON file
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn load(&self) -> Result<BetTable, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) if content.trim().is_empty() => Ok(BetTable::new()),
            Ok(content) => Ok(serde_json::from_str(&content)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(BetTable::new()),
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, table: &BetTable) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_string_pretty(table)?;
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        Ok(())
    }

    async fn read<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&BetTable) -> T + Send,
    {
        let _guard = self.lock.lock().await;
        let table = self.load().await?;
        Ok(f(&table))
    }

    async fn mutate<T, F>(&self, f: F) -> Result<T, StoreError>
    where
        F: FnOnce(&mut BetTable) -> Result<T, StoreError> + Send,
        T: Send,
    {
        let _guard = self.lock.lock().await;
        let mut table = self.load().await?;
        let out = f(&mut table)?;
        self.save(&table).await?;
        Ok(out)
    }
}

#[async_trait]
impl BetStore for JsonFileStore {
    async fn upsert(&self, record: BetRecord) -> Result<BetId, StoreError> {
        self.mutate(|t| Ok(t.upsert(record))).await
    }

    async fn get(&self, id: BetId) -> Result<Option<BetRecord>, StoreError> {
        self.read(|t| t.get(id).cloned()).await
    }

    async fn list_event(&self, event_id: &str) -> Result<Vec<BetRecord>, StoreError> {
        self.read(|t| t.list_event(event_id)).await
    }

    async fn list_all(&self) -> Result<Vec<BetRecord>, StoreError> {
        self.read(|t| t.list_all()).await
    }

    async fn update_inputs(&self, id: BetId, update: &BetUpdate) -> Result<BetRecord, StoreError> {
        self.mutate(|t| t.update_inputs(id, update)).await
    }

    async fn remove(&self, id: BetId) -> Result<Option<BetRecord>, StoreError> {
        self.mutate(|t| Ok(t.remove(id))).await
    }

    async fn write_plans(&self, plans: &[RecomputedStake]) -> Result<(), StoreError> {
        self.mutate(|t| t.write_plans(plans)).await
    }

    async fn write_result(&self, id: BetId, result: Option<SettlementResult>) -> Result<(), StoreError> {
        self.mutate(|t| t.write_result(id, result)).await
    }

    async fn write_archive(&self, stamps: &[(BetId, ArchiveStamp)]) -> Result<(), StoreError> {
        self.mutate(|t| t.write_archive(stamps)).await
    }
}
