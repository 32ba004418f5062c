//! Finish data for a completed event

use super::SettlementInput;
use crate::bet::{BetRecord, Identity};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// One player's finish as reported by a results feed
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinishRow {
    #[serde(default)]
    pub dg_id: Option<String>,
    #[serde(default)]
    pub player_name: Option<String>,
    #[serde(default)]
    pub finish_position: Option<u32>,
    #[serde(default)]
    pub made_cut: Option<bool>,
}

/// Indexed finish data plus tie counts for one event
#[derive(Debug, Clone, Default)]
pub struct EventResults {
    rows: Vec<FinishRow>,
    by_identity: HashMap<Identity, usize>,
    tie_counts: HashMap<u32, u32>,
}

impl EventResults {
    /// Index rows by dg id and by name; the first row for a key wins
    pub fn from_rows(rows: Vec<FinishRow>) -> Self {
        let mut by_identity = HashMap::new();
        let mut tie_counts = HashMap::new();

        for (idx, row) in rows.iter().enumerate() {
            if let Some(id) = row.dg_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                by_identity.entry(Identity::Dg(id.to_string())).or_insert(idx);
            }
            if let Some(name) = row.player_name.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
                by_identity.entry(Identity::Name(name.to_string())).or_insert(idx);
            }
            if let Some(pos) = row.finish_position {
                *tie_counts.entry(pos).or_insert(0) += 1;
            }
        }

        Self {
            rows,
            by_identity,
            tie_counts,
        }
    }

    /// Players sharing a finish position; an unknown position counts as untied
    pub fn tie_count(&self, position: u32) -> u32 {
        self.tie_counts.get(&position).copied().unwrap_or(1)
    }

    /// Finish row for a bet's player, by dg id first then by name
    pub fn row_for(&self, bet: &BetRecord) -> Option<&FinishRow> {
        let by_dg = bet
            .dg_id
            .as_ref()
            .and_then(|id| self.by_identity.get(&Identity::Dg(id.clone())));
        let by_name = || self.by_identity.get(&Identity::Name(bet.player_name.clone()));

        by_dg.or_else(by_name).map(|idx| &self.rows[*idx])
    }

    /// Settlement input for a bet, if the feed knows its player
    pub fn input_for(&self, bet: &BetRecord) -> Option<SettlementInput> {
        let row = self.row_for(bet)?;
        Some(SettlementInput {
            finish_position: row.finish_position,
            tie_count_at_position: row.finish_position.map(|p| self.tie_count(p)).unwrap_or(1),
            made_cut: row.made_cut,
        })
    }

    pub fn rows(&self) -> &[FinishRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
