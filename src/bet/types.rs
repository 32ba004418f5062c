//! Bet record types

use super::Identity;
use crate::market::Market;
use crate::settlement::SettlementResult;
use crate::staking::StakePlan;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Bet identifier
pub type BetId = Uuid;

/// Lifecycle status of a bet on the slip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BetStatus {
    /// Sized by the engine, not yet wagered
    #[default]
    Pending,
    /// Wagered; its stake is locked-in exposure
    Placed,
}

/// Marks a placed bet as moved off the slip into the event's history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArchiveStamp {
    #[serde(default)]
    pub event_name: Option<String>,
    /// Season the event belongs to; results are fetched for this year
    #[serde(default)]
    pub event_year: Option<i32>,
    pub archived_at: DateTime<Utc>,
    /// Finalized events are locked against grading and manual settlement
    #[serde(default)]
    pub is_final: bool,
}

impl ArchiveStamp {
    pub fn new(event_name: Option<String>, event_year: Option<i32>) -> Self {
        Self {
            event_name,
            event_year,
            archived_at: Utc::now(),
            is_final: false,
        }
    }

    /// Display label, e.g. "The Masters 2025"; falls back to the event id
    pub fn label(&self, event_id: &str) -> String {
        let name = self.event_name.as_deref().unwrap_or(event_id);
        match self.event_year {
            Some(year) => format!("{} {}", name, year),
            None => name.to_string(),
        }
    }
}

/// A bet as held by the store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetRecord {
    pub id: BetId,
    pub event_id: String,
    pub market: Market,
    pub player_name: String,
    #[serde(default)]
    pub dg_id: Option<String>,
    /// Ordered opponent identities; only matchup markets use these
    #[serde(default)]
    pub opponents: Vec<String>,
    #[serde(default)]
    pub market_odds_best_dec: Option<f64>,
    #[serde(default)]
    pub market_book_best: Option<String>,
    #[serde(default)]
    pub p_model: Option<f64>,
    /// Engine-owned sizing; absent until first recompute
    #[serde(default)]
    pub plan: Option<StakePlan>,
    #[serde(default)]
    pub status: BetStatus,
    /// Absent while unsettled
    #[serde(default)]
    pub result: Option<SettlementResult>,
    /// Present once the bet has been archived off the slip
    #[serde(default)]
    pub archive: Option<ArchiveStamp>,
    pub created_at: DateTime<Utc>,
}

impl BetRecord {
    /// Identity of the bet's own player
    pub fn identity(&self) -> Identity {
        Identity::for_player(self.dg_id.as_deref(), &self.player_name)
    }

    /// Parsed opponent identities
    pub fn opponent_identities(&self) -> Vec<Identity> {
        self.opponents.iter().map(|o| Identity::parse(o)).collect()
    }

    /// Persisted stake, if the engine has sized this bet
    pub fn stake_units(&self) -> Option<f64> {
        self.plan.map(|p| p.stake_units)
    }

    /// Key under which duplicate submissions collapse
    pub fn unique_key(&self) -> String {
        let market = self.market.label();
        let opponents = self.opponents.join(", ");
        [
            self.event_id.as_str(),
            market.as_str(),
            self.dg_id.as_deref().unwrap_or(""),
            self.player_name.as_str(),
            opponents.as_str(),
        ]
        .join("|")
    }

    pub fn is_pending(&self) -> bool {
        self.status == BetStatus::Pending
    }

    pub fn is_settled(&self) -> bool {
        self.result.is_some()
    }

    pub fn is_archived(&self) -> bool {
        self.archive.is_some()
    }

    /// Archived into a finalized event
    pub fn is_final(&self) -> bool {
        self.archive.as_ref().is_some_and(|a| a.is_final)
    }

    /// Apply operator-editable inputs. Fields left `None` are untouched.
    pub fn apply(&mut self, update: &BetUpdate) {
        if let Some(odds) = update.odds_dec {
            self.market_odds_best_dec = Some(odds);
        }
        if let Some(book) = &update.book {
            self.market_book_best = Some(book.clone());
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}

/// A bet candidate submitted to the slip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewBet {
    pub event_id: String,
    pub market: Market,
    pub player_name: String,
    #[serde(default)]
    pub dg_id: Option<String>,
    #[serde(default)]
    pub opponents: Vec<String>,
    #[serde(default)]
    pub odds_dec: Option<f64>,
    #[serde(default)]
    pub book: Option<String>,
    #[serde(default)]
    pub p_model: Option<f64>,
}

impl NewBet {
    /// Create a candidate with no odds, book or opponents
    pub fn new(
        event_id: impl Into<String>,
        market: Market,
        player_name: impl Into<String>,
        p_model: f64,
    ) -> Self {
        Self {
            event_id: event_id.into(),
            market,
            player_name: player_name.into(),
            dg_id: None,
            opponents: vec![],
            odds_dec: None,
            book: None,
            p_model: Some(p_model),
        }
    }

    pub fn with_dg_id(mut self, dg_id: impl Into<String>) -> Self {
        self.dg_id = Some(dg_id.into());
        self
    }

    pub fn with_odds(mut self, odds_dec: f64) -> Self {
        self.odds_dec = Some(odds_dec);
        self
    }

    pub fn with_book(mut self, book: impl Into<String>) -> Self {
        self.book = Some(book.into());
        self
    }

    pub fn with_opponents<I, S>(mut self, opponents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.opponents = opponents.into_iter().map(Into::into).collect();
        self
    }

    /// Build a fresh PENDING record
    pub fn into_record(self) -> BetRecord {
        BetRecord {
            id: Uuid::new_v4(),
            event_id: self.event_id,
            market: self.market,
            player_name: self.player_name.trim().to_string(),
            dg_id: self.dg_id.filter(|id| !id.trim().is_empty()),
            opponents: self.opponents,
            market_odds_best_dec: self.odds_dec,
            market_book_best: self.book,
            p_model: self.p_model,
            plan: None,
            status: BetStatus::Pending,
            result: None,
            archive: None,
            created_at: Utc::now(),
        }
    }
}

/// Operator edits to a bet: entered odds, book and status
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BetUpdate {
    pub odds_dec: Option<f64>,
    pub book: Option<String>,
    pub status: Option<BetStatus>,
}

impl BetUpdate {
    pub fn odds(odds_dec: f64) -> Self {
        Self {
            odds_dec: Some(odds_dec),
            ..Default::default()
        }
    }

    pub fn status(status: BetStatus) -> Self {
        Self {
            status: Some(status),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.odds_dec.is_none() && self.book.is_none() && self.status.is_none()
    }
}
