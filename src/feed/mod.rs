//! Results feed module
//!
//! Provides final leaderboards (finish positions and cut status) used to
//! grade placed bets.

mod datagolf;
mod file;
mod rows;

pub use datagolf::DataGolfFeed;
pub use file::FileFeed;
pub use rows::parse_rows;

use crate::settlement::EventResults;
use async_trait::async_trait;
use thiserror::Error;

/// Event to fetch results for
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventRef {
    pub event_id: String,
    pub year: Option<i32>,
}

impl EventRef {
    pub fn new(event_id: impl Into<String>, year: Option<i32>) -> Self {
        Self {
            event_id: event_id.into(),
            year,
        }
    }
}

/// Feed errors
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Results request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Results feed returned HTTP {status} for event {event_id}")]
    Status { status: u16, event_id: String },
    #[error("Results file error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Results payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Missing API key: set {0}")]
    MissingApiKey(String),
    #[error("Event {0} needs a year to fetch results")]
    MissingYear(String),
}

/// Trait for results feed implementations
#[async_trait]
pub trait ResultsFeed: Send + Sync {
    /// Fetch the final results of an event
    async fn fetch(&self, event: &EventRef) -> Result<EventResults, FeedError>;
}
