//! Results read from a local JSON export

use super::{parse_rows, EventRef, FeedError, ResultsFeed};
use crate::settlement::EventResults;
use async_trait::async_trait;
use std::path::PathBuf;

/// Reads a leaderboard export from disk; the event reference is ignored
pub struct FileFeed {
    path: PathBuf,
}

impl FileFeed {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ResultsFeed for FileFeed {
    async fn fetch(&self, event: &EventRef) -> Result<EventResults, FeedError> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        let payload: serde_json::Value = serde_json::from_str(&content)?;
        let results = EventResults::from_rows(parse_rows(&payload));

        tracing::info!(
            event_id = %event.event_id,
            path = %self.path.display(),
            rows = results.len(),
            "Loaded event results from file"
        );

        Ok(results)
    }
}
