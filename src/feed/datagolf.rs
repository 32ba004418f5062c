//! DataGolf historical event results

use super::{parse_rows, EventRef, FeedError, ResultsFeed};
use crate::config::FeedConfig;
use crate::settlement::EventResults;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

const EVENTS_PATH: &str = "/historical-event-data/events";

/// Client for DataGolf's historical event data endpoint
pub struct DataGolfFeed {
    base_url: String,
    tour: String,
    api_key: String,
    client: Client,
}

impl DataGolfFeed {
    /// Create a feed with an explicit API key
    pub fn new(config: &FeedConfig, api_key: impl Into<String>) -> Result<Self, FeedError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            tour: config.tour.clone(),
            api_key: api_key.into(),
            client,
        })
    }

    /// Create a feed reading the API key from the configured environment variable
    pub fn from_env(config: &FeedConfig) -> Result<Self, FeedError> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| FeedError::MissingApiKey(config.api_key_env.clone()))?;
        Self::new(config, api_key)
    }

    fn events_url(&self) -> String {
        format!("{}{}", self.base_url, EVENTS_PATH)
    }
}

#[async_trait]
impl ResultsFeed for DataGolfFeed {
    async fn fetch(&self, event: &EventRef) -> Result<EventResults, FeedError> {
        let year = event
            .year
            .ok_or_else(|| FeedError::MissingYear(event.event_id.clone()))?;
        let year = year.to_string();
        let url = self.events_url();

        tracing::debug!(url = %url, event_id = %event.event_id, year = %year, "Fetching event results");

        let response = self
            .client
            .get(&url)
            .query(&[
                ("tour", self.tour.as_str()),
                ("event_id", event.event_id.as_str()),
                ("year", year.as_str()),
                ("file_format", "json"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(FeedError::Status {
                status: response.status().as_u16(),
                event_id: event.event_id.clone(),
            });
        }

        let payload: serde_json::Value = response.json().await?;
        let results = EventResults::from_rows(parse_rows(&payload));

        tracing::info!(
            event_id = %event.event_id,
            rows = results.len(),
            "Fetched event results"
        );

        Ok(results)
    }
}
