//! Configuration types for stakebook

use crate::telemetry::LogFormat;
use serde::Deserialize;
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub staking: StakingConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub feed: FeedConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Stake sizing and exposure cap configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StakingConfig {
    /// Bankroll expressed in units
    #[serde(default = "default_bankroll_units")]
    pub bankroll_units: f64,

    /// Fraction of full Kelly to stake (0.25 = quarter Kelly)
    #[serde(default = "default_kelly_fraction")]
    pub kelly_fraction: f64,

    /// Hard cap on any single stake as a fraction of bankroll
    #[serde(default = "default_max_bet_frac")]
    pub max_bet_frac: f64,

    /// Cap on cumulative stake per player and per opponent as a fraction of bankroll
    #[serde(default = "default_cap_fraction")]
    pub cap_fraction: f64,

    /// Edge below which a bet is flagged as thin. Never gates staking.
    #[serde(default = "default_min_edge")]
    pub min_edge: f64,

    /// Per-market stake multipliers
    #[serde(default)]
    pub multipliers: MarketMultipliers,
}

fn default_bankroll_units() -> f64 {
    500.0
}
fn default_kelly_fraction() -> f64 {
    0.25
}
fn default_max_bet_frac() -> f64 {
    0.10
}
fn default_cap_fraction() -> f64 {
    0.15
}
fn default_min_edge() -> f64 {
    0.04
}

impl Default for StakingConfig {
    fn default() -> Self {
        Self {
            bankroll_units: 500.0,
            kelly_fraction: 0.25,
            max_bet_frac: 0.10,
            cap_fraction: 0.15,
            min_edge: 0.04,
            multipliers: MarketMultipliers::default(),
        }
    }
}

impl StakingConfig {
    /// Largest stake any single bet may carry
    pub fn max_bet_units(&self) -> f64 {
        self.max_bet_frac * self.bankroll_units
    }

    /// Exposure cap per player or opponent key
    pub fn exposure_cap_units(&self) -> f64 {
        self.cap_fraction * self.bankroll_units
    }
}

/// Stake multipliers applied to the raw Kelly stake by market
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct MarketMultipliers {
    #[serde(default = "default_multiplier")]
    pub default: f64,
    #[serde(default = "default_matchup2_multiplier")]
    pub matchup2: f64,
    #[serde(default = "default_matchup3_multiplier")]
    pub matchup3: f64,
}

fn default_multiplier() -> f64 {
    1.0
}
fn default_matchup2_multiplier() -> f64 {
    0.7
}
fn default_matchup3_multiplier() -> f64 {
    0.6
}

impl Default for MarketMultipliers {
    fn default() -> Self {
        Self {
            default: 1.0,
            matchup2: 0.7,
            matchup3: 0.6,
        }
    }
}

/// Bet record store configuration
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// JSON file holding every bet record
    #[serde(default = "default_store_path")]
    pub path: PathBuf,
}

fn default_store_path() -> PathBuf {
    PathBuf::from("./bets.json")
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Results feed configuration
#[derive(Debug, Clone, Deserialize)]
pub struct FeedConfig {
    /// DataGolf API base URL
    #[serde(default = "default_feed_base_url")]
    pub base_url: String,
    /// Tour code passed to the feed
    #[serde(default = "default_tour")]
    pub tour: String,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_feed_base_url() -> String {
    "https://feeds.datagolf.com".to_string()
}
fn default_tour() -> String {
    "pga".to_string()
}
fn default_api_key_env() -> String {
    "DATAGOLF_API_KEY".to_string()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            base_url: default_feed_base_url(),
            tour: default_tour(),
            api_key_env: default_api_key_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Serve Prometheus metrics on this port when set
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::default(),
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<std::path::Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}
