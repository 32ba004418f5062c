//! stakebook: Stake sizing and settlement for golf wagers
//!
//! This library provides the core components for:
//! - Fractional-Kelly pricing of a model probability against market odds
//! - Whole-event stake recompute under player, opponent and per-bet caps
//! - Settlement with Top-N dead heat proration, manual override and unsettle
//! - Bet stores (memory, JSON file) and results feeds (file, DataGolf)
//! - Realized performance summary
//! - Logging and Prometheus metrics

pub mod bet;
pub mod betslip;
pub mod cli;
pub mod config;
pub mod feed;
pub mod market;
pub mod performance;
pub mod settlement;
pub mod staking;
pub mod store;
pub mod telemetry;
