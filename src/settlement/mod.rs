//! Settlement module
//!
//! Turns finish and cut data into win/loss results and realized returns,
//! with dead heat proration for Top-N markets.

mod engine;
mod results;
mod types;

pub use engine::{dead_heat_fraction, SettlementEngine};
pub use results::{EventResults, FinishRow};
pub use types::{Outcome, SettlementError, SettlementInput, SettlementResult};
