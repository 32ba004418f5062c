//! Stake sizing
//!
//! Fractional Kelly pricing and whole-event exposure caps

mod edge;
mod exposure;
mod types;

pub use edge::EdgeCalculator;
pub use exposure::{cap_factor, CapFactors, ExposureCapEngine, ExposureLedger};
pub use types::{finite_or_zero, Pricing, RecomputedStake, StakePlan};
