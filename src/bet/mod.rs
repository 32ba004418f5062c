//! Bet records
//!
//! The plain record exchanged with the bet store, plus the identity keys
//! used to group exposure.

mod identity;
mod types;

pub use identity::{parse_opponents, Identity, IdentityAliases};
pub use types::{ArchiveStamp, BetId, BetRecord, BetStatus, BetUpdate, NewBet};
