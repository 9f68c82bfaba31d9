//! Data contracts for bullseye match scoring.
//!
//! Matches declare their courses of fire, shooters are plain identities, and
//! score records hold per-stage results plus derived totals.

pub mod caliber;
pub mod enums;
pub mod error;
pub mod ids;
pub mod matches;
pub mod score;
pub mod shooter;
pub mod snapshot;

pub use caliber::Caliber;
pub use enums::{AggregateType, MatchType};
pub use error::{ModelError, Result};
pub use ids::{MatchId, ScoreId, ShooterId};
pub use matches::{Match, MatchTypeInstance};
pub use score::{ScoreKey, ScoreRecord, StageEntry};
pub use shooter::Shooter;
pub use snapshot::MatchSnapshot;
