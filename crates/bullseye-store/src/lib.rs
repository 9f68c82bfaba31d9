//! Storage and score entry for bullseye matches.
//!
//! The [`store`] traits describe keyed access to matches, shooters and
//! scores plus an atomic [`Commit`]. [`InMemoryStore`] implements them and
//! persists to a JSON snapshot. [`Scorebook`] layers score entry and
//! cascading match edits on top of any implementation.

#![deny(unsafe_code)]

pub mod batch;
pub mod error;
pub mod memory;
pub mod service;
pub mod store;

pub use batch::{CommitSummary, WriteBatch, WriteOp};
pub use error::{Result, StoreError};
pub use memory::{InMemoryStore, StoreSnapshot};
pub use service::{MatchUpdate, ScoreDraft, Scorebook};
pub use store::{Commit, MatchStore, ScoreFilter, ScoreStore, ShooterStore};
