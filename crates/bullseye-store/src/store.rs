//! Collaborator traits for keyed storage of matches, shooters and scores.

use bullseye_model::{
    Match, MatchId, ScoreId, ScoreKey, ScoreRecord, Shooter, ShooterId,
};

use crate::batch::{CommitSummary, WriteBatch};
use crate::error::Result;

/// Selects score records. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoreFilter {
    pub match_id: Option<MatchId>,
    pub shooter_id: Option<ShooterId>,
    pub key: Option<ScoreKey>,
}

impl ScoreFilter {
    pub fn for_match(match_id: MatchId) -> Self {
        Self {
            match_id: Some(match_id),
            ..Self::default()
        }
    }

    pub fn for_shooter(shooter_id: ShooterId) -> Self {
        Self {
            shooter_id: Some(shooter_id),
            ..Self::default()
        }
    }

    /// One (instance, caliber) slot of a match, across all shooters.
    pub fn for_slot(match_id: MatchId, key: ScoreKey) -> Self {
        Self {
            match_id: Some(match_id),
            key: Some(key),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_shooter(mut self, shooter_id: ShooterId) -> Self {
        self.shooter_id = Some(shooter_id);
        self
    }

    pub fn matches(&self, record: &ScoreRecord) -> bool {
        self.match_id
            .as_ref()
            .is_none_or(|id| record.match_id == *id)
            && self
                .shooter_id
                .as_ref()
                .is_none_or(|id| record.shooter_id == *id)
            && self.key.as_ref().is_none_or(|key| {
                record.match_type_instance == key.instance && record.caliber == key.caliber
            })
    }
}

pub trait MatchStore {
    fn get_match(&self, id: &MatchId) -> Result<Match>;
    fn list_matches(&self) -> Result<Vec<Match>>;
    /// Insert or replace.
    fn put_match(&self, value: Match) -> Result<()>;
    fn delete_match(&self, id: &MatchId) -> Result<()>;
}

pub trait ShooterStore {
    fn get_shooter(&self, id: &ShooterId) -> Result<Shooter>;
    fn list_shooters(&self) -> Result<Vec<Shooter>>;
    /// Insert or replace.
    fn put_shooter(&self, value: Shooter) -> Result<()>;
}

pub trait ScoreStore {
    fn query_scores(&self, filter: &ScoreFilter) -> Result<Vec<ScoreRecord>>;
    fn get_score(&self, id: &ScoreId) -> Result<ScoreRecord>;
    /// Insert or replace.
    fn put_score(&self, value: ScoreRecord) -> Result<()>;
    /// Returns the number of records removed.
    fn delete_scores(&self, filter: &ScoreFilter) -> Result<usize>;
}

/// Apply a batch of writes as one unit: either every write lands or none do.
pub trait Commit {
    fn commit(&self, batch: WriteBatch) -> Result<CommitSummary>;
}
