//! WriteBatch - group writes for an atomic commit.
//!
//! ## Example
//!
//! ```ignore
//! let batch = WriteBatch::new()
//!     .put_match(edited)
//!     .delete_scores(ScoreFilter::for_slot(match_id, removed_key));
//! store.commit(batch)?;
//! ```

use bullseye_model::{Match, MatchId, ScoreRecord};

use crate::store::ScoreFilter;

#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    PutMatch(Match),
    /// Fails the whole batch if the match does not exist.
    DeleteMatch(MatchId),
    PutScore(ScoreRecord),
    DeleteScores(ScoreFilter),
}

/// Ordered list of writes applied together by [`crate::Commit::commit`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn put_match(mut self, value: Match) -> Self {
        self.ops.push(WriteOp::PutMatch(value));
        self
    }

    #[must_use]
    pub fn delete_match(mut self, id: MatchId) -> Self {
        self.ops.push(WriteOp::DeleteMatch(id));
        self
    }

    #[must_use]
    pub fn put_score(mut self, value: ScoreRecord) -> Self {
        self.ops.push(WriteOp::PutScore(value));
        self
    }

    #[must_use]
    pub fn delete_scores(mut self, filter: ScoreFilter) -> Self {
        self.ops.push(WriteOp::DeleteScores(filter));
        self
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }
}

/// What a committed batch changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub matches_written: usize,
    pub matches_deleted: usize,
    pub scores_written: usize,
    pub scores_deleted: usize,
}
