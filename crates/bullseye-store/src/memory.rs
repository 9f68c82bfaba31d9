//! InMemoryStore - BTreeMap-backed store with JSON snapshot persistence.
//!
//! The whole store lives behind one lock. A committed batch is applied to a
//! copy of the state and swapped in only when every write succeeded.
//!
//! # Snapshot Format
//!
//! One JSON document with three arrays:
//!
//! ```json
//! { "matches": [...], "shooters": [...], "scores": [...] }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use bullseye_model::{Match, MatchId, ScoreId, ScoreRecord, Shooter, ShooterId};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::batch::{CommitSummary, WriteBatch, WriteOp};
use crate::error::{Result, StoreError};
use crate::store::{Commit, MatchStore, ScoreFilter, ScoreStore, ShooterStore};

#[derive(Debug, Clone, Default)]
struct StoreState {
    matches: BTreeMap<MatchId, Match>,
    shooters: BTreeMap<ShooterId, Shooter>,
    scores: BTreeMap<ScoreId, ScoreRecord>,
}

impl StoreState {
    fn delete_scores(&mut self, filter: &ScoreFilter) -> usize {
        let before = self.scores.len();
        self.scores.retain(|_, record| !filter.matches(record));
        before - self.scores.len()
    }

    fn apply(&mut self, op: WriteOp, summary: &mut CommitSummary) -> Result<()> {
        match op {
            WriteOp::PutMatch(value) => {
                self.matches.insert(value.id.clone(), value);
                summary.matches_written += 1;
            }
            WriteOp::DeleteMatch(id) => {
                if self.matches.remove(&id).is_none() {
                    return Err(StoreError::not_found("match", id));
                }
                summary.matches_deleted += 1;
            }
            WriteOp::PutScore(value) => {
                self.scores.insert(value.id.clone(), value);
                summary.scores_written += 1;
            }
            WriteOp::DeleteScores(filter) => {
                summary.scores_deleted += self.delete_scores(&filter);
            }
        }
        Ok(())
    }
}

/// On-disk shape of the store.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoreSnapshot {
    #[serde(default)]
    pub matches: Vec<Match>,
    #[serde(default)]
    pub shooters: Vec<Shooter>,
    #[serde(default)]
    pub scores: Vec<ScoreRecord>,
}

/// Clone-friendly via Arc.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    state: Arc<RwLock<StoreState>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_snapshot(snapshot: StoreSnapshot) -> Self {
        let state = StoreState {
            matches: snapshot
                .matches
                .into_iter()
                .map(|m| (m.id.clone(), m))
                .collect(),
            shooters: snapshot
                .shooters
                .into_iter()
                .map(|s| (s.id.clone(), s))
                .collect(),
            scores: snapshot
                .scores
                .into_iter()
                .map(|s| (s.id.clone(), s))
                .collect(),
        };
        Self {
            state: Arc::new(RwLock::new(state)),
        }
    }

    pub fn to_snapshot(&self) -> Result<StoreSnapshot> {
        let state = self.read()?;
        Ok(StoreSnapshot {
            matches: state.matches.values().cloned().collect(),
            shooters: state.shooters.values().cloned().collect(),
            scores: state.scores.values().cloned().collect(),
        })
    }

    /// Load a store from a JSON snapshot. A missing file yields an empty store.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no snapshot found, starting empty");
            return Ok(Self::new());
        }
        let contents = fs::read_to_string(path).map_err(|source| StoreError::io(path, source))?;
        let snapshot: StoreSnapshot =
            serde_json::from_str(&contents).map_err(|source| StoreError::Json {
                path: path.to_path_buf(),
                source,
            })?;
        info!(
            path = %path.display(),
            matches = snapshot.matches.len(),
            shooters = snapshot.shooters.len(),
            scores = snapshot.scores.len(),
            "loaded store snapshot"
        );
        Ok(Self::from_snapshot(snapshot))
    }

    /// Write the store to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<()> {
        let snapshot = self.to_snapshot()?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| StoreError::io(parent, source))?;
        }
        let json = serde_json::to_string_pretty(&snapshot).map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json).map_err(|source| StoreError::io(path, source))?;
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreState>> {
        self.state.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreState>> {
        self.state.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl MatchStore for InMemoryStore {
    fn get_match(&self, id: &MatchId) -> Result<Match> {
        self.read()?
            .matches
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("match", id))
    }

    fn list_matches(&self) -> Result<Vec<Match>> {
        Ok(self.read()?.matches.values().cloned().collect())
    }

    fn put_match(&self, value: Match) -> Result<()> {
        self.write()?.matches.insert(value.id.clone(), value);
        Ok(())
    }

    fn delete_match(&self, id: &MatchId) -> Result<()> {
        self.write()?
            .matches
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| StoreError::not_found("match", id))
    }
}

impl ShooterStore for InMemoryStore {
    fn get_shooter(&self, id: &ShooterId) -> Result<Shooter> {
        self.read()?
            .shooters
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("shooter", id))
    }

    fn list_shooters(&self) -> Result<Vec<Shooter>> {
        Ok(self.read()?.shooters.values().cloned().collect())
    }

    fn put_shooter(&self, value: Shooter) -> Result<()> {
        self.write()?.shooters.insert(value.id.clone(), value);
        Ok(())
    }
}

impl ScoreStore for InMemoryStore {
    fn query_scores(&self, filter: &ScoreFilter) -> Result<Vec<ScoreRecord>> {
        Ok(self
            .read()?
            .scores
            .values()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect())
    }

    fn get_score(&self, id: &ScoreId) -> Result<ScoreRecord> {
        self.read()?
            .scores
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::not_found("score", id))
    }

    fn put_score(&self, value: ScoreRecord) -> Result<()> {
        self.write()?.scores.insert(value.id.clone(), value);
        Ok(())
    }

    fn delete_scores(&self, filter: &ScoreFilter) -> Result<usize> {
        Ok(self.write()?.delete_scores(filter))
    }
}

impl Commit for InMemoryStore {
    fn commit(&self, batch: WriteBatch) -> Result<CommitSummary> {
        let mut guard = self.write()?;
        let mut staged = guard.clone();
        let mut summary = CommitSummary::default();
        for op in batch.into_ops() {
            staged.apply(op, &mut summary)?;
        }
        *guard = staged;
        debug!(?summary, "committed batch");
        Ok(summary)
    }
}
