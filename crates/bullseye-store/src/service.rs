//! Scorebook - score entry, match edits and report snapshots over a store.
//!
//! Every score written through the scorebook has its totals re-derived from
//! its stages. Match edits that drop an instance or caliber delete the
//! affected scores in the same commit as the match update.

use std::collections::BTreeSet;

use bullseye_core::{MatchConfig, ShooterAverages, averages, normalize, resolve};
use bullseye_model::{
    Caliber, Match, MatchId, MatchSnapshot, ScoreId, ScoreKey, ScoreRecord, ShooterId, StageEntry,
};
use sha2::{Digest, Sha256};
use tracing::{info, info_span, warn};

use crate::batch::WriteBatch;
use crate::error::{Result, StoreError};
use crate::store::{Commit, MatchStore, ScoreFilter, ScoreStore, ShooterStore};

/// A score entry as submitted, before totals are derived.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreDraft {
    pub shooter_id: ShooterId,
    pub match_id: MatchId,
    pub match_type_instance: String,
    pub caliber: Caliber,
    pub stages: Vec<StageEntry>,
}

impl ScoreDraft {
    pub fn key(&self) -> ScoreKey {
        ScoreKey::new(self.match_type_instance.clone(), self.caliber.clone())
    }
}

/// Outcome of a match edit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchUpdate {
    /// Slots the edit removed.
    pub removed: Vec<ScoreKey>,
    pub scores_deleted: usize,
}

/// Service layer over any store implementing the collaborator traits.
#[derive(Debug, Clone)]
pub struct Scorebook<S> {
    store: S,
}

impl<S> Scorebook<S>
where
    S: MatchStore + ShooterStore + ScoreStore + Commit,
{
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Add a new match. Fails if the id is taken.
    pub fn create_match(&self, value: Match) -> Result<()> {
        value.validate()?;
        match self.store.get_match(&value.id) {
            Ok(_) => {
                return Err(StoreError::Conflict {
                    entity: "match",
                    id: value.id.to_string(),
                });
            }
            Err(err) if err.is_not_found() => {}
            Err(err) => return Err(err),
        }
        self.store.commit(WriteBatch::new().put_match(value))?;
        Ok(())
    }

    /// Replace a stored match, deleting scores for every slot it no longer declares.
    pub fn update_match(&self, edited: Match) -> Result<MatchUpdate> {
        edited.validate()?;
        let span = info_span!("update_match", match_id = %edited.id);
        let _guard = span.enter();

        let current = self.store.get_match(&edited.id)?;
        let removed = current.removed_keys(&edited);
        let mut batch = WriteBatch::new().put_match(edited.clone());
        for key in &removed {
            batch = batch.delete_scores(ScoreFilter::for_slot(edited.id.clone(), key.clone()));
        }
        let summary = self.store.commit(batch)?;
        info!(
            removed_slots = removed.len(),
            scores_deleted = summary.scores_deleted,
            "match updated"
        );
        Ok(MatchUpdate {
            removed,
            scores_deleted: summary.scores_deleted,
        })
    }

    /// Delete a match and every score recorded for it.
    pub fn delete_match(&self, id: &MatchId) -> Result<usize> {
        let summary = self.store.commit(
            WriteBatch::new()
                .delete_match(id.clone())
                .delete_scores(ScoreFilter::for_match(id.clone())),
        )?;
        info!(match_id = %id, scores_deleted = summary.scores_deleted, "match deleted");
        Ok(summary.scores_deleted)
    }

    /// Validate, normalize and store a score entry.
    ///
    /// An existing entry for the same shooter and slot is replaced in place.
    pub fn record_score(&self, draft: ScoreDraft) -> Result<ScoreRecord> {
        let match_ = self.store.get_match(&draft.match_id)?;
        self.store.get_shooter(&draft.shooter_id)?;
        let config = slot_config(&match_, &draft.key())?;
        let stages = conform_stages(&config, draft.stages.clone())?;

        let existing = self.store.query_scores(
            &ScoreFilter::for_slot(draft.match_id.clone(), draft.key())
                .with_shooter(draft.shooter_id.clone()),
        )?;
        let id = match existing.first() {
            Some(record) => record.id.clone(),
            None => score_id(&draft)?,
        };

        let mut record = ScoreRecord {
            id,
            shooter_id: draft.shooter_id,
            match_id: draft.match_id,
            caliber: draft.caliber,
            match_type_instance: draft.match_type_instance,
            stages,
            total_score: None,
            total_x_count: None,
            not_shot: true,
        };
        apply_totals(&config, &mut record)?;
        self.store.commit(WriteBatch::new().put_score(record.clone()))?;
        Ok(record)
    }

    /// Replace the stages of a stored score and re-derive its totals.
    pub fn update_score(&self, id: &ScoreId, stages: Vec<StageEntry>) -> Result<ScoreRecord> {
        let mut record = self.store.get_score(id)?;
        let match_ = self.store.get_match(&record.match_id)?;
        let config = slot_config(&match_, &record.key())?;
        record.stages = conform_stages(&config, stages)?;
        apply_totals(&config, &mut record)?;
        self.store.commit(WriteBatch::new().put_score(record.clone()))?;
        Ok(record)
    }

    /// Fetch a match with its scores and the shooters they reference.
    ///
    /// Scores whose shooter is missing are kept; the report shows them by id.
    pub fn match_snapshot(&self, id: &MatchId) -> Result<MatchSnapshot> {
        let match_ = self.store.get_match(id)?;
        let scores = self.store.query_scores(&ScoreFilter::for_match(id.clone()))?;
        let shooter_ids: BTreeSet<&ShooterId> = scores.iter().map(|s| &s.shooter_id).collect();
        let mut shooters = Vec::with_capacity(shooter_ids.len());
        for shooter_id in shooter_ids {
            match self.store.get_shooter(shooter_id) {
                Ok(shooter) => shooters.push(shooter),
                Err(err) if err.is_not_found() => {
                    warn!(match_id = %id, shooter_id = %shooter_id, "score references unknown shooter");
                }
                Err(err) => return Err(err),
            }
        }
        Ok(MatchSnapshot {
            match_,
            shooters,
            scores,
        })
    }

    /// Averages over every score a shooter has recorded.
    pub fn shooter_averages(&self, id: &ShooterId) -> Result<ShooterAverages> {
        self.store.get_shooter(id)?;
        let history = self
            .store
            .query_scores(&ScoreFilter::for_shooter(id.clone()))?;
        let matches = self.store.list_matches()?;
        Ok(averages(&history, &matches))
    }
}

/// Catalog configuration for the slot a score is entered against.
fn slot_config(match_: &Match, key: &ScoreKey) -> Result<MatchConfig> {
    let instance = match_.instance(&key.instance).ok_or_else(|| {
        StoreError::InvalidEntry(format!(
            "match {} has no instance {}",
            match_.id, key.instance
        ))
    })?;
    if !instance.calibers.contains(&key.caliber) {
        return Err(StoreError::InvalidEntry(format!(
            "instance {} of match {} is not fired in {}",
            key.instance, match_.id, key.caliber
        )));
    }
    Ok(resolve(&instance.match_type))
}

/// Put submitted stages in catalog order, filling absent stages with blanks.
///
/// Types outside the catalog keep the stages as submitted.
fn conform_stages(config: &MatchConfig, stages: Vec<StageEntry>) -> Result<Vec<StageEntry>> {
    if config.entry_stages.is_empty() {
        return Ok(stages);
    }
    let mut seen = BTreeSet::new();
    for stage in &stages {
        if !config.has_stage(&stage.name) {
            return Err(StoreError::InvalidEntry(format!(
                "unknown stage {}",
                stage.name
            )));
        }
        if !seen.insert(stage.name.as_str()) {
            return Err(StoreError::InvalidEntry(format!(
                "stage {} entered twice",
                stage.name
            )));
        }
    }
    Ok(config
        .entry_stages
        .iter()
        .map(|name| {
            stages
                .iter()
                .find(|stage| stage.name == *name)
                .cloned()
                .unwrap_or_else(|| StageEntry::blank(*name))
        })
        .collect())
}

fn apply_totals(config: &MatchConfig, record: &mut ScoreRecord) -> Result<()> {
    let totals = normalize(&record.stages);
    if let Some(total) = totals.total_score
        && config.max_score > 0
        && total > config.max_score
    {
        return Err(StoreError::InvalidEntry(format!(
            "total {total} exceeds the maximum of {}",
            config.max_score
        )));
    }
    totals.apply_to(record);
    Ok(())
}

/// Deterministic id for a shooter's slot in a match.
fn score_id(draft: &ScoreDraft) -> Result<ScoreId> {
    let mut hasher = Sha256::new();
    for part in [
        draft.match_id.as_str(),
        draft.shooter_id.as_str(),
        draft.match_type_instance.as_str(),
        draft.caliber.as_str(),
    ] {
        hasher.update(part.as_bytes());
        hasher.update([0u8]);
    }
    let digest = hasher.finalize();
    Ok(ScoreId::new(hex::encode(&digest[..16]))?)
}
