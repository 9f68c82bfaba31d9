//! Report-consumer payload: per shooter, each score with its subtotals plus
//! the shooter's aggregates.

use std::collections::BTreeMap;

use bullseye_core::{AggregateResult, StageSum, aggregates, resolve, subtotals};
use bullseye_model::{Match, MatchSnapshot, ScoreRecord, Shooter, ShooterId};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    #[serde(rename = "match")]
    pub match_: Match,
    pub shooters: Vec<ShooterReport>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShooterReport {
    pub shooter: Shooter,
    /// Keyed by `"{instance}_{caliber}"`.
    pub scores: BTreeMap<String, ScoreEntry>,
    pub aggregates: BTreeMap<String, AggregateResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub score: ScoreRecord,
    pub subtotals: BTreeMap<String, StageSum>,
}

/// A shooter and the scores of theirs the match still declares.
pub(crate) struct RosterEntry<'a> {
    pub shooter: Shooter,
    pub scores: Vec<&'a ScoreRecord>,
}

/// Shooters with scores in the match, ordered by name then id.
///
/// Scores for slots the match no longer declares are dropped. A score whose
/// shooter is missing from the snapshot is listed under its id.
pub(crate) fn roster(snapshot: &MatchSnapshot) -> Vec<RosterEntry<'_>> {
    let match_ = &snapshot.match_;
    let mut by_shooter: BTreeMap<&ShooterId, Vec<&ScoreRecord>> = BTreeMap::new();
    for record in &snapshot.scores {
        if record.match_id != match_.id || !match_.accepts(&record.key()) {
            debug!(
                score_id = %record.id,
                slot = %record.key(),
                "skipping orphan score"
            );
            continue;
        }
        by_shooter.entry(&record.shooter_id).or_default().push(record);
    }

    let mut entries: Vec<RosterEntry<'_>> = by_shooter
        .into_iter()
        .map(|(id, scores)| RosterEntry {
            shooter: snapshot
                .shooter(id)
                .cloned()
                .unwrap_or_else(|| Shooter::new(id.clone(), id.as_str())),
            scores,
        })
        .collect();
    entries.sort_by(|a, b| {
        a.shooter
            .name
            .to_lowercase()
            .cmp(&b.shooter.name.to_lowercase())
            .then_with(|| a.shooter.id.cmp(&b.shooter.id))
    });
    entries
}

/// Assemble the payload handed to report consumers.
pub fn build_match_report(snapshot: &MatchSnapshot) -> MatchReport {
    let match_ = &snapshot.match_;
    let shooters = roster(snapshot)
        .into_iter()
        .map(|entry| {
            let mut scores = BTreeMap::new();
            for record in &entry.scores {
                let groups = match_
                    .instance(&record.match_type_instance)
                    .map(|instance| resolve(&instance.match_type).subtotal_groups)
                    .unwrap_or_default();
                scores.insert(
                    record.key().to_string(),
                    ScoreEntry {
                        score: (*record).clone(),
                        subtotals: subtotals(&record.stages, groups),
                    },
                );
            }
            let owned: Vec<ScoreRecord> = entry.scores.iter().map(|r| (*r).clone()).collect();
            ShooterReport {
                aggregates: aggregates(&owned, match_),
                shooter: entry.shooter,
                scores,
            }
        })
        .collect();

    MatchReport {
        match_: match_.clone(),
        shooters,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bullseye_model::{
        AggregateType, Caliber, MatchId, MatchType, MatchTypeInstance, ScoreId, StageEntry,
    };
    use chrono::NaiveDate;

    fn record(id: &str, shooter: &str, instance: &str, stages: Vec<StageEntry>) -> ScoreRecord {
        let mut record = ScoreRecord {
            id: ScoreId::new(id).unwrap(),
            shooter_id: ShooterId::new(shooter).unwrap(),
            match_id: MatchId::new("m1").unwrap(),
            caliber: Caliber::from(".22"),
            match_type_instance: instance.to_string(),
            stages,
            total_score: None,
            total_x_count: None,
            not_shot: true,
        };
        bullseye_core::renormalize(&mut record);
        record
    }

    fn snapshot() -> MatchSnapshot {
        MatchSnapshot {
            match_: Match {
                id: MatchId::new("m1").unwrap(),
                name: "Fall 900".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 10, 5).unwrap(),
                location: String::new(),
                match_types: vec![MatchTypeInstance::new(
                    MatchType::NineHundred,
                    "900 A",
                    [".22".into()],
                )],
                aggregate_type: AggregateType::None,
            },
            shooters: vec![
                Shooter::new(ShooterId::new("p1").unwrap(), "zed Last"),
                Shooter::new(ShooterId::new("p2").unwrap(), "Amy First"),
            ],
            scores: vec![
                record(
                    "s1",
                    "p1",
                    "900 A",
                    vec![
                        StageEntry::new("SF1", Some(95), Some(2)),
                        StageEntry::new("SF2", Some(97), Some(4)),
                    ],
                ),
                record("s2", "p2", "900 A", Vec::new()),
                record("s3", "p2", "old instance", Vec::new()),
                record("s4", "p3", "900 A", Vec::new()),
            ],
        }
    }

    #[test]
    fn shooters_sorted_by_name_with_missing_listed_by_id() {
        let report = build_match_report(&snapshot());
        let names: Vec<&str> = report
            .shooters
            .iter()
            .map(|s| s.shooter.name.as_str())
            .collect();
        assert_eq!(names, ["Amy First", "p3", "zed Last"]);
    }

    #[test]
    fn scores_keyed_by_slot_with_subtotals() {
        let report = build_match_report(&snapshot());
        let zed = &report.shooters[2];
        let entry = &zed.scores["900 A_.22"];
        assert_eq!(entry.subtotals["SFNMC"], StageSum::new(192, 6));
        assert_eq!(entry.subtotals["TFNMC"], StageSum::default());
        assert!(zed.aggregates.is_empty());
    }

    #[test]
    fn orphan_scores_are_left_out() {
        let report = build_match_report(&snapshot());
        let amy = &report.shooters[0];
        assert_eq!(amy.scores.len(), 1);
        assert!(amy.scores.contains_key("900 A_.22"));
    }
}
