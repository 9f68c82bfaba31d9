//! Best-N-of-M cross-match aggregates (1800, 2700).
//!
//! For each caliber, the qualifying scores of the aggregate's base course are
//! ranked by total score and the best `count` of them are summed. Ranking is a
//! stable sort on `total_score` alone, so equal totals keep input order.

use std::collections::BTreeMap;

use bullseye_model::{Caliber, Match, ScoreRecord, ShooterId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::{AggregateRule, aggregate_rule};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregateResult {
    /// `"{1800|2700}_{caliber}"`.
    pub label: String,
    pub caliber: Caliber,
    pub score: u32,
    pub x_count: u32,
    /// Instance names of the contributing scores, best first.
    pub components: Vec<String>,
}

/// Compute one shooter's aggregates for a match.
///
/// `scores` should hold a single shooter's records; use
/// [`aggregates_by_shooter`] for a whole match. Records for other matches,
/// records whose slot the match no longer declares, and not-shot records are
/// ignored. Calibers with fewer than the required number of qualifying
/// scores produce no entry.
pub fn aggregates(scores: &[ScoreRecord], match_: &Match) -> BTreeMap<String, AggregateResult> {
    let Some(rule) = aggregate_rule(&match_.aggregate_type) else {
        return BTreeMap::new();
    };

    let mut groups: BTreeMap<&Caliber, Vec<&ScoreRecord>> = BTreeMap::new();
    for record in qualifying_base_scores(scores, match_, rule) {
        groups.entry(&record.caliber).or_default().push(record);
    }

    let mut results = BTreeMap::new();
    for (caliber, mut records) in groups {
        if records.len() < rule.count {
            debug!(
                match_id = %match_.id,
                caliber = %caliber,
                found = records.len(),
                required = rule.count,
                "not enough scores for aggregate"
            );
            continue;
        }
        records.sort_by(|a, b| b.total_score.cmp(&a.total_score));
        let best = &records[..rule.count];
        let score = best
            .iter()
            .fold(0u32, |acc, r| acc.saturating_add(r.total_score.unwrap_or(0)));
        let x_count = best
            .iter()
            .fold(0u32, |acc, r| acc.saturating_add(r.total_x_count.unwrap_or(0)));
        let label = format!("{}_{}", rule.label, caliber);
        results.insert(
            label.clone(),
            AggregateResult {
                label,
                caliber: caliber.clone(),
                score,
                x_count,
                components: best
                    .iter()
                    .map(|r| r.match_type_instance.clone())
                    .collect(),
            },
        );
    }
    results
}

/// Aggregates for every shooter with scores in the match.
pub fn aggregates_by_shooter(
    scores: &[ScoreRecord],
    match_: &Match,
) -> BTreeMap<ShooterId, BTreeMap<String, AggregateResult>> {
    let mut by_shooter: BTreeMap<&ShooterId, Vec<ScoreRecord>> = BTreeMap::new();
    for record in scores {
        by_shooter
            .entry(&record.shooter_id)
            .or_default()
            .push(record.clone());
    }
    by_shooter
        .into_iter()
        .map(|(shooter_id, records)| (shooter_id.clone(), aggregates(&records, match_)))
        .collect()
}

/// Scores of the rule's base course that count toward the aggregate.
pub fn qualifying_base_scores<'a>(
    scores: &'a [ScoreRecord],
    match_: &'a Match,
    rule: &'a AggregateRule,
) -> impl Iterator<Item = &'a ScoreRecord> + 'a {
    scores.iter().filter(move |record| {
        if record.match_id != match_.id || !record.is_qualifying() {
            return false;
        }
        let Some(instance) = match_.instance(&record.match_type_instance) else {
            debug!(
                score_id = %record.id,
                instance = %record.match_type_instance,
                "skipping score for unknown instance"
            );
            return false;
        };
        if !instance.calibers.contains(&record.caliber) {
            debug!(
                score_id = %record.id,
                caliber = %record.caliber,
                "skipping score for caliber not in instance"
            );
            return false;
        }
        instance.match_type == rule.base
    })
}
