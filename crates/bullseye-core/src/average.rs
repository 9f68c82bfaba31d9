//! Per-shooter historical averages.
//!
//! Not-shot records (no total score) are skipped entirely. Records fired for
//! a total of zero count like any other score.

use std::collections::BTreeMap;

use bullseye_model::{Caliber, Match, MatchId, MatchType, ScoreRecord};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::classify::{StageFamily, classify_stage, is_nmc_instance};

/// Running count and sums for one bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Tally {
    pub count: u32,
    pub score_sum: u64,
    pub x_count_sum: u64,
}

impl Tally {
    pub fn add(&mut self, score: u32, x_count: u32) {
        self.count += 1;
        self.score_sum += u64::from(score);
        self.x_count_sum += u64::from(x_count);
    }

    /// Mean score rounded to two decimals; `None` for an empty tally.
    pub fn score_avg(&self) -> Option<f64> {
        mean(self.score_sum, self.count)
    }

    /// Mean x-count rounded to two decimals; `None` for an empty tally.
    pub fn x_count_avg(&self) -> Option<f64> {
        mean(self.x_count_sum, self.count)
    }
}

/// Averages for one caliber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AverageBucket {
    /// Whole-entry totals; `overall.count` is the number of matches fired.
    pub overall: Tally,
    pub slow_fire: Tally,
    pub timed_fire: Tally,
    pub rapid_fire: Tally,
    /// Totals of entries fired in NMC instances.
    pub nmc: Tally,
}

impl AverageBucket {
    pub fn family(&self, family: StageFamily) -> &Tally {
        match family {
            StageFamily::SlowFire => &self.slow_fire,
            StageFamily::TimedFire => &self.timed_fire,
            StageFamily::RapidFire => &self.rapid_fire,
            StageFamily::Nmc => &self.nmc,
        }
    }

    fn add_record(&mut self, record: &ScoreRecord, total: u32) {
        let x_total = record.total_x_count.unwrap_or(0);
        self.overall.add(total, x_total);
        if is_nmc_instance(&record.match_type_instance) {
            self.nmc.add(total, x_total);
        }
        for stage in &record.stages {
            let Some(score) = stage.score else {
                continue;
            };
            let x_count = stage.x_count.unwrap_or(0);
            match classify_stage(&stage.name) {
                Some(StageFamily::SlowFire) => self.slow_fire.add(score, x_count),
                Some(StageFamily::TimedFire) => self.timed_fire.add(score, x_count),
                Some(StageFamily::RapidFire) => self.rapid_fire.add(score, x_count),
                Some(StageFamily::Nmc) | None => {}
            }
        }
    }
}

/// Averages over a shooter's whole score history.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShooterAverages {
    pub by_caliber: BTreeMap<Caliber, AverageBucket>,
    /// Keyed by match type, then caliber. Scores whose instance cannot be
    /// resolved against a known match are left out of this breakdown only.
    pub by_match_type: BTreeMap<MatchType, BTreeMap<Caliber, Tally>>,
}

impl ShooterAverages {
    pub fn is_empty(&self) -> bool {
        self.by_caliber.is_empty()
    }
}

/// Average a score history.
///
/// `matches` resolves each record's instance to its match type for the
/// per-match-type breakdown; pass an empty slice to skip it.
pub fn averages(history: &[ScoreRecord], matches: &[Match]) -> ShooterAverages {
    let by_id: BTreeMap<&MatchId, &Match> = matches.iter().map(|m| (&m.id, m)).collect();
    let mut result = ShooterAverages::default();

    for record in history {
        let Some(total) = record.total_score else {
            continue;
        };
        result
            .by_caliber
            .entry(record.caliber.clone())
            .or_default()
            .add_record(record, total);

        let match_type = by_id
            .get(&record.match_id)
            .and_then(|m| m.instance(&record.match_type_instance))
            .map(|instance| instance.match_type.clone());
        match match_type {
            Some(match_type) => result
                .by_match_type
                .entry(match_type)
                .or_default()
                .entry(record.caliber.clone())
                .or_default()
                .add(total, record.total_x_count.unwrap_or(0)),
            None => debug!(
                score_id = %record.id,
                match_id = %record.match_id,
                "no match type for score; left out of per-type averages"
            ),
        }
    }
    result
}

fn mean(sum: u64, count: u32) -> Option<f64> {
    if count == 0 {
        return None;
    }
    Some(round2(sum as f64 / f64::from(count)))
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
