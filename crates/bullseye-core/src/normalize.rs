//! Derive entry totals from per-stage results.

use bullseye_model::{ScoreRecord, StageEntry};
use serde::{Deserialize, Serialize};

/// Totals derived from a list of stages.
///
/// `total_score` and `not_shot` depend only on stage scores; `total_x_count`
/// depends only on stage x-counts. A not-shot entry may still carry an
/// x-count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Totals {
    pub total_score: Option<u32>,
    pub total_x_count: Option<u32>,
    pub not_shot: bool,
}

impl Totals {
    /// Write the totals onto a record.
    pub fn apply_to(self, record: &mut ScoreRecord) {
        record.total_score = self.total_score;
        record.total_x_count = self.total_x_count;
        record.not_shot = self.not_shot;
    }
}

pub fn normalize(stages: &[StageEntry]) -> Totals {
    let total_score = sum_present(stages.iter().map(|stage| stage.score));
    let total_x_count = sum_present(stages.iter().map(|stage| stage.x_count));
    Totals {
        total_score,
        total_x_count,
        not_shot: total_score.is_none(),
    }
}

/// Recompute a record's totals from its stages.
pub fn renormalize(record: &mut ScoreRecord) -> Totals {
    let totals = normalize(&record.stages);
    totals.apply_to(record);
    totals
}

/// Sum of the present values, or `None` if every value is absent.
fn sum_present(values: impl Iterator<Item = Option<u32>>) -> Option<u32> {
    values
        .flatten()
        .fold(None, |acc: Option<u32>, value| {
            Some(acc.unwrap_or(0).saturating_add(value))
        })
}
