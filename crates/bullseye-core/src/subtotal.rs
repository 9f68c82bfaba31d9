//! Named subgroup sums over entry stages.

use std::collections::BTreeMap;
use std::ops::AddAssign;

use bullseye_model::StageEntry;
use serde::{Deserialize, Serialize};

use crate::catalog::SubtotalGroup;

/// A score and x-count pair that is always numeric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StageSum {
    pub score: u32,
    pub x_count: u32,
}

impl StageSum {
    pub fn new(score: u32, x_count: u32) -> Self {
        Self { score, x_count }
    }

    /// Missing values count as zero.
    pub fn of_stage(stage: &StageEntry) -> Self {
        Self::new(stage.score.unwrap_or(0), stage.x_count.unwrap_or(0))
    }

    pub fn is_zero(&self) -> bool {
        self.score == 0 && self.x_count == 0
    }
}

impl AddAssign for StageSum {
    fn add_assign(&mut self, rhs: Self) {
        self.score = self.score.saturating_add(rhs.score);
        self.x_count = self.x_count.saturating_add(rhs.x_count);
    }
}

/// Sum each group's member stages, treating absent values as zero.
///
/// Every group yields an entry, even when none of its members were fired or
/// present in `stages`.
pub fn subtotals(stages: &[StageEntry], groups: &[SubtotalGroup]) -> BTreeMap<String, StageSum> {
    groups
        .iter()
        .map(|group| {
            let mut sum = StageSum::default();
            for stage in stages
                .iter()
                .filter(|stage| group.members.contains(&stage.name.as_str()))
            {
                sum += StageSum::of_stage(stage);
            }
            (group.name.to_string(), sum)
        })
        .collect()
}
