use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{Caliber, MatchId, ScoreId, ShooterId};

/// One stage of a score entry.
///
/// `score: None` means the stage was not fired. `x_count: None` only means
/// the inner-ring count was not recorded; it says nothing about firing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageEntry {
    pub name: String,
    #[serde(default)]
    pub score: Option<u32>,
    #[serde(default)]
    pub x_count: Option<u32>,
}

impl StageEntry {
    pub fn new(name: impl Into<String>, score: Option<u32>, x_count: Option<u32>) -> Self {
        Self {
            name: name.into(),
            score,
            x_count,
        }
    }

    /// A stage with nothing recorded.
    pub fn blank(name: impl Into<String>) -> Self {
        Self::new(name, None, None)
    }

    pub fn fired(&self) -> bool {
        self.score.is_some()
    }
}

/// Composite key of a score slot: a match-type instance fired in a caliber.
///
/// Rendered as `"{instance}_{caliber}"` only at the report boundary.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ScoreKey {
    pub instance: String,
    pub caliber: Caliber,
}

impl ScoreKey {
    pub fn new(instance: impl Into<String>, caliber: Caliber) -> Self {
        Self {
            instance: instance.into(),
            caliber,
        }
    }
}

impl fmt::Display for ScoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.instance, self.caliber)
    }
}

/// A shooter's entry for one (instance, caliber) slot of a match.
///
/// Totals are derived from `stages` whenever a record is created or updated.
/// Records read from storage are used as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreRecord {
    pub id: ScoreId,
    pub shooter_id: ShooterId,
    pub match_id: MatchId,
    pub caliber: Caliber,
    pub match_type_instance: String,
    pub stages: Vec<StageEntry>,
    #[serde(default)]
    pub total_score: Option<u32>,
    #[serde(default)]
    pub total_x_count: Option<u32>,
    #[serde(default)]
    pub not_shot: bool,
}

impl ScoreRecord {
    pub fn key(&self) -> ScoreKey {
        ScoreKey::new(self.match_type_instance.clone(), self.caliber.clone())
    }

    /// True when the record has a total that counts toward sums and averages.
    pub fn is_qualifying(&self) -> bool {
        self.total_score.is_some()
    }
}
