use serde::{Deserialize, Serialize};

use crate::{Match, ScoreRecord, Shooter, ShooterId};

/// Everything a match report reads, fetched once per request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchSnapshot {
    #[serde(rename = "match")]
    pub match_: Match,
    pub shooters: Vec<Shooter>,
    pub scores: Vec<ScoreRecord>,
}

impl MatchSnapshot {
    pub fn shooter(&self, id: &ShooterId) -> Option<&Shooter> {
        self.shooters.iter().find(|shooter| shooter.id == *id)
    }
}
