use std::collections::{BTreeSet, HashSet};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::{AggregateType, Caliber, MatchId, MatchType, ModelError, ScoreKey};

/// One course of fire inside a match, fired in one or more calibers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchTypeInstance {
    #[serde(rename = "type")]
    pub match_type: MatchType,
    /// Unique within the owning match.
    pub instance_name: String,
    pub calibers: BTreeSet<Caliber>,
}

impl MatchTypeInstance {
    pub fn new(
        match_type: MatchType,
        instance_name: impl Into<String>,
        calibers: impl IntoIterator<Item = Caliber>,
    ) -> Self {
        Self {
            match_type,
            instance_name: instance_name.into(),
            calibers: calibers.into_iter().collect(),
        }
    }

    /// Score keys (instance, caliber) this instance accepts.
    pub fn keys(&self) -> impl Iterator<Item = ScoreKey> + '_ {
        self.calibers
            .iter()
            .map(|caliber| ScoreKey::new(self.instance_name.clone(), caliber.clone()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Match {
    pub id: MatchId,
    pub name: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub location: String,
    pub match_types: Vec<MatchTypeInstance>,
    #[serde(default)]
    pub aggregate_type: AggregateType,
}

impl Match {
    /// Find an instance by its name.
    pub fn instance(&self, instance_name: &str) -> Option<&MatchTypeInstance> {
        self.match_types
            .iter()
            .find(|instance| instance.instance_name == instance_name)
    }

    /// Returns true if the match currently accepts scores for `key`.
    pub fn accepts(&self, key: &ScoreKey) -> bool {
        self.instance(&key.instance)
            .is_some_and(|instance| instance.calibers.contains(&key.caliber))
    }

    /// Every (instance, caliber) slot declared by the match.
    pub fn keys(&self) -> BTreeSet<ScoreKey> {
        self.match_types
            .iter()
            .flat_map(MatchTypeInstance::keys)
            .collect()
    }

    /// Slots present in `self` that `edited` no longer declares.
    pub fn removed_keys(&self, edited: &Match) -> Vec<ScoreKey> {
        let kept = edited.keys();
        self.keys()
            .into_iter()
            .filter(|key| !kept.contains(key))
            .collect()
    }

    /// Reject blank or repeated instance names.
    pub fn validate(&self) -> Result<(), ModelError> {
        let mut seen = HashSet::new();
        for instance in &self.match_types {
            let name = instance.instance_name.trim();
            if name.is_empty() {
                return Err(ModelError::InvalidInstanceName(
                    instance.instance_name.clone(),
                ));
            }
            if !seen.insert(name) {
                return Err(ModelError::DuplicateInstance(name.to_string()));
            }
        }
        Ok(())
    }
}
