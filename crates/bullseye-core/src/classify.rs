//! Stage-name classification.
//!
//! Stage families are recognised by substring, the way stage labels have
//! always been written (`SF1`, `TFNMC`, ...). Every caller goes through
//! [`classify_stage`] and [`is_nmc_instance`] so the rule lives in one place.
//!
//! A name carrying two markers (say `TFSF`) takes the first family in the
//! order NMC, SF, TF, RF.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum StageFamily {
    SlowFire,
    TimedFire,
    RapidFire,
    Nmc,
}

impl StageFamily {
    pub fn as_str(self) -> &'static str {
        match self {
            StageFamily::SlowFire => "SF",
            StageFamily::TimedFire => "TF",
            StageFamily::RapidFire => "RF",
            StageFamily::Nmc => "NMC",
        }
    }
}

const NMC_MARKER: &str = "NMC";

/// Family of a stage by name, or `None` for labels with no known marker.
pub fn classify_stage(name: &str) -> Option<StageFamily> {
    if name.contains(NMC_MARKER) {
        Some(StageFamily::Nmc)
    } else if name.contains("SF") {
        Some(StageFamily::SlowFire)
    } else if name.contains("TF") {
        Some(StageFamily::TimedFire)
    } else if name.contains("RF") {
        Some(StageFamily::RapidFire)
    } else {
        None
    }
}

/// True when a match-type instance name marks a National Match Course.
pub fn is_nmc_instance(instance_name: &str) -> bool {
    instance_name.contains(NMC_MARKER)
}
