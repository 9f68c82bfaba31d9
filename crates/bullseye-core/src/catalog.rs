//! Fixed catalog of courses of fire and aggregate rules.
//!
//! Every stage layout, subtotal grouping, maximum score and aggregate rule
//! used by the engine comes from the two tables in this module.

use std::collections::BTreeMap;

use bullseye_model::{AggregateType, MatchType, StageEntry};

use crate::classify::StageFamily;

/// A named sum over a subset of entry stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubtotalGroup {
    pub name: &'static str,
    pub members: &'static [&'static str],
}

/// Stage layout and limits for one match type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchConfig {
    pub entry_stages: &'static [&'static str],
    pub subtotal_groups: &'static [SubtotalGroup],
    pub max_score: u32,
}

impl MatchConfig {
    /// Configuration returned for tags outside the catalog.
    pub const EMPTY: MatchConfig = MatchConfig {
        entry_stages: &[],
        subtotal_groups: &[],
        max_score: 0,
    };

    /// Names of the subtotal groups, in catalog order.
    pub fn subtotal_stages(&self) -> Vec<&'static str> {
        self.subtotal_groups.iter().map(|group| group.name).collect()
    }

    /// Subtotal name to member entry stages.
    pub fn subtotal_mappings(&self) -> BTreeMap<&'static str, &'static [&'static str]> {
        self.subtotal_groups
            .iter()
            .map(|group| (group.name, group.members))
            .collect()
    }

    pub fn has_stage(&self, name: &str) -> bool {
        self.entry_stages.contains(&name)
    }
}

struct CatalogEntry {
    match_type: MatchType,
    config: MatchConfig,
}

static MATCH_CATALOG: [CatalogEntry; 4] = [
    CatalogEntry {
        match_type: MatchType::Nmc,
        config: MatchConfig {
            entry_stages: &["SF", "TF", "RF"],
            subtotal_groups: &[],
            max_score: 300,
        },
    },
    CatalogEntry {
        match_type: MatchType::SixHundred,
        config: MatchConfig {
            entry_stages: &["SF1", "SF2", "TF1", "TF2", "RF1", "RF2"],
            subtotal_groups: &[],
            max_score: 600,
        },
    },
    CatalogEntry {
        match_type: MatchType::NineHundred,
        config: MatchConfig {
            entry_stages: &[
                "SF1", "SF2", "TF1", "TF2", "RF1", "RF2", "SFNMC", "TFNMC", "RFNMC",
            ],
            subtotal_groups: &[
                SubtotalGroup {
                    name: "SFNMC",
                    members: &["SF1", "SF2"],
                },
                SubtotalGroup {
                    name: "TFNMC",
                    members: &["TF1", "TF2"],
                },
                SubtotalGroup {
                    name: "RFNMC",
                    members: &["RF1", "RF2"],
                },
            ],
            max_score: 900,
        },
    },
    CatalogEntry {
        match_type: MatchType::Presidents,
        config: MatchConfig {
            entry_stages: &["SF1", "SF2", "TF", "RF"],
            subtotal_groups: &[],
            max_score: 400,
        },
    },
];

/// Look up the configuration for a match type.
///
/// Unknown tags resolve to [`MatchConfig::EMPTY`] so callers degrade to an
/// empty layout instead of failing.
pub fn resolve(match_type: &MatchType) -> MatchConfig {
    MATCH_CATALOG
        .iter()
        .find(|entry| entry.match_type == *match_type)
        .map(|entry| entry.config)
        .unwrap_or(MatchConfig::EMPTY)
}

/// Entry stages for `match_type` with nothing recorded.
pub fn blank_stages(match_type: &MatchType) -> Vec<StageEntry> {
    resolve(match_type)
        .entry_stages
        .iter()
        .map(|name| StageEntry::blank(*name))
        .collect()
}

/// One column of an aggregate caliber block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AggregateField {
    SlowFire,
    Nmc,
    TimedFire,
    RapidFire,
    /// Grand total of the base course for the caliber.
    Total,
}

impl AggregateField {
    /// Stage family summed by this field; `None` for the grand total.
    pub fn family(self) -> Option<StageFamily> {
        match self {
            AggregateField::SlowFire => Some(StageFamily::SlowFire),
            AggregateField::Nmc => Some(StageFamily::Nmc),
            AggregateField::TimedFire => Some(StageFamily::TimedFire),
            AggregateField::RapidFire => Some(StageFamily::RapidFire),
            AggregateField::Total => None,
        }
    }
}

/// How an aggregate is assembled from its base course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateRule {
    /// Label prefix, `1800` or `2700`.
    pub label: &'static str,
    pub base: MatchType,
    pub fields: &'static [AggregateField],
    /// Number of best scores per caliber that make up the aggregate.
    pub count: usize,
}

impl AggregateRule {
    /// Column label for `field` within a caliber block.
    pub fn field_label(&self, field: AggregateField) -> &str {
        match field {
            AggregateField::SlowFire => "SF",
            AggregateField::Nmc => "NMC",
            AggregateField::TimedFire => "TF",
            AggregateField::RapidFire => "RF",
            AggregateField::Total => self.base.as_str(),
        }
    }
}

const NINE_HUNDRED_FIELDS: &[AggregateField] = &[
    AggregateField::SlowFire,
    AggregateField::Nmc,
    AggregateField::TimedFire,
    AggregateField::RapidFire,
    AggregateField::Total,
];

const SIX_HUNDRED_FIELDS: &[AggregateField] = &[
    AggregateField::SlowFire,
    AggregateField::TimedFire,
    AggregateField::RapidFire,
    AggregateField::Total,
];

static TWENTY_SEVEN_HUNDRED: AggregateRule = AggregateRule {
    label: "2700",
    base: MatchType::NineHundred,
    fields: NINE_HUNDRED_FIELDS,
    count: 3,
};

static EIGHTEEN_2X900: AggregateRule = AggregateRule {
    label: "1800",
    base: MatchType::NineHundred,
    fields: NINE_HUNDRED_FIELDS,
    count: 2,
};

static EIGHTEEN_3X600: AggregateRule = AggregateRule {
    label: "1800",
    base: MatchType::SixHundred,
    fields: SIX_HUNDRED_FIELDS,
    count: 3,
};

/// Rule for a declared aggregate; `None` when nothing (or an unknown tag) is declared.
pub fn aggregate_rule(aggregate_type: &AggregateType) -> Option<&'static AggregateRule> {
    match aggregate_type {
        AggregateType::TwentySevenHundred => Some(&TWENTY_SEVEN_HUNDRED),
        AggregateType::Eighteen2x900 => Some(&EIGHTEEN_2X900),
        AggregateType::Eighteen3x600 => Some(&EIGHTEEN_3X600),
        AggregateType::None | AggregateType::Other(_) => None,
    }
}
